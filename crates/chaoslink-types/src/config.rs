// ─────────────────────────────────────────────────────────────────────
// ChaosLink — Solver Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{ChaosLinkError, ChaosLinkResult};

/// Runtime configuration for the adaptive integration service.
///
/// Chaotic trajectories amplify local error exponentially, so the default
/// tolerances are far tighter than a generic ODE workload would pick —
/// loose tolerances corrupt the synchronization error within seconds of
/// simulated time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Absolute tolerance per component. Default: 1e-11.
    pub abs_tol: f64,

    /// Relative tolerance per component. Default: 1e-11.
    pub rel_tol: f64,

    /// First trial step size. 0.0 selects a span-proportional heuristic.
    /// Default: 0.0.
    pub initial_step: f64,

    /// Upper bound on accepted step size; 0.0 disables the bound.
    /// Dense-output consumers that amplify interpolation error (message
    /// recovery divides by the embed scale) cap this. Default: 0.0.
    pub max_step: f64,

    /// Step-size underflow bound; shrinking below this is an
    /// integration failure, not a silent stall. Default: 1e-13.
    pub min_step: f64,

    /// Hard cap on accepted + rejected steps per solve. Default: 5_000_000.
    pub max_steps: u64,

    /// Wall-clock deadline per solve in milliseconds; 0 disables the
    /// deadline. Pathological parameters can thrash the step controller,
    /// so batch callers keep this set. Default: 0.
    pub deadline_ms: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            abs_tol: 1e-11,
            rel_tol: 1e-11,
            initial_step: 0.0,
            max_step: 0.0,
            min_step: 1e-13,
            max_steps: 5_000_000,
            deadline_ms: 0,
        }
    }
}

impl SolverConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> ChaosLinkResult<()> {
        if !(self.abs_tol.is_finite() && self.abs_tol > 0.0) {
            return Err(ChaosLinkError::Config(format!(
                "abs_tol must be finite and > 0, got {}",
                self.abs_tol
            )));
        }
        if !(self.rel_tol.is_finite() && self.rel_tol > 0.0) {
            return Err(ChaosLinkError::Config(format!(
                "rel_tol must be finite and > 0, got {}",
                self.rel_tol
            )));
        }
        if !(self.initial_step.is_finite() && self.initial_step >= 0.0) {
            return Err(ChaosLinkError::Config(format!(
                "initial_step must be finite and >= 0, got {}",
                self.initial_step
            )));
        }
        if !(self.max_step.is_finite() && self.max_step >= 0.0) {
            return Err(ChaosLinkError::Config(format!(
                "max_step must be finite and >= 0, got {}",
                self.max_step
            )));
        }
        if self.max_step > 0.0 && self.max_step <= self.min_step {
            return Err(ChaosLinkError::Config(format!(
                "max_step ({}) must exceed min_step ({})",
                self.max_step, self.min_step
            )));
        }
        if !(self.min_step.is_finite() && self.min_step > 0.0) {
            return Err(ChaosLinkError::Config(format!(
                "min_step must be finite and > 0, got {}",
                self.min_step
            )));
        }
        if self.max_steps == 0 {
            return Err(ChaosLinkError::Config(
                "max_steps must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> ChaosLinkResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ChaosLinkError::Config(format!("JSON parse error: {e}")))
    }
}
