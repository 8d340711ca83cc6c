// ─────────────────────────────────────────────────────────────────────
// ChaosLink — Continuous Masking Codec
// ─────────────────────────────────────────────────────────────────────
//! Embedding hides a scaled message under the transmitter's chaotic
//! x-trajectory; recovery reconstructs the carrier with the driven
//! receiver and subtracts. Recovery is exact only in the noiseless,
//! matched-parameter limit — residual error is reported through the
//! synchronization-error metric, not as a failure.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use chaoslink_dynamics::{DrivenReceiver, LorenzParams, Transmitter};
use chaoslink_solver::{Component, Dopri5, Trajectory};
use chaoslink_types::{
    ChaosLinkError, ChaosLinkResult, Signal, SolverConfig, State, TimeSpan,
};

/// Embedding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedConfig {
    /// Message scale ε, strictly inside (0, 1) so the chaotic carrier
    /// dominates the spectrum and masks the message. Default: 1e-5.
    pub scale: f64,

    /// Solver settings for the transmitter solve. The default caps the
    /// step size at 1e-3: recovery multiplies dense-output error by
    /// 1/scale, so interpolation accuracy is held near the step
    /// tolerance rather than left to the controller alone.
    pub solver: SolverConfig,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        let mut solver = SolverConfig::default();
        solver.max_step = 1e-3;
        Self {
            scale: 1e-5,
            solver,
        }
    }
}

impl EmbedConfig {
    pub fn validate(&self) -> ChaosLinkResult<()> {
        self.solver.validate()?;
        if !(self.scale.is_finite() && self.scale > 0.0 && self.scale < 1.0) {
            return Err(ChaosLinkError::Config(format!(
                "embed scale must be in (0, 1), got {}",
                self.scale
            )));
        }
        Ok(())
    }
}

/// Recovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoverConfig {
    /// Gain applied to the carrier-subtracted residue. Default: 1e5,
    /// the reciprocal of the default embed scale.
    pub scale: f64,

    /// Solver settings for the receiver solve.
    pub solver: SolverConfig,
}

impl Default for RecoverConfig {
    fn default() -> Self {
        let mut solver = SolverConfig::default();
        solver.max_step = 1e-3;
        Self {
            scale: 1e5,
            solver,
        }
    }
}

impl RecoverConfig {
    /// Recovery paired to an embedding: gain 1/ε and the same solver
    /// settings. Both scales stay independent parameters; this removes
    /// the reciprocal-pairing foot-gun for callers who want it.
    pub fn reciprocal_of(embed: &EmbedConfig) -> Self {
        Self {
            scale: 1.0 / embed.scale,
            solver: embed.solver.clone(),
        }
    }

    pub fn validate(&self) -> ChaosLinkResult<()> {
        self.solver.validate()?;
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ChaosLinkError::Config(format!(
                "recover scale must be finite and > 0, got {}",
                self.scale
            )));
        }
        Ok(())
    }
}

/// The transmitted signal: carrier x_T(t) plus ε·m(t).
pub struct SecretMessage {
    carrier_x: Component,
    message: Arc<dyn Signal>,
    scale: f64,
}

impl SecretMessage {
    /// The masking carrier component.
    pub fn carrier(&self) -> &Component {
        &self.carrier_x
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl Signal for SecretMessage {
    fn value_at(&self, t: f64) -> f64 {
        self.carrier_x.value_at(t) + self.scale * self.message.value_at(t)
    }
}

/// The recovered message: gain·(secret(t) − x_R(t)).
pub struct RecoveredMessage {
    secret: Arc<dyn Signal>,
    receiver_x: Component,
    scale: f64,
}

impl RecoveredMessage {
    /// The receiver's reconstructed carrier component.
    pub fn reconstructed_carrier(&self) -> &Component {
        &self.receiver_x
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl Signal for RecoveredMessage {
    fn value_at(&self, t: f64) -> f64 {
        self.scale * (self.secret.value_at(t) - self.receiver_x.value_at(t))
    }
}

/// Solve the autonomous transmitter system.
pub fn transmitter_trajectory(
    u0: State,
    params: LorenzParams,
    span: TimeSpan,
    cfg: &SolverConfig,
) -> ChaosLinkResult<Arc<Trajectory>> {
    params.validate()?;
    let solver = Dopri5::new(cfg.clone())?;
    Ok(Arc::new(solver.solve(&Transmitter::new(params), u0, span)?))
}

/// Solve the receiver system under an arbitrary driving signal.
pub fn receiver_trajectory(
    u0: State,
    params: LorenzParams,
    span: TimeSpan,
    drive: Arc<dyn Signal>,
    cfg: &SolverConfig,
) -> ChaosLinkResult<Arc<Trajectory>> {
    params.validate()?;
    let solver = Dopri5::new(cfg.clone())?;
    Ok(Arc::new(solver.solve(&DrivenReceiver::new(params, drive), u0, span)?))
}

/// Embed a message under the chaotic carrier.
///
/// Solves the transmitter from `u0` across `span` and returns
/// x_T(t) + scale·m(t) as the transmittable signal.
pub fn embed_message(
    u0: State,
    params: LorenzParams,
    span: TimeSpan,
    message: Arc<dyn Signal>,
    cfg: &EmbedConfig,
) -> ChaosLinkResult<SecretMessage> {
    cfg.validate()?;
    if cfg.scale > 1e-2 {
        log::warn!(
            "embed scale {} leaves the message weakly masked by the carrier",
            cfg.scale
        );
    }
    let traj = transmitter_trajectory(u0, params, span, &cfg.solver)?;
    let carrier_x = Component::new(traj, 0)?;
    Ok(SecretMessage {
        carrier_x,
        message,
        scale: cfg.scale,
    })
}

/// Recover a message from a received secret signal.
///
/// Solves the receiver driven by the secret signal and returns
/// scale·(secret(t) − x_R(t)). Recovery quality degrades continuously
/// with channel noise and parameter mismatch; inspect the result with
/// the synchronization-error metric.
pub fn recover_message(
    u0: State,
    params: LorenzParams,
    span: TimeSpan,
    secret: Arc<dyn Signal>,
    cfg: &RecoverConfig,
) -> ChaosLinkResult<RecoveredMessage> {
    cfg.validate()?;
    let traj = receiver_trajectory(u0, params, span, secret.clone(), &cfg.solver)?;
    let receiver_x = Component::new(traj, 0)?;
    Ok(RecoveredMessage {
        secret,
        receiver_x,
        scale: cfg.scale,
    })
}
