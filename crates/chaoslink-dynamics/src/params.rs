// ─────────────────────────────────────────────────────────────────────
// ChaosLink — Canonical Parameters
// ─────────────────────────────────────────────────────────────────────
//! Parameter set (σ, r, b) of the masking Lorenz family and the fixed
//! structural couplings of the Cuomo–Oppenheim circuit scaling.
//!
//! The 20·x·z and 5·x·y couplings are part of the system's shape, not
//! tunables; only σ, r, b select the operating point.

use serde::{Deserialize, Serialize};

use chaoslink_types::{ChaosLinkError, ChaosLinkResult};

/// Fixed coupling of the x·z shear term in ẏ.
pub const XZ_COUPLING: f64 = 20.0;

/// Fixed coupling of the x·y product term in ż.
pub const XY_COUPLING: f64 = 5.0;

/// Parameters (σ, r, b) of the masking system.
///
/// Shared by value between transmitter and receiver when synchronization
/// requires matching parameters; deliberately mismatched (b only) in the
/// binary parameter-modulation variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LorenzParams {
    /// Prandtl-like rate σ coupling x to y.
    pub sigma: f64,
    /// Rayleigh-like forcing r.
    pub r: f64,
    /// Damping b of the z coordinate.
    pub b: f64,
}

impl LorenzParams {
    /// Operating point of the Cuomo–Oppenheim masking circuit:
    /// σ = 16, r = 45.6, b = 4.
    pub const CUOMO: Self = Self {
        sigma: 16.0,
        r: 45.6,
        b: 4.0,
    };

    pub fn new(sigma: f64, r: f64, b: f64) -> ChaosLinkResult<Self> {
        let p = Self { sigma, r, b };
        p.validate()?;
        Ok(p)
    }

    /// Reject non-finite or non-positive parameters; the vector fields
    /// themselves never check, so this is the fail-fast gate.
    pub fn validate(&self) -> ChaosLinkResult<()> {
        for (name, v) in [("sigma", self.sigma), ("r", self.r), ("b", self.b)] {
            if !v.is_finite() {
                return Err(ChaosLinkError::InvalidArgument(format!(
                    "parameter {name} must be finite, got {v}"
                )));
            }
            if v <= 0.0 {
                return Err(ChaosLinkError::InvalidArgument(format!(
                    "parameter {name} must be > 0, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Same σ and r with a different b (receiver-side assumed parameter).
    pub fn with_b(&self, b: f64) -> Self {
        Self { b, ..*self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuomo_operating_point() {
        let p = LorenzParams::CUOMO;
        assert_eq!(p.sigma, 16.0);
        assert_eq!(p.r, 45.6);
        assert_eq!(p.b, 4.0);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_structural_couplings() {
        assert_eq!(XZ_COUPLING, 20.0);
        assert_eq!(XY_COUPLING, 5.0);
    }

    #[test]
    fn test_rejects_nan() {
        assert!(LorenzParams::new(f64::NAN, 45.6, 4.0).is_err());
        assert!(LorenzParams::new(16.0, f64::INFINITY, 4.0).is_err());
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(LorenzParams::new(0.0, 45.6, 4.0).is_err());
        assert!(LorenzParams::new(16.0, -1.0, 4.0).is_err());
    }

    #[test]
    fn test_with_b() {
        let p = LorenzParams::CUOMO.with_b(4.4);
        assert_eq!(p.sigma, 16.0);
        assert_eq!(p.r, 45.6);
        assert_eq!(p.b, 4.4);
    }
}
