// ─────────────────────────────────────────────────────────────────────
// ChaosLink — Phase-Space Primitives
// ─────────────────────────────────────────────────────────────────────
//! State vectors, validated time spans, and the vector-field contract
//! shared by the transmitter, receiver, and integration service.

use serde::{Deserialize, Serialize};

use crate::error::{ChaosLinkError, ChaosLinkResult};

/// Phase-space dimension of the masking system.
pub const DIM: usize = 3;

/// A point (x, y, z) in phase space.
pub type State = [f64; DIM];

/// True when every component is finite.
#[inline]
pub fn state_is_finite(u: &State) -> bool {
    u.iter().all(|v| v.is_finite())
}

/// Ordered, finite integration interval [t0, t1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSpan {
    t0: f64,
    t1: f64,
}

impl TimeSpan {
    pub fn new(t0: f64, t1: f64) -> ChaosLinkResult<Self> {
        if !t0.is_finite() || !t1.is_finite() {
            return Err(ChaosLinkError::InvalidArgument(format!(
                "time span bounds must be finite, got ({t0}, {t1})"
            )));
        }
        if t0 >= t1 {
            return Err(ChaosLinkError::InvalidArgument(format!(
                "time span must be ordered (t0 < t1), got ({t0}, {t1})"
            )));
        }
        Ok(Self { t0, t1 })
    }

    pub fn start(&self) -> f64 {
        self.t0
    }

    pub fn end(&self) -> f64 {
        self.t1
    }

    pub fn length(&self) -> f64 {
        self.t1 - self.t0
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.t0 && t <= self.t1
    }

    /// Clamp a time to the span.
    pub fn clamp(&self, t: f64) -> f64 {
        t.clamp(self.t0, self.t1)
    }
}

/// A pure, deterministic vector field u̇ = f(t, u).
///
/// Implementations must be free of hidden mutable state; the adaptive
/// integrator re-evaluates stages during rejected trial steps and relies
/// on identical answers for identical (t, u).
pub trait VectorField: Send + Sync {
    fn eval(&self, t: f64, u: &State) -> State;
}

impl<F> VectorField for F
where
    F: Fn(f64, &State) -> State + Send + Sync,
{
    fn eval(&self, t: f64, u: &State) -> State {
        self(t, u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_ordered() {
        let span = TimeSpan::new(0.0, 15.0).unwrap();
        assert_eq!(span.start(), 0.0);
        assert_eq!(span.end(), 15.0);
        assert_eq!(span.length(), 15.0);
    }

    #[test]
    fn test_span_rejects_reversed() {
        assert!(TimeSpan::new(2.0, 1.0).is_err());
        assert!(TimeSpan::new(1.0, 1.0).is_err());
    }

    #[test]
    fn test_span_rejects_non_finite() {
        assert!(TimeSpan::new(f64::NAN, 1.0).is_err());
        assert!(TimeSpan::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_span_clamp() {
        let span = TimeSpan::new(0.0, 4.0).unwrap();
        assert_eq!(span.clamp(-1.0), 0.0);
        assert_eq!(span.clamp(2.5), 2.5);
        assert_eq!(span.clamp(9.0), 4.0);
    }

    #[test]
    fn test_state_is_finite() {
        assert!(state_is_finite(&[1.0, -2.0, 0.0]));
        assert!(!state_is_finite(&[1.0, f64::NAN, 0.0]));
        assert!(!state_is_finite(&[f64::INFINITY, 0.0, 0.0]));
    }

    #[test]
    fn test_closure_vector_field() {
        let decay = |_t: f64, u: &State| [-u[0], -u[1], -u[2]];
        let du = decay.eval(0.0, &[2.0, 4.0, 8.0]);
        assert_eq!(du, [-2.0, -4.0, -8.0]);
    }
}
