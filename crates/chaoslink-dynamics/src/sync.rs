// ─────────────────────────────────────────────────────────────────────
// ChaosLink — Synchronization-Error Metrics
// ─────────────────────────────────────────────────────────────────────
//! Time-indexed error between two scalar signals, plus the windowed
//! statistics used to threshold parameter-modulated transmissions.
//!
//! Degraded recovery (channel noise, parameter mismatch) is not a
//! failure mode; it shows up here as a nonzero error signal and is a
//! first-class output.

use chaoslink_types::Signal;

/// Pointwise error between two signals, |a − b| or (a − b)².
pub struct ErrorSignal<A: Signal, B: Signal> {
    a: A,
    b: B,
    squared: bool,
}

impl<A: Signal, B: Signal> ErrorSignal<A, B> {
    /// Absolute error |a(t) − b(t)|.
    pub fn abs(a: A, b: B) -> Self {
        Self { a, b, squared: false }
    }

    /// Squared error (a(t) − b(t))², the binary-decryption observable.
    pub fn squared(a: A, b: B) -> Self {
        Self { a, b, squared: true }
    }
}

impl<A: Signal, B: Signal> Signal for ErrorSignal<A, B> {
    fn value_at(&self, t: f64) -> f64 {
        let d = self.a.value_at(t) - self.b.value_at(t);
        if self.squared {
            d * d
        } else {
            d.abs()
        }
    }
}

/// Mean of `signal` over [t0, t1], sampled at `n` uniform points.
///
/// Used to decide whether a modulation window synchronized (near-zero
/// mean error) or mismatched.
pub fn windowed_mean(signal: &dyn Signal, t0: f64, t1: f64, n: usize) -> f64 {
    if n == 0 || t1 <= t0 {
        return 0.0;
    }
    let dt = (t1 - t0) / n as f64;
    let mut acc = 0.0;
    for i in 0..n {
        // Sample window midpoints; endpoints sit on modulation edges.
        let t = t0 + (i as f64 + 0.5) * dt;
        acc += signal.value_at(t);
    }
    acc / n as f64
}

/// Largest |signal| over [t0, t1], sampled at `n` uniform points.
pub fn max_abs(signal: &dyn Signal, t0: f64, t1: f64, n: usize) -> f64 {
    if n == 0 || t1 <= t0 {
        return 0.0;
    }
    let dt = (t1 - t0) / n as f64;
    let mut max = 0.0f64;
    for i in 0..n {
        let t = t0 + (i as f64 + 0.5) * dt;
        max = max.max(signal.value_at(t).abs());
    }
    max
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaoslink_types::{ConstSignal, FnSignal};

    #[test]
    fn test_abs_error() {
        let e = ErrorSignal::abs(ConstSignal(3.0), ConstSignal(5.0));
        assert!((e.value_at(0.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_squared_error() {
        let e = ErrorSignal::squared(ConstSignal(3.0), ConstSignal(5.0));
        assert!((e.value_at(0.0) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_identical_signals_zero_error() {
        let e = ErrorSignal::abs(FnSignal::new(|t| t.sin()), FnSignal::new(|t| t.sin()));
        for i in 0..10 {
            assert_eq!(e.value_at(i as f64 * 0.3), 0.0);
        }
    }

    #[test]
    fn test_windowed_mean_constant() {
        let m = windowed_mean(&ConstSignal(2.5), 0.0, 4.0, 64);
        assert!((m - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_windowed_mean_linear() {
        // Midpoint sampling integrates a linear ramp exactly.
        let m = windowed_mean(&FnSignal::new(|t| t), 0.0, 2.0, 16);
        assert!((m - 1.0).abs() < 1e-12, "got {m}");
    }

    #[test]
    fn test_windowed_mean_degenerate() {
        assert_eq!(windowed_mean(&ConstSignal(1.0), 0.0, 1.0, 0), 0.0);
        assert_eq!(windowed_mean(&ConstSignal(1.0), 2.0, 1.0, 8), 0.0);
    }

    #[test]
    fn test_max_abs() {
        let m = max_abs(&FnSignal::new(|t| -t), 0.0, 2.0, 1000);
        assert!(m > 1.9 && m <= 2.0, "got {m}");
    }
}
