// ─────────────────────────────────────────────────────────────────────
// ChaosLink — Signal Capability Interface
// ─────────────────────────────────────────────────────────────────────
//! The "function of time" abstraction shared by every scalar stream in
//! the transceiver: solved-trajectory components, sampled audio, synthetic
//! step functions, and derived error signals all answer one question —
//! what is the value at time t.

use std::sync::Arc;

use crate::state::TimeSpan;

/// A scalar function of time.
///
/// `Send + Sync` so trajectories and messages can be shared across batch
/// experiment workers without aliasing mutable state.
pub trait Signal: Send + Sync {
    fn value_at(&self, t: f64) -> f64;
}

impl<S: Signal + ?Sized> Signal for &S {
    fn value_at(&self, t: f64) -> f64 {
        (**self).value_at(t)
    }
}

impl<S: Signal + ?Sized> Signal for Arc<S> {
    fn value_at(&self, t: f64) -> f64 {
        (**self).value_at(t)
    }
}

impl<S: Signal + ?Sized> Signal for Box<S> {
    fn value_at(&self, t: f64) -> f64 {
        (**self).value_at(t)
    }
}

/// Constant signal; the silent message and fixed receiver parameters.
#[derive(Debug, Clone, Copy)]
pub struct ConstSignal(pub f64);

impl Signal for ConstSignal {
    fn value_at(&self, _t: f64) -> f64 {
        self.0
    }
}

/// Closure adapter for ad-hoc message functions.
pub struct FnSignal {
    f: Box<dyn Fn(f64) -> f64 + Send + Sync>,
}

impl FnSignal {
    pub fn new(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self { f: Box::new(f) }
    }
}

impl Signal for FnSignal {
    fn value_at(&self, t: f64) -> f64 {
        (self.f)(t)
    }
}

/// Sample a signal at `n` uniformly spaced times over the span.
///
/// Plotting and reporting collaborators consume these plain (t, value)
/// pairs; the core never holds a plotting dependency.
pub fn sample_uniform(signal: &dyn Signal, span: TimeSpan, n: usize) -> Vec<(f64, f64)> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![(span.start(), signal.value_at(span.start()))];
    }
    let dt = span.length() / (n - 1) as f64;
    let mut out = Vec::with_capacity(n);
    let mut non_finite = 0usize;
    for i in 0..n {
        let t = span.start() + i as f64 * dt;
        let v = signal.value_at(t);
        if !v.is_finite() {
            non_finite += 1;
        }
        out.push((t, v));
    }
    if non_finite > 0 {
        log::warn!("sample_uniform: {non_finite}/{n} samples non-finite");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_const_signal() {
        let s = ConstSignal(4.4);
        assert_eq!(s.value_at(-3.0), 4.4);
        assert_eq!(s.value_at(100.0), 4.4);
    }

    #[test]
    fn test_fn_signal() {
        let s = FnSignal::new(|t| 2.0 * t);
        assert!((s.value_at(1.5) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_arc_dyn_signal() {
        let s: Arc<dyn Signal> = Arc::new(ConstSignal(1.0));
        assert_eq!(s.value_at(0.0), 1.0);
        let cloned = s.clone();
        assert_eq!(cloned.value_at(7.0), 1.0);
    }

    #[test]
    fn test_sample_uniform_endpoints() {
        let s = FnSignal::new(|t| t);
        let span = TimeSpan::new(0.0, 2.0).unwrap();
        let samples = sample_uniform(&s, span, 5);
        assert_eq!(samples.len(), 5);
        assert!((samples[0].0 - 0.0).abs() < 1e-12);
        assert!((samples[4].0 - 2.0).abs() < 1e-12);
        assert!((samples[2].1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sample_uniform_degenerate_counts() {
        let s = ConstSignal(0.5);
        let span = TimeSpan::new(0.0, 1.0).unwrap();
        assert!(sample_uniform(&s, span, 0).is_empty());
        let one = sample_uniform(&s, span, 1);
        assert_eq!(one.len(), 1);
        assert_eq!(one[0], (0.0, 0.5));
    }
}
