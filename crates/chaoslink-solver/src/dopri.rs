// ─────────────────────────────────────────────────────────────────────
// ChaosLink — Dormand–Prince 5(4) Adaptive Stepper
// ─────────────────────────────────────────────────────────────────────
//! Embedded Runge–Kutta 5(4) pair (Dormand–Prince) with FSAL, an
//! error-weighted RMS acceptance norm, and multiplicative step control.
//! Each accepted step records its dense-output coefficients for the
//! trajectory interpolant; a failed solve reports the failing time and
//! last good state instead of a partial result.

use std::time::Instant;

use chaoslink_types::{
    state_is_finite, ChaosLinkError, ChaosLinkResult, SolverConfig, State, TimeSpan, VectorField,
    DIM,
};

use crate::trajectory::{DenseSegment, Trajectory};

// Dormand–Prince 5(4) tableau.
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// 5th-order weights (also the a7 row: FSAL).
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// Difference between the 5th- and 4th-order weights.
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

// Dense-output weights of the fourth-order continuous extension.
const D1: f64 = -12715105075.0 / 11282082432.0;
const D3: f64 = 87487479700.0 / 32700410799.0;
const D4: f64 = -10690763975.0 / 1880347072.0;
const D5: f64 = 701980252875.0 / 199316789632.0;
const D6: f64 = -1453857185.0 / 822651844.0;
const D7: f64 = 69997945.0 / 29380423.0;

const SAFETY: f64 = 0.9;
const FAC_MIN: f64 = 0.2;
const FAC_MAX: f64 = 5.0;

#[inline]
fn stage(y: &State, h: f64, terms: &[(f64, &State)]) -> State {
    let mut out = *y;
    for &(a, k) in terms {
        for i in 0..DIM {
            out[i] += h * a * k[i];
        }
    }
    out
}

/// Adaptive integration service.
pub struct Dopri5 {
    cfg: SolverConfig,
}

impl Dopri5 {
    pub fn new(cfg: SolverConfig) -> ChaosLinkResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    /// Default tolerances (1e-11 absolute and relative).
    pub fn default_params() -> Self {
        Self {
            cfg: SolverConfig::default(),
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.cfg
    }

    /// Integrate `field` from `u0` across `span` and return the dense
    /// trajectory.
    pub fn solve<F: VectorField>(
        &self,
        field: &F,
        u0: State,
        span: TimeSpan,
    ) -> ChaosLinkResult<Trajectory> {
        if !state_is_finite(&u0) {
            return Err(ChaosLinkError::InvalidArgument(format!(
                "initial state must be finite, got {u0:?}"
            )));
        }

        let cfg = &self.cfg;
        let t_end = span.end();
        let mut t = span.start();
        let mut y = u0;
        let mut f = field.eval(t, &y);
        if !state_is_finite(&f) {
            return Err(ChaosLinkError::Integration {
                t_reached: t,
                last_state: y,
                reason: "vector field non-finite at initial state".to_string(),
            });
        }

        let mut h = if cfg.initial_step > 0.0 {
            cfg.initial_step.min(span.length())
        } else {
            span.length() * 1e-3
        };
        if cfg.max_step > 0.0 {
            h = h.min(cfg.max_step);
        }

        let mut ts = vec![t];
        let mut segments: Vec<DenseSegment> = Vec::new();

        let started = Instant::now();
        let mut accepted: u64 = 0;
        let mut rejected: u64 = 0;
        let mut steps: u64 = 0;

        while t < t_end {
            steps += 1;
            if steps > cfg.max_steps {
                return Err(ChaosLinkError::Integration {
                    t_reached: t,
                    last_state: y,
                    reason: format!("step limit of {} exhausted", cfg.max_steps),
                });
            }
            if cfg.deadline_ms > 0 && started.elapsed().as_millis() as u64 >= cfg.deadline_ms {
                return Err(ChaosLinkError::Timeout {
                    deadline_ms: cfg.deadline_ms,
                });
            }

            if cfg.max_step > 0.0 {
                h = h.min(cfg.max_step);
            }
            let mut last = false;
            if t + h >= t_end {
                h = t_end - t;
                last = true;
            }

            let k1 = f;
            let k2 = field.eval(t + C2 * h, &stage(&y, h, &[(A21, &k1)]));
            let k3 = field.eval(t + C3 * h, &stage(&y, h, &[(A31, &k1), (A32, &k2)]));
            let k4 = field.eval(
                t + C4 * h,
                &stage(&y, h, &[(A41, &k1), (A42, &k2), (A43, &k3)]),
            );
            let k5 = field.eval(
                t + C5 * h,
                &stage(&y, h, &[(A51, &k1), (A52, &k2), (A53, &k3), (A54, &k4)]),
            );
            let k6 = field.eval(
                t + h,
                &stage(
                    &y,
                    h,
                    &[(A61, &k1), (A62, &k2), (A63, &k3), (A64, &k4), (A65, &k5)],
                ),
            );
            let y_new = stage(
                &y,
                h,
                &[(B1, &k1), (B3, &k3), (B4, &k4), (B5, &k5), (B6, &k6)],
            );
            let k7 = field.eval(t + h, &y_new);

            let mut err = [0.0f64; DIM];
            for i in 0..DIM {
                err[i] = h
                    * (E1 * k1[i]
                        + E3 * k3[i]
                        + E4 * k4[i]
                        + E5 * k5[i]
                        + E6 * k6[i]
                        + E7 * k7[i]);
            }

            if !state_is_finite(&y_new) || !state_is_finite(&k7) || !state_is_finite(&err) {
                return Err(ChaosLinkError::Integration {
                    t_reached: t,
                    last_state: y,
                    reason: "non-finite state encountered".to_string(),
                });
            }

            let mut acc = 0.0;
            for i in 0..DIM {
                let scale = cfg.abs_tol + cfg.rel_tol * y[i].abs().max(y_new[i].abs());
                let e = err[i] / scale;
                acc += e * e;
            }
            let err_norm = (acc / DIM as f64).sqrt();

            if err_norm <= 1.0 {
                accepted += 1;

                let mut c2 = [0.0f64; DIM];
                let mut c3 = [0.0f64; DIM];
                let mut c4 = [0.0f64; DIM];
                let mut c5 = [0.0f64; DIM];
                for i in 0..DIM {
                    c2[i] = y_new[i] - y[i];
                    c3[i] = h * k1[i] - c2[i];
                    c4[i] = c2[i] - h * k7[i] - c3[i];
                    c5[i] = h
                        * (D1 * k1[i]
                            + D3 * k3[i]
                            + D4 * k4[i]
                            + D5 * k5[i]
                            + D6 * k6[i]
                            + D7 * k7[i]);
                }
                segments.push(DenseSegment {
                    c1: y,
                    c2,
                    c3,
                    c4,
                    c5,
                });

                t = if last { t_end } else { t + h };
                y = y_new;
                f = k7;
                ts.push(t);
                if last {
                    break;
                }
                h *= (SAFETY * err_norm.powf(-0.2)).clamp(FAC_MIN, FAC_MAX);
            } else {
                rejected += 1;
                h *= (SAFETY * err_norm.powf(-0.2)).clamp(FAC_MIN, 1.0);
            }

            if h < cfg.min_step {
                return Err(ChaosLinkError::Integration {
                    t_reached: t,
                    last_state: y,
                    reason: format!(
                        "step size underflow: h={h:.3e} < min_step={:.3e}",
                        cfg.min_step
                    ),
                });
            }
        }

        log::debug!(
            "dopri5: {accepted} accepted / {rejected} rejected steps over [{}, {}]",
            span.start(),
            span.end()
        );

        Ok(Trajectory::from_segments(span, ts, segments))
    }
}
