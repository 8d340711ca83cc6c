// ─────────────────────────────────────────────────────────────────────
// ChaosLink — Dense Trajectory Interpolant
// ─────────────────────────────────────────────────────────────────────
//! Continuous reconstruction of a solved trajectory from per-step dense
//! coefficients. Evaluation is random-access (binary search per query,
//! any order of t); each accepted step carries the Dormand–Prince
//! fourth-order continuous extension, so endpoint states and endpoint
//! derivatives are reproduced exactly and mid-step accuracy tracks the
//! step tolerance.

use std::sync::Arc;

use chaoslink_types::{ChaosLinkError, ChaosLinkResult, Signal, State, TimeSpan, DIM};

/// Dense coefficients of one accepted step over [t_k, t_{k+1}].
///
/// With θ = (t − t_k) / h the interpolant is
///   c1 + θ·(c2 + (1−θ)·(c3 + θ·(c4 + (1−θ)·c5)))
/// which hits y_k at θ=0, y_{k+1} at θ=1, and matches h·f at both ends.
#[derive(Debug, Clone)]
pub(crate) struct DenseSegment {
    pub c1: State,
    pub c2: State,
    pub c3: State,
    pub c4: State,
    pub c5: State,
}

impl DenseSegment {
    fn eval(&self, theta: f64) -> State {
        let theta1 = 1.0 - theta;
        let mut out = [0.0; DIM];
        for i in 0..DIM {
            out[i] = self.c1[i]
                + theta
                    * (self.c2[i]
                        + theta1 * (self.c3[i] + theta * (self.c4[i] + theta1 * self.c5[i])));
        }
        out
    }
}

/// Dense solution of one solve call. Owns its interpolant data; nothing
/// is shared mutably across solves.
#[derive(Debug, Clone)]
pub struct Trajectory {
    span: TimeSpan,
    ts: Vec<f64>,
    segments: Vec<DenseSegment>,
}

impl Trajectory {
    pub(crate) fn from_segments(span: TimeSpan, ts: Vec<f64>, segments: Vec<DenseSegment>) -> Self {
        debug_assert!(ts.len() >= 2);
        debug_assert_eq!(segments.len() + 1, ts.len());
        Self { span, ts, segments }
    }

    pub fn span(&self) -> TimeSpan {
        self.span
    }

    pub fn t_start(&self) -> f64 {
        self.span.start()
    }

    pub fn t_end(&self) -> f64 {
        self.span.end()
    }

    /// Number of accepted solver nodes backing the interpolant.
    pub fn node_count(&self) -> usize {
        self.ts.len()
    }

    /// Full state at time t. Queries outside the span clamp to the
    /// nearest endpoint.
    pub fn state_at(&self, t: f64) -> State {
        let t = self.span.clamp(t);
        let n = self.ts.len();

        // partition_point returns the first index with ts[i] > t, so the
        // enclosing segment is i-1; the final node falls through to the
        // last segment at θ = 1.
        let i = self.ts.partition_point(|&tk| tk <= t);
        let seg_idx = i.saturating_sub(1).min(self.segments.len() - 1);

        let (t0, t1) = (self.ts[seg_idx], self.ts[seg_idx + 1]);
        let h = t1 - t0;
        if h <= 0.0 {
            return self.segments[seg_idx].c1;
        }
        let theta = ((t - t0) / h).clamp(0.0, 1.0);
        self.segments[seg_idx].eval(theta)
    }
}

/// One coordinate of a trajectory, viewed as a scalar signal.
///
/// Holds an `Arc` to the backing trajectory so the interpolant outlives
/// the solve call that produced it.
#[derive(Clone)]
pub struct Component {
    traj: Arc<Trajectory>,
    index: usize,
}

impl Component {
    pub fn new(traj: Arc<Trajectory>, index: usize) -> ChaosLinkResult<Self> {
        if index >= DIM {
            return Err(ChaosLinkError::InvalidArgument(format!(
                "component index must be < {DIM}, got {index}"
            )));
        }
        Ok(Self { traj, index })
    }

    pub fn trajectory(&self) -> &Arc<Trajectory> {
        &self.traj
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl Signal for Component {
    fn value_at(&self, t: f64) -> f64 {
        self.traj.state_at(t)[self.index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Dense segment equivalent to a cubic Hermite over (y0, f0, y1, f1).
    fn hermite_segment(y0: State, f0: State, y1: State, f1: State, h: f64) -> DenseSegment {
        let mut c2 = [0.0; DIM];
        let mut c3 = [0.0; DIM];
        let mut c4 = [0.0; DIM];
        for i in 0..DIM {
            c2[i] = y1[i] - y0[i];
            c3[i] = h * f0[i] - c2[i];
            c4[i] = c2[i] - h * f1[i] - c3[i];
        }
        DenseSegment {
            c1: y0,
            c2,
            c3,
            c4,
            c5: [0.0; DIM],
        }
    }

    fn line_trajectory() -> Trajectory {
        // y(t) = (t, 2t, -t) over two unit segments.
        let span = TimeSpan::new(0.0, 2.0).unwrap();
        let f = [1.0, 2.0, -1.0];
        let segments = vec![
            hermite_segment([0.0, 0.0, 0.0], f, [1.0, 2.0, -1.0], f, 1.0),
            hermite_segment([1.0, 2.0, -1.0], f, [2.0, 4.0, -2.0], f, 1.0),
        ];
        Trajectory::from_segments(span, vec![0.0, 1.0, 2.0], segments)
    }

    #[test]
    fn test_nodes_reproduced_exactly() {
        let traj = line_trajectory();
        assert_eq!(traj.state_at(1.0), [1.0, 2.0, -1.0]);
        assert_eq!(traj.state_at(0.0), [0.0, 0.0, 0.0]);
        assert_eq!(traj.state_at(2.0), [2.0, 4.0, -2.0]);
    }

    #[test]
    fn test_linear_reproduced_between_nodes() {
        let traj = line_trajectory();
        let u = traj.state_at(0.25);
        assert!((u[0] - 0.25).abs() < 1e-12);
        assert!((u[1] - 0.5).abs() < 1e-12);
        assert!((u[2] + 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_random_access_order_independent() {
        let traj = line_trajectory();
        let forward: Vec<f64> = [0.3, 0.9, 1.7].iter().map(|&t| traj.state_at(t)[0]).collect();
        let backward: Vec<f64> = [1.7, 0.9, 0.3].iter().map(|&t| traj.state_at(t)[0]).collect();
        assert_eq!(forward[0], backward[2]);
        assert_eq!(forward[1], backward[1]);
        assert_eq!(forward[2], backward[0]);
    }

    #[test]
    fn test_out_of_span_clamps() {
        let traj = line_trajectory();
        assert_eq!(traj.state_at(-5.0), traj.state_at(0.0));
        assert_eq!(traj.state_at(99.0), traj.state_at(2.0));
    }

    #[test]
    fn test_component_signal() {
        let traj = Arc::new(line_trajectory());
        let y = Component::new(traj.clone(), 1).unwrap();
        assert!((y.value_at(1.5) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_component_index_out_of_range() {
        let traj = Arc::new(line_trajectory());
        assert!(Component::new(traj, 3).is_err());
    }
}
