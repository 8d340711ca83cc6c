// ─────────────────────────────────────────────────────────────────────
// ChaosLink — Drive/Response Vector Fields
// ─────────────────────────────────────────────────────────────────────
//! The masking Lorenz family in its three roles:
//!
//! Transmitter (autonomous):
//!   ẋ = σ(y − x);  ẏ = r·x − y − 20·x·z;  ż = 5·x·y − b·z
//!
//! Modulated transmitter: identical, with b replaced by a signal b(t)
//! (binary parameter modulation).
//!
//! Receiver, driven by a received scalar m(t):
//!   ẋ_R = σ(y_R − x_R);  ẏ_R = r·m − y_R − 20·m·z_R;  ż_R = 5·m·y_R − b·z_R
//!
//! x_R is reconstructed entirely from the drive rather than from the
//! receiver's own x, which is what forces x_R onto the transmitter's
//! trajectory regardless of the receiver's initial condition.
//!
//! All three fields are pure. Non-finite states are not caught here;
//! they surface through the integrator's solve status.

use chaoslink_types::{Signal, State, VectorField};

use crate::params::{LorenzParams, XY_COUPLING, XZ_COUPLING};

/// Autonomous masking transmitter.
#[derive(Debug, Clone, Copy)]
pub struct Transmitter {
    pub params: LorenzParams,
}

impl Transmitter {
    pub fn new(params: LorenzParams) -> Self {
        Self { params }
    }
}

impl VectorField for Transmitter {
    fn eval(&self, _t: f64, u: &State) -> State {
        let [x, y, z] = *u;
        let p = &self.params;
        [
            p.sigma * (y - x),
            p.r * x - y - XZ_COUPLING * x * z,
            XY_COUPLING * x * y - p.b * z,
        ]
    }
}

/// Transmitter with time-varying damping b(t).
///
/// The static `b` of the parameter set is ignored; σ and r are kept.
pub struct ModulatedTransmitter<B: Signal> {
    pub params: LorenzParams,
    pub b_of_t: B,
}

impl<B: Signal> ModulatedTransmitter<B> {
    pub fn new(params: LorenzParams, b_of_t: B) -> Self {
        Self { params, b_of_t }
    }
}

impl<B: Signal> VectorField for ModulatedTransmitter<B> {
    fn eval(&self, t: f64, u: &State) -> State {
        let [x, y, z] = *u;
        let p = &self.params;
        [
            p.sigma * (y - x),
            p.r * x - y - XZ_COUPLING * x * z,
            XY_COUPLING * x * y - self.b_of_t.value_at(t) * z,
        ]
    }
}

/// Receiver driven by the received scalar signal.
pub struct DrivenReceiver<S: Signal> {
    pub params: LorenzParams,
    pub drive: S,
}

impl<S: Signal> DrivenReceiver<S> {
    pub fn new(params: LorenzParams, drive: S) -> Self {
        Self { params, drive }
    }
}

impl<S: Signal> VectorField for DrivenReceiver<S> {
    fn eval(&self, t: f64, u: &State) -> State {
        let [x, y, z] = *u;
        let p = &self.params;
        let m = self.drive.value_at(t);
        [
            p.sigma * (y - x),
            p.r * m - y - XZ_COUPLING * m * z,
            XY_COUPLING * m * y - p.b * z,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaoslink_types::ConstSignal;

    fn rk4_step<F: VectorField>(field: &F, t: f64, u: &State, dt: f64) -> State {
        let k1 = field.eval(t, u);
        let k2 = field.eval(
            t + 0.5 * dt,
            &[
                u[0] + 0.5 * dt * k1[0],
                u[1] + 0.5 * dt * k1[1],
                u[2] + 0.5 * dt * k1[2],
            ],
        );
        let k3 = field.eval(
            t + 0.5 * dt,
            &[
                u[0] + 0.5 * dt * k2[0],
                u[1] + 0.5 * dt * k2[1],
                u[2] + 0.5 * dt * k2[2],
            ],
        );
        let k4 = field.eval(
            t + dt,
            &[u[0] + dt * k3[0], u[1] + dt * k3[1], u[2] + dt * k3[2]],
        );
        let mut next = *u;
        for i in 0..3 {
            next[i] += dt / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
        }
        next
    }

    #[test]
    fn test_transmitter_field_formula() {
        let tx = Transmitter::new(LorenzParams::CUOMO);
        let du = tx.eval(0.0, &[1.0, 2.0, 3.0]);
        // σ(y−x) = 16·1; r·x − y − 20·x·z = 45.6 − 2 − 60; 5·x·y − b·z = 10 − 12
        assert!((du[0] - 16.0).abs() < 1e-12);
        assert!((du[1] - (45.6 - 2.0 - 60.0)).abs() < 1e-12);
        assert!((du[2] - (10.0 - 12.0)).abs() < 1e-12);
    }

    #[test]
    fn test_modulated_matches_constant_b() {
        let p = LorenzParams::CUOMO;
        let fixed = Transmitter::new(p);
        let modulated = ModulatedTransmitter::new(p, ConstSignal(p.b));
        let u = [2.2, 1.3, 2.0];
        let a = fixed.eval(0.7, &u);
        let b = modulated.eval(0.7, &u);
        for i in 0..3 {
            assert!((a[i] - b[i]).abs() < 1e-12, "component {i}: {} vs {}", a[i], b[i]);
        }
    }

    #[test]
    fn test_receiver_field_uses_drive_not_own_x() {
        let p = LorenzParams::CUOMO;
        let rx = DrivenReceiver::new(p, ConstSignal(7.0));
        let du = rx.eval(0.0, &[1.0, 2.0, 3.0]);
        // ẏ_R = r·m − y − 20·m·z with m = 7, not x = 1
        assert!((du[1] - (45.6 * 7.0 - 2.0 - 20.0 * 7.0 * 3.0)).abs() < 1e-9);
        // ż_R = 5·m·y − b·z
        assert!((du[2] - (5.0 * 7.0 * 2.0 - 4.0 * 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_driven_receiver_synchronizes() {
        // Co-integrate transmitter and receiver with a fixed-step RK4
        // loop, feeding the receiver the transmitter's x linearly
        // interpolated across each step. The x-error must collapse
        // despite distinct initial conditions.
        use chaoslink_types::FnSignal;

        let p = LorenzParams::CUOMO;
        let tx = Transmitter::new(p);
        let dt = 1e-3;
        let mut u_t: State = [2.2, 1.3, 2.0];
        let mut u_r: State = [10.2, 7.3, 6.0];
        let initial_err = (u_t[0] - u_r[0]).abs();

        let mut t = 0.0;
        for _ in 0..10_000 {
            let next_t = rk4_step(&tx, t, &u_t, dt);
            let (t0, x0, x1) = (t, u_t[0], next_t[0]);
            let drive = FnSignal::new(move |tau| x0 + (x1 - x0) * (tau - t0) / dt);
            let rx = DrivenReceiver::new(p, drive);
            u_r = rk4_step(&rx, t, &u_r, dt);
            u_t = next_t;
            t += dt;
        }

        let final_err = (u_t[0] - u_r[0]).abs();
        assert!(
            final_err < 1e-2 * initial_err,
            "x-error should collapse: initial {initial_err}, final {final_err}"
        );
        assert!(u_t.iter().all(|v| v.is_finite()));
        assert!(u_r.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_transmitter_stays_bounded() {
        // The masking attractor is bounded; a short RK4 run must not blow up.
        let tx = Transmitter::new(LorenzParams::CUOMO);
        let mut u: State = [2.2, 1.3, 2.0];
        let mut t = 0.0;
        let dt = 1e-3;
        for _ in 0..5_000 {
            u = rk4_step(&tx, t, &u, dt);
            t += dt;
        }
        assert!(u.iter().all(|v| v.is_finite()), "state diverged: {u:?}");
        assert!(u[0].abs() < 200.0 && u[1].abs() < 200.0 && u[2].abs() < 200.0);
    }
}
