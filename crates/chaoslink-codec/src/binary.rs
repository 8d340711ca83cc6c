// ─────────────────────────────────────────────────────────────────────
// ChaosLink — Binary Parameter-Modulation Codec
// ─────────────────────────────────────────────────────────────────────
//! Bits ride on the transmitter's b parameter: b(t) holds `level_one`
//! during '1' windows and `level_zero` during '0' windows. The receiver
//! integrates with its fixed assumed b; windows where the parameters
//! matched synchronize (squared error near zero), mismatched windows do
//! not, and thresholding the windowed error recovers the bits.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use chaoslink_dynamics::{
    windowed_mean, DrivenReceiver, ErrorSignal, LorenzParams, ModulatedTransmitter,
};
use chaoslink_solver::{Component, Dopri5};
use chaoslink_types::{
    ChaosLinkError, ChaosLinkResult, Signal, SolverConfig, State, TimeSpan,
};

/// Modulation shape for the bit step function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BitModulation {
    /// Seconds each bit occupies. Default: 2.0.
    pub time_length: f64,
    /// b value encoding '0' — also the receiver's assumed parameter.
    /// Default: 4.0.
    pub level_zero: f64,
    /// b value encoding '1'. Default: 4.4.
    pub level_one: f64,
}

impl Default for BitModulation {
    fn default() -> Self {
        Self {
            time_length: 2.0,
            level_zero: 4.0,
            level_one: 4.4,
        }
    }
}

impl BitModulation {
    pub fn validate(&self) -> ChaosLinkResult<()> {
        if !(self.time_length.is_finite() && self.time_length > 0.0) {
            return Err(ChaosLinkError::Config(format!(
                "time_length must be finite and > 0, got {}",
                self.time_length
            )));
        }
        for (name, v) in [("level_zero", self.level_zero), ("level_one", self.level_one)] {
            if !(v.is_finite() && v > 0.0) {
                return Err(ChaosLinkError::Config(format!(
                    "{name} must be finite and > 0 (it acts as the damping b), got {v}"
                )));
            }
        }
        if self.level_zero == self.level_one {
            log::warn!("bit levels are equal; the error signal cannot separate bits");
        }
        Ok(())
    }
}

/// A bit string as a step function of time.
///
/// t maps to the bit at index floor(t / time_length), 0-indexed. Any t
/// outside [0, time_length·len) — including negative t — maps to
/// `level_zero`. That out-of-range default is deliberate: outside the
/// message window the transmitter runs at the receiver's assumed
/// parameter instead of failing.
#[derive(Debug, Clone)]
pub struct BitStepSignal {
    bits: Vec<bool>,
    modulation: BitModulation,
}

impl BitStepSignal {
    pub fn from_bits(s: &str, modulation: BitModulation) -> ChaosLinkResult<Self> {
        modulation.validate()?;
        let mut bits = Vec::with_capacity(s.len());
        for (i, c) in s.chars().enumerate() {
            match c {
                '0' => bits.push(false),
                '1' => bits.push(true),
                other => {
                    return Err(ChaosLinkError::InvalidArgument(format!(
                        "bit string may contain only '0' and '1', found {other:?} at position {i}"
                    )))
                }
            }
        }
        Ok(Self { bits, modulation })
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Seconds covered by the encoded bits.
    pub fn duration(&self) -> f64 {
        self.modulation.time_length * self.bits.len() as f64
    }

    pub fn modulation(&self) -> &BitModulation {
        &self.modulation
    }
}

impl Signal for BitStepSignal {
    fn value_at(&self, t: f64) -> f64 {
        if t < 0.0 {
            return self.modulation.level_zero;
        }
        let idx = (t / self.modulation.time_length).floor() as usize;
        match self.bits.get(idx) {
            Some(true) => self.modulation.level_one,
            _ => self.modulation.level_zero,
        }
    }
}

/// Transmit bits by parameter modulation.
///
/// Solves the transmitter with b replaced by `b_of_t` and returns the
/// x-component — the transmitted signal. The static b of `params` is
/// ignored.
pub fn embed_binary(
    u0: State,
    params: LorenzParams,
    span: TimeSpan,
    b_of_t: Arc<dyn Signal>,
    cfg: &SolverConfig,
) -> ChaosLinkResult<Component> {
    params.validate()?;
    let solver = Dopri5::new(cfg.clone())?;
    let tx = ModulatedTransmitter::new(params, b_of_t);
    let traj = Arc::new(solver.solve(&tx, u0, span)?);
    Component::new(traj, 0)
}

/// Detect parameter modulation from the receiver's synchronization error.
///
/// Solves the receiver with the fixed scalar b of `params`, driven by
/// the received signal, and returns (secret(t) − x_R(t))². Near-zero
/// windows mean the transmitted b matched (bit 0); large windows mean
/// mismatch (bit 1). Thresholding is the consumer's decision — see
/// [`threshold_bits`].
pub fn decrypt_binary(
    u0: State,
    params: LorenzParams,
    span: TimeSpan,
    secret: Arc<dyn Signal>,
    cfg: &SolverConfig,
) -> ChaosLinkResult<ErrorSignal<Arc<dyn Signal>, Component>> {
    params.validate()?;
    let solver = Dopri5::new(cfg.clone())?;
    let rx = DrivenReceiver::new(params, secret.clone());
    let traj = Arc::new(solver.solve(&rx, u0, span)?);
    let receiver_x = Component::new(traj, 0)?;
    Ok(ErrorSignal::squared(secret, receiver_x))
}

/// Threshold a synchronization-error signal back into bits.
///
/// Averages the error over the second half of each bit window (the
/// first half carries the resynchronization transient from the
/// preceding window) and reads mean > threshold as '1'.
pub fn threshold_bits(
    error: &dyn Signal,
    n_bits: usize,
    time_length: f64,
    threshold: f64,
    samples_per_window: usize,
) -> ChaosLinkResult<Vec<bool>> {
    if !(time_length.is_finite() && time_length > 0.0) {
        return Err(ChaosLinkError::InvalidArgument(format!(
            "time_length must be finite and > 0, got {time_length}"
        )));
    }
    if !(threshold.is_finite() && threshold > 0.0) {
        return Err(ChaosLinkError::InvalidArgument(format!(
            "threshold must be finite and > 0, got {threshold}"
        )));
    }
    if samples_per_window == 0 {
        return Err(ChaosLinkError::InvalidArgument(
            "samples_per_window must be > 0".to_string(),
        ));
    }

    let mut bits = Vec::with_capacity(n_bits);
    for k in 0..n_bits {
        let t_mid = (k as f64 + 0.5) * time_length;
        let t_end = (k as f64 + 1.0) * time_length;
        let mean = windowed_mean(error, t_mid, t_end, samples_per_window);
        bits.push(mean > threshold);
    }
    Ok(bits)
}
