// ─────────────────────────────────────────────────────────────────────
// ChaosLink — Masking Dynamics
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Lorenz-family drive/response dynamics for chaotic masking:
//! transmitter and parameter-modulated transmitter vector fields, the
//! signal-driven receiver, and synchronization-error metrics.

pub mod lorenz;
pub mod params;
pub mod sync;

pub use lorenz::{DrivenReceiver, ModulatedTransmitter, Transmitter};
pub use params::{LorenzParams, XY_COUPLING, XZ_COUPLING};
pub use sync::{max_abs, windowed_mean, ErrorSignal};
