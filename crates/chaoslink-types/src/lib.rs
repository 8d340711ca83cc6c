// ─────────────────────────────────────────────────────────────────────
// ChaosLink — Transceiver Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, and error hierarchy for ChaosLink —
//! covert messaging over synchronized chaotic carriers.

pub mod config;
pub mod error;
pub mod signal;
pub mod state;

pub use config::SolverConfig;
pub use error::{ChaosLinkError, ChaosLinkResult};
pub use signal::{sample_uniform, ConstSignal, FnSignal, Signal};
pub use state::{state_is_finite, State, TimeSpan, VectorField, DIM};
