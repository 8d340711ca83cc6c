// ─────────────────────────────────────────────────────────────────────
// ChaosLink — Integration Service
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Adaptive Dormand–Prince 5(4) integration producing dense,
//! component-selectable trajectories. Failures carry the failing time
//! and last good state; a solve never reports a truncated success.

pub mod dopri;
pub mod trajectory;

pub use dopri::Dopri5;
pub use trajectory::{Component, Trajectory};
