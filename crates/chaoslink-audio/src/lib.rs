// ─────────────────────────────────────────────────────────────────────
// ChaosLink — Audio Collaborator
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Audio sample I/O for message signals: WAV read/write, the sampled
//! signal lookup, and seeded Gaussian channel noise. The codec core
//! only ever sees `Signal` implementations and plain sample vectors.

pub mod noise;
pub mod wav;

pub use noise::{GaussianNoise, NoiseConfig};
pub use wav::{read_message, write_message, LoadedMessage, SampledSignal};
