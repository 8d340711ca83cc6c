// ─────────────────────────────────────────────────────────────────────
// ChaosLink — Message Codecs
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Message codecs over synchronized chaotic carriers:
//!
//! - Continuous masking: the transmitter's x-trajectory masks a scaled
//!   message; the receiver reconstructs the carrier by synchronization
//!   and recovers the message by subtraction.
//! - Binary parameter modulation: a bit string drives the transmitter's
//!   b parameter; the receiver detects each bit from the magnitude of
//!   its synchronization error.

pub mod binary;
pub mod continuous;

pub use binary::{
    decrypt_binary, embed_binary, threshold_bits, BitModulation, BitStepSignal,
};
pub use continuous::{
    embed_message, recover_message, receiver_trajectory, transmitter_trajectory, EmbedConfig,
    RecoverConfig, RecoveredMessage, SecretMessage,
};
