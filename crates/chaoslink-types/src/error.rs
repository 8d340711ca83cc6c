// ─────────────────────────────────────────────────────────────────────
// ChaosLink — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

use crate::state::State;

/// Root error type for all ChaosLink failures.
#[derive(Error, Debug)]
pub enum ChaosLinkError {
    /// Malformed caller input (time span, tolerances, bit strings).
    /// Raised before any integration is attempted.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The adaptive solver could not continue. Carries the last time it
    /// reached and the last finite state, never a truncated "success".
    #[error("integration failure at t={t_reached}: {reason}")]
    Integration {
        t_reached: f64,
        last_state: State,
        reason: String,
    },

    /// Solve exceeded its wall-clock deadline.
    #[error("timeout: solve exceeded {deadline_ms}ms deadline")]
    Timeout { deadline_ms: u64 },

    /// Audio container read/write failed.
    #[error("audio error: {0}")]
    Audio(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),
}

pub type ChaosLinkResult<T> = Result<T, ChaosLinkError>;
