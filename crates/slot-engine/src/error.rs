//! Error types for slot-engine operations.
//!
//! Every variant describes structurally invalid input; there is no other
//! failure mode. "No slots available" is never an error: it is an empty result.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid search window: {0}")]
    InvalidWindow(String),

    #[error("Invalid shift: {0}")]
    InvalidShift(String),

    #[error("Invalid wall time: {0}")]
    InvalidWallTime(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;
