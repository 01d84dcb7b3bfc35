//! Error types
//!
//! Only construction can fail. Collisions and boundary exits are run
//! outcomes, not errors, and inputs that make no sense for the current
//! phase are ignored by the controller.

use thiserror::Error;

/// Errors raised when building simulation entities or loading tuning.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("field dimensions must be positive (got {width:.1}x{height:.1})")]
    NonPositiveField { width: f32, height: f32 },
    #[error("gap size {gap} outside [{min}, {max}]")]
    GapOutOfRange { gap: u32, min: u32, max: u32 },
    #[error("invalid tuning: {field} {reason}")]
    InvalidTuning {
        field: &'static str,
        reason: &'static str,
    },
    #[error("frustration rating must be 1, 2 or 3 (got {0})")]
    InvalidRating(u8),
    #[error("tuning parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors a session recorder may report back to the driver loop.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("session write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("session data encode/decode failed: {0}")]
    Json(#[from] serde_json::Error),
}
