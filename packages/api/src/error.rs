//! Standard error envelope.

use serde::{Deserialize, Serialize};

/// `chrono` format string for [`ErrorResponse::timestamp`], e.g. `2026-10-19 14:03:22`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The JSON body returned for all error responses.
///
/// ```json
/// { "success": false, "text": "2 emails are already being friend", "timestamp": "2026-10-19 14:03:22" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,

    /// Human-readable description of the problem, surfaced verbatim from the
    /// validation or relation layer.
    pub text: String,

    /// Local wall-clock time the error was produced, in [`TIMESTAMP_FORMAT`].
    pub timestamp: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] stamped with the current local time.
    pub fn new(text: impl Into<String>) -> Self {
        Self::at(text, chrono::Local::now().format(TIMESTAMP_FORMAT).to_string())
    }

    /// Construct an [`ErrorResponse`] with an explicit timestamp.
    pub fn at(text: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            success: false,
            text: text.into(),
            timestamp: timestamp.into(),
        }
    }
}
