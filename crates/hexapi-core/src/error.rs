//! Error type for hexapi-core.

use thiserror::Error;

/// Errors produced while building payloads or decoding responses.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A bounding box string could not be parsed.
    #[error("Invalid bounding box '{input}': {reason}")]
    InvalidBoundingBox { input: String, reason: String },

    /// A response body did not have the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
