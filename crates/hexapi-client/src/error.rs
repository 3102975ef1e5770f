//! Error types for hexapi-client

use hexapi_core::CoreError;
use serde_json::Value;
use thiserror::Error;

/// Errors returned by the catalogue clients.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connection, timeout, body decoding).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error while writing downloaded images.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload or response handling failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The authentication server rejected the API key.
    #[error("API key rejected: {body}")]
    Unauthorized { body: Value },

    /// The token is valid but does not grant access to this resource.
    #[error("Access forbidden: {url}")]
    Forbidden { url: String },

    /// Any other non-success status.
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// The account has no contract attached.
    #[error("No contract id found for this account")]
    MissingContract,

    /// The feature has no quicklook matching the request.
    #[error("Feature has no quicklook")]
    MissingQuicklook,

    /// None of the account's subscriptions has a consumption limit.
    #[error("There is no limited subscription for this user")]
    NoLimitedSubscriptions,

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status behind the error, when there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } | Self::Forbidden { .. } => Some(403),
            Self::Status { status, .. } => Some(*status),
            Self::NoLimitedSubscriptions => {
                Some(hexapi_core::usage::NO_LIMITED_SUBSCRIPTIONS_STATUS)
            }
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
