//! Error types for the OneLogin SDK

use serde_json::Value;
use thiserror::Error;

/// Result type alias for the OneLogin SDK
pub type Result<T> = std::result::Result<T, Error>;

/// OneLogin SDK errors
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Token endpoint rejected the client credentials or returned garbage
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Resource endpoint answered with a non-2xx status
    #[error("Request failed: HTTP {status} {status_text}")]
    Request {
        /// HTTP status code
        status: u16,
        /// Reason phrase reported by the transport
        status_text: String,
        /// Decoded response body
        body: Value,
    },

    /// Transport adapter could not build the request
    #[error("Transport error: {0}")]
    Transport(String),

    /// reqwest failed to build the client, send the request or read the body
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Build a [`Error::Request`] from a failed response
    pub fn request(status: u16, status_text: impl Into<String>, body: Value) -> Self {
        Self::Request {
            status,
            status_text: status_text.into(),
            body,
        }
    }

    /// True for failures raised while performing a resource request
    #[must_use]
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            Self::Request { .. } | Self::Transport(_) | Self::Http(_)
        )
    }

    /// HTTP status of the failed response, if there was one
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
