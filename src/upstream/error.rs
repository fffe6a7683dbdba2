//! Upstream failure taxonomy.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while talking to the upstream user API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The HTTP client could not be constructed.
    #[error("failed to build upstream client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connecting, sending or waiting for the response failed (includes timeouts).
    #[error("upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The upstream answered with a status the operation does not accept.
    #[error("upstream returned unexpected status {status}")]
    Status {
        status: StatusCode,
        /// Raw dump of the upstream response (status line, headers, body).
        details: String,
    },

    /// The upstream reported that the resource does not exist.
    #[error("upstream resource not found")]
    NotFound,

    /// The response body could not be read.
    #[error("failed to read upstream body: {0}")]
    Body(#[source] reqwest::Error),

    /// The outbound payload could not be serialized.
    #[error("failed to encode upstream request: {0}")]
    Encode(#[source] serde_json::Error),

    /// The response body was not the expected JSON shape.
    #[error("failed to decode upstream body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl UpstreamError {
    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Client(_) => "client",
            UpstreamError::Transport(e) if e.is_timeout() => "timeout",
            UpstreamError::Transport(_) => "transport",
            UpstreamError::Status { .. } => "status",
            UpstreamError::NotFound => "not_found",
            UpstreamError::Body(_) => "body",
            UpstreamError::Encode(_) => "encode",
            UpstreamError::Decode(_) => "decode",
        }
    }
}

/// Result alias for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;
