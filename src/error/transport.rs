//! Transport-level errors.
//!
//! These cover everything that can go wrong between issuing the POST and
//! reading the last byte of the response body.

use thiserror::Error;

/// HTTP transport errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection could not be established
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Request or read timed out in the underlying client
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Server answered with a non-success status
    #[error("server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Server answered with a success status but no body to stream
    #[error("response had no body")]
    EmptyBody,

    /// The body stream failed after it had started
    #[error("stream read failed: {0}")]
    Io(String),

    /// The endpoint URL could not be used
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Check if the error is likely transient.
    ///
    /// Nothing in this crate retries; the flag is recorded in logs so an outer
    /// layer can decide.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::ConnectionFailed(_)
            | TransportError::Timeout(_)
            | TransportError::Io(_) => true,
            TransportError::ServerError { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Whether the server answered with a 5xx status.
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|status| status >= 500)
    }

    /// HTTP status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Classify a reqwest error into a [`TransportError`].
pub fn classify_reqwest_error(err: &reqwest::Error) -> TransportError {
    if err.is_builder() {
        TransportError::InvalidUrl(err.to_string())
    } else if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_connect() {
        TransportError::ConnectionFailed(err.to_string())
    } else if let Some(status) = err.status() {
        TransportError::ServerError {
            status: status.as_u16(),
            message: err.to_string(),
        }
    } else if err.is_body() || err.is_decode() {
        TransportError::Io(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}
