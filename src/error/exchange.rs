use thiserror::Error;

use super::TransportError;

/// Why a single exchange ended in failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    /// The request was rejected before any body arrived
    #[error("request failed: {0}")]
    Request(#[source] TransportError),

    /// The body stream broke after streaming began
    #[error("stream interrupted: {0}")]
    Stream(#[source] TransportError),

    /// The request body could not be encoded
    #[error("failed to encode request: {0}")]
    Encode(String),
}

impl ExchangeError {
    pub fn is_retryable(&self) -> bool {
        match self {
            ExchangeError::Request(e) | ExchangeError::Stream(e) => e.is_retryable(),
            ExchangeError::Encode(_) => false,
        }
    }

    /// Whether any part of the response had been streamed before failing.
    pub fn during_stream(&self) -> bool {
        matches!(self, ExchangeError::Stream(_))
    }
}

impl From<serde_json::Error> for ExchangeError {
    fn from(e: serde_json::Error) -> Self {
        ExchangeError::Encode(e.to_string())
    }
}
