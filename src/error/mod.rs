//! Error types for the streaming chat client.
//!
//! - **Transport errors**: failures of the HTTP request or of the body stream
//! - **Exchange errors**: a transport error tagged with the phase it hit,
//!   plus request encoding failures
//! - **Config errors**: missing or invalid environment configuration
//!
//! None of these are ever shown in the transcript. The session records a
//! single apology turn instead and logs the technical detail.

mod config;
mod exchange;
mod transport;

pub use config::ConfigError;
pub use exchange::ExchangeError;
pub use transport::{classify_reqwest_error, TransportError};

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn test_exchange_error_keeps_transport_source() {
        use std::error::Error;

        let err = ExchangeError::Stream(TransportError::Io("reset by peer".to_string()));
        let source = err.source().expect("stream errors carry a source");
        assert_eq!(source.to_string(), "stream read failed: reset by peer");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_retry_logic() {
        let retryable: Vec<ExchangeError> = vec![
            ExchangeError::Request(TransportError::ConnectionFailed("refused".to_string())),
            ExchangeError::Request(TransportError::Timeout("30s".to_string())),
            ExchangeError::Request(TransportError::ServerError {
                status: 503,
                message: "unavailable".to_string(),
            }),
        ];
        for err in retryable {
            assert!(err.is_retryable(), "Expected {:?} to be retryable", err);
        }

        let non_retryable: Vec<ExchangeError> = vec![
            ExchangeError::Request(TransportError::ServerError {
                status: 401,
                message: "unauthorized".to_string(),
            }),
            ExchangeError::Request(TransportError::EmptyBody),
            ExchangeError::Encode("bad".to_string()),
        ];
        for err in non_retryable {
            assert!(!err.is_retryable(), "Expected {:?} to not be retryable", err);
        }
    }
}
