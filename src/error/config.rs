use thiserror::Error;

use crate::models::ParseModeError;

/// Errors raised while loading [`crate::config::ChatConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("invalid value for {var}: {source}")]
    InvalidMode {
        var: &'static str,
        #[source]
        source: ParseModeError,
    },
}
