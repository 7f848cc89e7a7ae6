//! Client configuration.
//!
//! Endpoint, credential and default interview mode for a [`crate::session::ChatSession`].
//! Build one directly with the builder methods, or load it from the
//! environment with [`ChatConfig::from_env`].

use std::fmt;

use crate::error::ConfigError;
use crate::models::InterviewMode;
use crate::traits::Headers;

/// Chat endpoint URL (required by `from_env`)
pub const ENV_URL: &str = "INTERVIEW_CHAT_URL";
/// Bearer credential attached to every request (optional)
pub const ENV_API_KEY: &str = "INTERVIEW_CHAT_KEY";
/// Initial interview mode (optional, defaults to general)
pub const ENV_MODE: &str = "INTERVIEW_CHAT_MODE";

/// Configuration for the streaming chat client.
///
/// # Example
///
/// ```
/// use interview_chat::config::ChatConfig;
/// use interview_chat::models::InterviewMode;
///
/// let config = ChatConfig::new("https://example.com/functions/v1/interview-chat")
///     .with_api_key("secret")
///     .with_mode(InterviewMode::Technical);
/// assert_eq!(config.mode, InterviewMode::Technical);
/// ```
#[derive(Clone)]
pub struct ChatConfig {
    /// Full URL of the streaming chat endpoint
    pub endpoint: String,
    /// Opaque bearer credential
    pub api_key: Option<String>,
    /// Mode a new session starts in
    pub mode: InterviewMode,
}

impl ChatConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            mode: InterviewMode::default(),
        }
    }

    /// Set the bearer credential.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the starting interview mode.
    pub fn with_mode(mut self, mode: InterviewMode) -> Self {
        self.mode = mode;
        self
    }

    /// Load configuration from `INTERVIEW_CHAT_URL`, `INTERVIEW_CHAT_KEY`
    /// and `INTERVIEW_CHAT_MODE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint = std::env::var(ENV_URL)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingVar(ENV_URL))?;

        let mut config = Self::new(endpoint.trim());

        if let Some(key) = std::env::var(ENV_API_KEY).ok().filter(|v| !v.is_empty()) {
            config = config.with_api_key(key);
        }

        if let Ok(mode) = std::env::var(ENV_MODE) {
            let mode = mode
                .parse()
                .map_err(|source| ConfigError::InvalidMode {
                    var: ENV_MODE,
                    source,
                })?;
            config = config.with_mode(mode);
        }

        Ok(config)
    }

    /// Headers sent with every chat request.
    pub fn headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "text/event-stream".to_string());
        if let Some(key) = &self.api_key {
            headers.insert("Authorization".to_string(), format!("Bearer {}", key));
        }
        headers
    }
}

// Keep the credential out of logs
impl fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("mode", &self.mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var(ENV_URL);
        std::env::remove_var(ENV_API_KEY);
        std::env::remove_var(ENV_MODE);
    }

    #[test]
    fn test_headers_without_key() {
        let headers = ChatConfig::new("http://localhost").headers();
        assert_eq!(
            headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );
        assert_eq!(headers.get("Accept"), Some(&"text/event-stream".to_string()));
        assert!(!headers.contains_key("Authorization"));
    }

    #[test]
    fn test_headers_with_key() {
        let headers = ChatConfig::new("http://localhost")
            .with_api_key("abc")
            .headers();
        assert_eq!(headers.get("Authorization"), Some(&"Bearer abc".to_string()));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = ChatConfig::new("http://localhost").with_api_key("super-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    #[serial]
    fn test_from_env_requires_url() {
        clear_env();
        assert_eq!(
            ChatConfig::from_env().unwrap_err(),
            ConfigError::MissingVar(ENV_URL)
        );
    }

    #[test]
    #[serial]
    fn test_from_env_reads_all_vars() {
        clear_env();
        std::env::set_var(ENV_URL, "http://localhost:54321/functions/v1/interview-chat");
        std::env::set_var(ENV_API_KEY, "key-1");
        std::env::set_var(ENV_MODE, "behavioral");

        let config = ChatConfig::from_env().unwrap();
        clear_env();

        assert_eq!(
            config.endpoint,
            "http://localhost:54321/functions/v1/interview-chat"
        );
        assert_eq!(config.api_key.as_deref(), Some("key-1"));
        assert_eq!(config.mode, InterviewMode::Behavioral);
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_mode() {
        clear_env();
        std::env::set_var(ENV_URL, "http://localhost");
        std::env::set_var(ENV_MODE, "karaoke");

        let result = ChatConfig::from_env();
        clear_env();

        assert!(matches!(
            result,
            Err(ConfigError::InvalidMode { var: ENV_MODE, .. })
        ));
    }
}
