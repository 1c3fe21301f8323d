//! Error types for the YandexGPT client.

use thiserror::Error;

/// Result type for YandexGPT client operations.
pub type Result<T> = std::result::Result<T, YandexGptError>;

/// YandexGPT client errors.
#[derive(Debug, Error)]
pub enum YandexGptError {
    /// Configuration error (missing API key or folder id)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// API error (non-2xx response, quota exceeded, invalid request)
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl YandexGptError {
    /// Whether a retry has a reasonable chance of succeeding.
    ///
    /// Network failures, throttling (429) and server-side errors (5xx) are
    /// transient; configuration, client and parse errors are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::Config(_) | Self::Parse(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(YandexGptError::Network("reset".into()).is_transient());
        assert!(YandexGptError::Api { status: 429, message: "slow down".into() }.is_transient());
        assert!(YandexGptError::Api { status: 503, message: "unavailable".into() }.is_transient());
        assert!(!YandexGptError::Api { status: 400, message: "bad".into() }.is_transient());
        assert!(!YandexGptError::Config("no key".into()).is_transient());
        assert!(!YandexGptError::Parse("garbage".into()).is_transient());
    }

    #[test]
    fn test_api_error_display() {
        let err = YandexGptError::Api { status: 401, message: "unauthorized".into() };
        assert_eq!(err.to_string(), "API error (401): unauthorized");
    }
}
