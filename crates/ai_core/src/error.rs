//! Inference errors

use thiserror::Error;

/// Errors that can occur during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Failed to connect to the inference server
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the inference server failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response parsing failed or an expected field was missing
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Timeout during inference
    #[error("Inference timeout after {0}ms")]
    Timeout(u64),

    /// Server reported an error
    #[error("Server error: {0}")]
    ServerError(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl InferenceError {
    /// Classify a transport error, attributing timeouts to the configured
    /// request deadline
    #[must_use]
    pub fn from_reqwest(err: reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout_ms)
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_failed_error_message() {
        let err = InferenceError::ConnectionFailed("refused".to_string());
        assert_eq!(err.to_string(), "Connection failed: refused");
    }

    #[test]
    fn server_error_message() {
        let err = InferenceError::ServerError("model not loaded".to_string());
        assert_eq!(err.to_string(), "Server error: model not loaded");
    }

    #[test]
    fn timeout_error_message() {
        let err = InferenceError::Timeout(60000);
        assert_eq!(err.to_string(), "Inference timeout after 60000ms");
    }

    #[test]
    fn configuration_error_message() {
        let err = InferenceError::Configuration("missing API key".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing API key");
    }
}
