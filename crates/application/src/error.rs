//! Application-level errors

use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// The request payload is unusable
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Speech recognition failed
    #[error("Transcription error: {0}")]
    Transcription(String),

    /// Language model inference failed
    #[error("Inference error: {0}")]
    Inference(String),

    /// Speech synthesis failed
    #[error("Synthesis error: {0}")]
    Synthesis(String),

    /// Persisting synthesized audio failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check whether the failure sits in a backing service rather than the
    /// request itself
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Transcription(_) | Self::Inference(_) | Self::Synthesis(_)
        )
    }
}

impl From<ai_core::InferenceError> for ApplicationError {
    fn from(err: ai_core::InferenceError) -> Self {
        Self::Inference(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_classification() {
        assert!(ApplicationError::Transcription("x".to_string()).is_upstream());
        assert!(ApplicationError::Inference("x".to_string()).is_upstream());
        assert!(ApplicationError::Synthesis("x".to_string()).is_upstream());
        assert!(!ApplicationError::InvalidInput("x".to_string()).is_upstream());
        assert!(!ApplicationError::Storage("x".to_string()).is_upstream());
    }

    #[test]
    fn inference_error_converts() {
        let err: ApplicationError = ai_core::InferenceError::ServerError("boom".to_string()).into();
        assert!(matches!(err, ApplicationError::Inference(_)));
    }
}
