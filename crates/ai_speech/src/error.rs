//! Speech processing errors

use thiserror::Error;

/// Errors that can occur during speech processing
#[derive(Debug, Error)]
pub enum SpeechError {
    /// The recognition service did not complete the handshake in time
    #[error("Recognition service connect timeout after {0}ms")]
    ConnectTimeout(u64),

    /// No result or error arrived before the result timeout elapsed
    #[error("No recognition result after {0}ms")]
    ResultTimeout(u64),

    /// The recognition service reported an explicit error payload
    #[error("Recognition service error: {0}")]
    RemoteError(String),

    /// The connection closed before any result or error was delivered
    #[error("Connection closed before result: {0}")]
    PrematureClose(String),

    /// A received message could not be parsed as the expected payload
    #[error("Failed to decode recognition message: {0}")]
    DecodeError(String),

    /// Failed to connect to a speech service
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to a speech service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Invalid response from a speech service
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Transcription failed
    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    /// Synthesis failed
    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

// `ResultTimeout` is reserved for the recognition session, where the
// configured deadline is known; HTTP deadline errors keep their own message.
impl From<reqwest::Error> for SpeechError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
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
    fn connect_timeout_error_message() {
        let err = SpeechError::ConnectTimeout(5000);
        assert_eq!(err.to_string(), "Recognition service connect timeout after 5000ms");
    }

    #[test]
    fn result_timeout_error_message() {
        let err = SpeechError::ResultTimeout(30000);
        assert_eq!(err.to_string(), "No recognition result after 30000ms");
    }

    #[test]
    fn remote_error_preserves_message() {
        let err = SpeechError::RemoteError("decode failed".to_string());
        assert_eq!(err.to_string(), "Recognition service error: decode failed");
    }

    #[test]
    fn premature_close_error_message() {
        let err = SpeechError::PrematureClose("going away".to_string());
        assert_eq!(err.to_string(), "Connection closed before result: going away");
    }

    #[test]
    fn decode_error_message() {
        let err = SpeechError::DecodeError("not json".to_string());
        assert_eq!(err.to_string(), "Failed to decode recognition message: not json");
    }

    #[test]
    fn synthesis_failed_error_message() {
        let err = SpeechError::SynthesisFailed("invalid text".to_string());
        assert_eq!(err.to_string(), "Synthesis failed: invalid text");
    }
}
