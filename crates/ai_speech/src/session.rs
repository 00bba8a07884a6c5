//! Single-use recognition session state machine
//!
//! One session binds one utterance to one connection attempt. The session
//! holds a completion slot that is written at most once: whichever network
//! event resolves first (result message, error message, close, transport
//! error, or the result timeout) wins, and every later event is discarded.
//! Network delivery order after a close is not guaranteed clean, so the
//! terminal-state guard is load-bearing, not defensive decoration.
//!
//! The state machine is pure (no I/O); the websocket driver in
//! `providers::funasr` feeds it events and stops on the first resolution.

use serde::Deserialize;

use crate::error::SpeechError;

/// Outcome of one recognition exchange: transcript text or a typed failure
pub type SessionResult = Result<String, SpeechError>;

/// Structured payload from the recognition service
///
/// Each message carries either a `text` field (result) or an `error` field
/// (failure). Messages with neither are ignored.
#[derive(Debug, Deserialize)]
struct RecognitionPayload {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Lifecycle state of a recognition session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    /// Audio sent, awaiting the first resolving message
    AwaitingResult,
    /// Terminal; the completion slot has been written
    Completed,
}

/// Tracks the single-resolution completion of one recognition exchange
///
/// Every observer method returns `Some(result)` exactly once, on the event
/// that transitions the session into its terminal state; all later calls
/// return `None` regardless of the event.
#[derive(Debug)]
pub struct RecognitionSession {
    state: SessionState,
}

impl Default for RecognitionSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RecognitionSession {
    /// Create a session awaiting its first resolving event
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: SessionState::AwaitingResult,
        }
    }

    /// Check whether the session has reached a terminal state
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Completed
    }

    /// Observe a text frame from the service
    ///
    /// Resolves on the first frame carrying a `text` or `error` field. A
    /// frame with neither field keeps the session waiting; an unparseable
    /// frame resolves to `DecodeError`.
    pub fn on_text_frame(&mut self, payload: &str) -> Option<SessionResult> {
        if self.is_completed() {
            return None;
        }

        let parsed: RecognitionPayload = match serde_json::from_str(payload) {
            Ok(parsed) => parsed,
            Err(e) => return self.resolve(Err(SpeechError::DecodeError(e.to_string()))),
        };

        if let Some(error) = parsed.error {
            return self.resolve(Err(SpeechError::RemoteError(error)));
        }
        if let Some(text) = parsed.text {
            return self.resolve(Ok(text));
        }

        // Neither field: not a resolving message, keep waiting
        None
    }

    /// Observe the remote side closing the connection
    pub fn on_remote_close(&mut self, reason: Option<String>) -> Option<SessionResult> {
        if self.is_completed() {
            return None;
        }
        let reason = reason.filter(|r| !r.is_empty()).unwrap_or_else(|| "no reason given".to_string());
        self.resolve(Err(SpeechError::PrematureClose(reason)))
    }

    /// Observe a transport-level error
    pub fn on_transport_error(&mut self, reason: impl Into<String>) -> Option<SessionResult> {
        if self.is_completed() {
            return None;
        }
        self.resolve(Err(SpeechError::ConnectionFailed(reason.into())))
    }

    /// Observe the result timeout elapsing
    pub fn on_result_timeout(&mut self, elapsed_ms: u64) -> Option<SessionResult> {
        if self.is_completed() {
            return None;
        }
        self.resolve(Err(SpeechError::ResultTimeout(elapsed_ms)))
    }

    /// Write the completion slot; first writer wins
    fn resolve(&mut self, result: SessionResult) -> Option<SessionResult> {
        self.state = SessionState::Completed;
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_message_resolves_with_transcript() {
        let mut session = RecognitionSession::new();

        let result = session.on_text_frame(r#"{"text": "hello"}"#);

        assert_eq!(result.unwrap().unwrap(), "hello");
        assert!(session.is_completed());
    }

    #[test]
    fn empty_transcript_is_a_success() {
        let mut session = RecognitionSession::new();

        let result = session.on_text_frame(r#"{"text": ""}"#);

        assert_eq!(result.unwrap().unwrap(), "");
    }

    #[test]
    fn error_message_resolves_with_remote_error_verbatim() {
        let mut session = RecognitionSession::new();

        let result = session.on_text_frame(r#"{"error": "decode failed"}"#).unwrap();

        let SpeechError::RemoteError(msg) = result.unwrap_err() else {
            unreachable!("Expected RemoteError");
        };
        assert_eq!(msg, "decode failed");
    }

    #[test]
    fn unparseable_message_resolves_with_decode_error() {
        let mut session = RecognitionSession::new();

        let result = session.on_text_frame("not json at all").unwrap();

        assert!(matches!(result.unwrap_err(), SpeechError::DecodeError(_)));
    }

    #[test]
    fn message_with_neither_field_is_ignored() {
        let mut session = RecognitionSession::new();

        assert!(session.on_text_frame(r#"{"status": "processing"}"#).is_none());
        assert!(!session.is_completed());

        // A later resolving message still wins
        let result = session.on_text_frame(r#"{"text": "late"}"#);
        assert_eq!(result.unwrap().unwrap(), "late");
    }

    #[test]
    fn close_before_result_resolves_with_premature_close() {
        let mut session = RecognitionSession::new();

        let result = session.on_remote_close(Some("going away".to_string())).unwrap();

        let SpeechError::PrematureClose(reason) = result.unwrap_err() else {
            unreachable!("Expected PrematureClose");
        };
        assert_eq!(reason, "going away");
    }

    #[test]
    fn close_without_reason_gets_placeholder() {
        let mut session = RecognitionSession::new();

        let result = session.on_remote_close(None).unwrap();

        let SpeechError::PrematureClose(reason) = result.unwrap_err() else {
            unreachable!("Expected PrematureClose");
        };
        assert_eq!(reason, "no reason given");
    }

    #[test]
    fn result_timeout_resolves_with_timeout_error() {
        let mut session = RecognitionSession::new();

        let result = session.on_result_timeout(30000).unwrap();

        assert!(matches!(result.unwrap_err(), SpeechError::ResultTimeout(30000)));
    }

    #[test]
    fn first_writer_wins_text_then_error() {
        let mut session = RecognitionSession::new();

        let first = session.on_text_frame(r#"{"text": "hello"}"#);
        assert_eq!(first.unwrap().unwrap(), "hello");

        // Late error must not corrupt the successful result
        assert!(session.on_text_frame(r#"{"error": "too late"}"#).is_none());
        assert!(session.on_remote_close(Some("bye".to_string())).is_none());
        assert!(session.on_result_timeout(30000).is_none());
    }

    #[test]
    fn first_writer_wins_error_then_text() {
        let mut session = RecognitionSession::new();

        let first = session.on_text_frame(r#"{"error": "bad audio"}"#).unwrap();
        assert!(first.is_err());

        assert!(session.on_text_frame(r#"{"text": "too late"}"#).is_none());
    }

    #[test]
    fn events_after_timeout_are_noops() {
        let mut session = RecognitionSession::new();

        assert!(session.on_result_timeout(100).is_some());
        assert!(session.on_text_frame(r#"{"text": "late"}"#).is_none());
        assert!(session.on_transport_error("reset").is_none());
    }

    #[test]
    fn transport_error_resolves_once() {
        let mut session = RecognitionSession::new();

        let result = session.on_transport_error("connection reset").unwrap();
        assert!(matches!(result.unwrap_err(), SpeechError::ConnectionFailed(_)));
        assert!(session.on_transport_error("again").is_none());
    }
}
