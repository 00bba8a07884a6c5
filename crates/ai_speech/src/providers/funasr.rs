//! FunASR websocket transcriber
//!
//! Speaks the one-shot recognition protocol: open a fresh websocket per
//! utterance, send the complete audio as one binary frame, wait for the
//! first resolving text frame, close. The connection is never reused.
//!
//! Two independent timers bound the exchange: the handshake must finish
//! within `connect_timeout_ms`, and a resolving message must arrive within
//! `result_timeout_ms` of the connection opening. When the result timer
//! fires the connection is force-closed so the service does not keep a
//! half-open peer.

use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::{timeout, Instant};
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, instrument, warn};

use crate::config::FunAsrConfig;
use crate::error::SpeechError;
use crate::ports::SpeechToText;
use crate::session::RecognitionSession;
use crate::types::{AudioData, Transcription};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Longest we wait for the closing handshake to flush
const CLOSE_GRACE_MS: u64 = 1000;

/// Speech-to-text adapter for a FunASR websocket service
#[derive(Debug, Clone)]
pub struct FunAsrTranscriber {
    config: FunAsrConfig,
}

impl FunAsrTranscriber {
    /// Create a new transcriber
    pub fn new(config: FunAsrConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;
        Ok(Self { config })
    }

    /// Run one complete recognition exchange
    async fn run_session(&self, audio: AudioData) -> Result<String, SpeechError> {
        let connect = timeout(
            Duration::from_millis(self.config.connect_timeout_ms),
            connect_async(&self.config.endpoint),
        )
        .await;

        let (mut ws, _) = match connect {
            Err(_) => {
                warn!(
                    endpoint = %self.config.endpoint,
                    timeout_ms = self.config.connect_timeout_ms,
                    "Recognition service handshake timed out"
                );
                return Err(SpeechError::ConnectTimeout(self.config.connect_timeout_ms));
            }
            Ok(Err(e)) => return Err(SpeechError::ConnectionFailed(e.to_string())),
            Ok(Ok(pair)) => pair,
        };

        debug!(endpoint = %self.config.endpoint, "Recognition connection open");

        let result = self.drive(&mut ws, audio).await;

        // Close on every exit path, including timeout; errors here are
        // irrelevant since the session already resolved. Bounded, because a
        // stalled peer would block the closing flush too; dropping the
        // stream tears the connection down either way.
        let _ = timeout(Duration::from_millis(CLOSE_GRACE_MS), ws.close(None)).await;

        result
    }

    /// Feed websocket events into the session until it resolves
    async fn drive(&self, ws: &mut WsStream, audio: AudioData) -> Result<String, SpeechError> {
        let mut session = RecognitionSession::new();

        // The result timer runs from connection open and also bounds the
        // audio send: a peer that completes the handshake but never reads
        // would otherwise stall the send indefinitely once buffers fill.
        let deadline =
            Instant::now() + Duration::from_millis(self.config.result_timeout_ms);

        let remaining = deadline.saturating_duration_since(Instant::now());
        match timeout(remaining, ws.send(Message::binary(audio.into_data()))).await {
            Err(_) => {
                if let Some(result) = session.on_result_timeout(self.config.result_timeout_ms) {
                    return result;
                }
            }
            Ok(Err(e)) => {
                if let Some(result) = session.on_transport_error(e.to_string()) {
                    return result;
                }
            }
            Ok(Ok(())) => {}
        }

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());

            let event = match timeout(remaining, ws.next()).await {
                Err(_) => session.on_result_timeout(self.config.result_timeout_ms),
                Ok(None) => session.on_remote_close(None),
                Ok(Some(Err(e))) => session.on_transport_error(e.to_string()),
                Ok(Some(Ok(Message::Text(text)))) => {
                    debug!(frame = %text, "Recognition frame received");
                    session.on_text_frame(text.as_str())
                }
                Ok(Some(Ok(Message::Close(frame)))) => {
                    session.on_remote_close(frame.map(|f| f.reason.to_string()))
                }
                // Ping/pong and stray binary frames are not resolving events
                Ok(Some(Ok(_))) => None,
            };

            if let Some(result) = event {
                return result;
            }
        }
    }
}

#[async_trait]
impl SpeechToText for FunAsrTranscriber {
    #[instrument(skip(self, audio), fields(endpoint = %self.config.endpoint, bytes = audio.size_bytes()))]
    async fn transcribe(&self, audio: AudioData) -> Result<Transcription, SpeechError> {
        let text = self.run_session(audio).await?;
        debug!(text_len = text.len(), "Recognition completed");
        Ok(Transcription::new(text))
    }

    fn engine_name(&self) -> &str {
        "funasr"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_invalid_endpoint() {
        let config = FunAsrConfig {
            endpoint: "http://localhost:10095".to_string(),
            ..Default::default()
        };
        assert!(FunAsrTranscriber::new(config).is_err());
    }

    #[test]
    fn new_accepts_default_config() {
        let transcriber = FunAsrTranscriber::new(FunAsrConfig::default()).unwrap();
        assert_eq!(transcriber.engine_name(), "funasr");
    }
}
