//! Chat pipeline - Orchestrates the assistant conversation flow
//!
//! Two entry points share one tail: text requests go straight to inference,
//! audio requests are transcribed first. Both end with the reply synthesized
//! to speech and resolved to a playable URL.

use std::{fmt, sync::Arc};

use ai_core::InferenceEngine;
use ai_speech::{AudioData, SpeechSynthesis, SpeechToText};
use tracing::{debug, info, instrument};

use crate::audio_store::AudioStore;
use crate::error::ApplicationError;

/// Stand-in transcript when recognition succeeds without detecting speech;
/// it flows through inference and synthesis like a real utterance
pub const EMPTY_TRANSCRIPT_PLACEHOLDER: &str = "(no speech detected)";

/// Outcome of one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineReply {
    /// What the recognizer heard; only set for audio requests
    pub recognized_text: Option<String>,
    /// The assistant's text reply
    pub reply_text: String,
    /// Playable URL of the spoken reply
    pub audio_url: String,
}

/// Orchestrates transcription, inference, synthesis, and audio persistence
pub struct ChatPipeline {
    inference: Arc<dyn InferenceEngine>,
    transcriber: Arc<dyn SpeechToText>,
    synthesizer: Arc<dyn SpeechSynthesis>,
    audio_store: AudioStore,
}

impl fmt::Debug for ChatPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatPipeline")
            .field("inference", &self.inference.model_name())
            .field("transcriber", &self.transcriber.engine_name())
            .field("synthesizer", &self.synthesizer.engine_name())
            .finish_non_exhaustive()
    }
}

impl ChatPipeline {
    /// Create a new pipeline
    pub fn new(
        inference: Arc<dyn InferenceEngine>,
        transcriber: Arc<dyn SpeechToText>,
        synthesizer: Arc<dyn SpeechSynthesis>,
        audio_store: AudioStore,
    ) -> Self {
        Self {
            inference,
            transcriber,
            synthesizer,
            audio_store,
        }
    }

    /// Handle a text chat request
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn chat_text(&self, text: &str) -> Result<PipelineReply, ApplicationError> {
        if text.trim().is_empty() {
            return Err(ApplicationError::InvalidInput(
                "Text must not be empty".to_string(),
            ));
        }

        let (reply_text, audio_url) = self.reply_and_speak(text).await?;

        Ok(PipelineReply {
            recognized_text: None,
            reply_text,
            audio_url,
        })
    }

    /// Handle an audio chat request
    #[instrument(skip(self, audio), fields(bytes = audio.size_bytes()))]
    pub async fn chat_audio(&self, audio: AudioData) -> Result<PipelineReply, ApplicationError> {
        if audio.is_empty() {
            return Err(ApplicationError::InvalidInput(
                "Uploaded audio is empty".to_string(),
            ));
        }

        let transcription = self
            .transcriber
            .transcribe(audio)
            .await
            .map_err(|e| ApplicationError::Transcription(e.to_string()))?;

        // Recognizing nothing is not a failure; the placeholder keeps the
        // conversation going
        let recognized_text = if transcription.is_empty() {
            EMPTY_TRANSCRIPT_PLACEHOLDER.to_string()
        } else {
            transcription.text
        };

        info!(recognized = %recognized_text, "Audio transcribed");

        let (reply_text, audio_url) = self.reply_and_speak(&recognized_text).await?;

        Ok(PipelineReply {
            recognized_text: Some(recognized_text),
            reply_text,
            audio_url,
        })
    }

    /// Shared tail: infer a reply, speak it, resolve the audio URL
    async fn reply_and_speak(&self, prompt: &str) -> Result<(String, String), ApplicationError> {
        let reply = self.inference.generate(prompt).await?;

        debug!(
            model = %reply.model,
            reply_len = reply.content.len(),
            "Inference reply received"
        );

        let synthesized = self
            .synthesizer
            .synthesize(&reply.content)
            .await
            .map_err(|e| ApplicationError::Synthesis(e.to_string()))?;

        let audio_url = self.audio_store.resolve(synthesized).await?;

        Ok((reply.content, audio_url))
    }
}
