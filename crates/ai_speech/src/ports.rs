//! Port definitions for speech processing
//!
//! Defines the traits (ports) that speech processing adapters implement. The
//! local/cloud variant for each capability is chosen once at startup.

use async_trait::async_trait;

use crate::error::SpeechError;
use crate::types::{AudioData, SynthesizedAudio, Transcription};

/// Port for Speech-to-Text (ASR) implementations
///
/// Implementations convert one utterance of audio to a transcription.
/// Callers are responsible for rejecting empty uploads before invoking
/// `transcribe`.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe audio to text
    ///
    /// The transcription text may be empty when the service reports no error
    /// but recognizes no speech.
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if the exchange fails or times out.
    async fn transcribe(&self, audio: AudioData) -> Result<Transcription, SpeechError>;

    /// Name of the backing recognition engine
    fn engine_name(&self) -> &str;
}

/// Port for Text-to-Speech (TTS) implementations
#[async_trait]
pub trait SpeechSynthesis: Send + Sync {
    /// Convert text to speech
    ///
    /// Returns either locally produced audio bytes or a provider-hosted URL.
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if synthesis fails.
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, SpeechError>;

    /// Name of the backing synthesis engine
    fn engine_name(&self) -> &str;
}
