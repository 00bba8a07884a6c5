//! GPT-SoVITS local synthesis adapter
//!
//! Posts to the `/tts` endpoint of a locally running GPT-SoVITS server. A
//! 2xx response body is the raw WAV audio; any other status carries the
//! failure message as text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::config::SovitsConfig;
use crate::error::SpeechError;
use crate::ports::SpeechSynthesis;
use crate::types::{AudioData, AudioFormat, SynthesizedAudio};

/// Text-to-speech adapter for a GPT-SoVITS HTTP service
#[derive(Debug, Clone)]
pub struct SovitsSynthesizer {
    client: Client,
    config: SovitsConfig,
}

impl SovitsSynthesizer {
    /// Create a new synthesizer
    pub fn new(config: SovitsConfig) -> Result<Self, SpeechError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| SpeechError::Configuration(e.to_string()))?;

        info!(base_url = %config.base_url, "Initialized GPT-SoVITS synthesizer");

        Ok(Self { client, config })
    }

    fn tts_url(&self) -> String {
        format!("{}/tts", self.config.base_url.trim_end_matches('/'))
    }
}

/// GPT-SoVITS synthesis request; the reference audio drives the voice
#[derive(Debug, Serialize)]
struct TtsRequest<'a> {
    text: &'a str,
    text_lang: &'a str,
    ref_audio_path: &'a str,
    prompt_text: &'a str,
    prompt_lang: &'a str,
    media_type: &'a str,
}

#[async_trait]
impl SpeechSynthesis for SovitsSynthesizer {
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, SpeechError> {
        let request = TtsRequest {
            text,
            text_lang: &self.config.text_lang,
            ref_audio_path: &self.config.ref_audio_path,
            prompt_text: &self.config.prompt_text,
            prompt_lang: &self.config.prompt_lang,
            media_type: "wav",
        };

        debug!("Sending synthesis request to GPT-SoVITS");

        let response = self
            .client
            .post(self.tts_url())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "GPT-SoVITS request failed");
            return Err(SpeechError::SynthesisFailed(format!(
                "Status {status}: {body}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechError::InvalidResponse(e.to_string()))?;

        debug!(bytes = bytes.len(), "Synthesis completed");

        Ok(SynthesizedAudio::Bytes(AudioData::new(
            bytes.to_vec(),
            AudioFormat::Wav,
        )))
    }

    fn engine_name(&self) -> &str {
        "gpt-sovits"
    }
}
