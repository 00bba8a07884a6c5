//! DashScope cloud speech provider
//!
//! One adapter covering both managed speech capabilities: SenseVoice ASR
//! and Qwen TTS. The TTS response carries a provider-hosted URL rather than
//! audio bytes, so synthesis resolves to `SynthesizedAudio::RemoteUrl`.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use crate::config::CloudSpeechConfig;
use crate::error::SpeechError;
use crate::ports::{SpeechSynthesis, SpeechToText};
use crate::types::{AudioData, SynthesizedAudio, Transcription};

/// Cloud ASR + TTS adapter backed by the DashScope API
#[derive(Debug, Clone)]
pub struct DashScopeSpeechProvider {
    client: Client,
    config: CloudSpeechConfig,
    api_key: String,
}

impl DashScopeSpeechProvider {
    /// Create a new provider; requires a configured API key
    pub fn new(config: CloudSpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;

        // validate() guarantees the key is present and non-empty
        let api_key = config.api_key.clone().unwrap_or_default();

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| SpeechError::Configuration(e.to_string()))?;

        info!(
            base_url = %config.base_url,
            asr_model = %config.asr_model,
            tts_model = %config.tts_model,
            "Initialized DashScope speech provider"
        );

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn asr_url(&self) -> String {
        format!(
            "{}/api/v1/services/audio/asr/generation",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn tts_url(&self) -> String {
        format!(
            "{}/api/v1/services/aigc/multimodal-generation/generation",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

/// DashScope TTS request
#[derive(Debug, Serialize)]
struct TtsRequest<'a> {
    model: &'a str,
    input: TtsInput<'a>,
}

#[derive(Debug, Serialize)]
struct TtsInput<'a> {
    text: &'a str,
    voice: &'a str,
    language_type: &'a str,
}

/// DashScope response envelope shared by ASR and TTS
///
/// On failure the envelope carries `code` and `message` instead of the
/// expected `output` fields. Success is determined by the presence of the
/// output field each capability needs, not by inspecting `code`.
#[derive(Debug, Deserialize)]
struct DashScopeResponse {
    #[serde(default)]
    output: Option<DashScopeOutput>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DashScopeOutput {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    audio: Option<DashScopeAudio>,
}

#[derive(Debug, Deserialize)]
struct DashScopeAudio {
    #[serde(default)]
    url: Option<String>,
}

impl DashScopeResponse {
    fn failure_message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| "no message in response".to_string())
    }
}

#[async_trait]
impl SpeechToText for DashScopeSpeechProvider {
    #[instrument(skip(self, audio), fields(model = %self.config.asr_model, bytes = audio.size_bytes()))]
    async fn transcribe(&self, audio: AudioData) -> Result<Transcription, SpeechError> {
        let encoded = BASE64.encode(audio.into_data());
        let request = json!({
            "model": self.config.asr_model,
            "input": {
                "audio": format!("data:application/octet-stream;base64,{encoded}"),
            },
            "parameters": {
                "language": "auto",
            },
        });

        debug!("Sending recognition request to DashScope");

        let response = self
            .client
            .post(self.asr_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "DashScope recognition request failed");
            return Err(SpeechError::TranscriptionFailed(format!(
                "Status {status}: {body}"
            )));
        }

        let body: DashScopeResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(e.to_string()))?;

        let text = body
            .output
            .as_ref()
            .and_then(|output| output.text.clone())
            .ok_or_else(|| SpeechError::TranscriptionFailed(body.failure_message()))?;

        debug!(text_len = text.len(), "Cloud recognition completed");

        Ok(Transcription::new(text))
    }

    fn engine_name(&self) -> &str {
        "dashscope-asr"
    }
}

#[async_trait]
impl SpeechSynthesis for DashScopeSpeechProvider {
    #[instrument(skip(self, text), fields(model = %self.config.tts_model, text_len = text.len()))]
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, SpeechError> {
        let request = TtsRequest {
            model: &self.config.tts_model,
            input: TtsInput {
                text,
                voice: &self.config.voice,
                language_type: &self.config.language_type,
            },
        };

        debug!("Sending synthesis request to DashScope");

        let response = self
            .client
            .post(self.tts_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "DashScope synthesis request failed");
            return Err(SpeechError::SynthesisFailed(format!(
                "Status {status}: {body}"
            )));
        }

        let body: DashScopeResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(e.to_string()))?;

        let url = body
            .output
            .as_ref()
            .and_then(|output| output.audio.as_ref())
            .and_then(|audio| audio.url.clone())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| SpeechError::SynthesisFailed(body.failure_message()))?;

        debug!(url = %url, "Cloud synthesis completed");

        Ok(SynthesizedAudio::RemoteUrl(url))
    }

    fn engine_name(&self) -> &str {
        "dashscope-tts"
    }
}
