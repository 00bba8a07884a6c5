//! Configuration for speech processing services

use serde::{Deserialize, Serialize};

/// Configuration for the FunASR websocket recognition service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunAsrConfig {
    /// Websocket endpoint of the recognition service
    #[serde(default = "default_funasr_endpoint")]
    pub endpoint: String,

    /// Handshake timeout in milliseconds
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Result timeout in milliseconds, counted from connection open
    #[serde(default = "default_result_timeout_ms")]
    pub result_timeout_ms: u64,
}

fn default_funasr_endpoint() -> String {
    "ws://localhost:10095".to_string()
}

const fn default_connect_timeout_ms() -> u64 {
    5000
}

const fn default_result_timeout_ms() -> u64 {
    30000
}

impl Default for FunAsrConfig {
    fn default() -> Self {
        Self {
            endpoint: default_funasr_endpoint(),
            connect_timeout_ms: default_connect_timeout_ms(),
            result_timeout_ms: default_result_timeout_ms(),
        }
    }
}

impl FunAsrConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.endpoint.starts_with("ws://") && !self.endpoint.starts_with("wss://") {
            return Err(format!(
                "FunASR endpoint must be a ws:// or wss:// URL, got '{}'",
                self.endpoint
            ));
        }
        if self.connect_timeout_ms == 0 || self.result_timeout_ms == 0 {
            return Err("Timeouts must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Configuration for the GPT-SoVITS local TTS service
///
/// The reference audio fields drive the zero-shot voice: `ref_audio_path` is
/// a path visible to the TTS service process, `prompt_text` is what the
/// reference audio says, `prompt_lang` its language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SovitsConfig {
    /// Base URL of the TTS HTTP service
    #[serde(default = "default_sovits_base_url")]
    pub base_url: String,

    /// Language of the text to synthesize
    #[serde(default = "default_lang")]
    pub text_lang: String,

    /// Reference audio path, resolved by the TTS service
    #[serde(default)]
    pub ref_audio_path: String,

    /// Transcript of the reference audio
    #[serde(default)]
    pub prompt_text: String,

    /// Language of the reference transcript
    #[serde(default = "default_lang")]
    pub prompt_lang: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_tts_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_sovits_base_url() -> String {
    "http://localhost:9880".to_string()
}

fn default_lang() -> String {
    "zh".to_string()
}

const fn default_tts_timeout_ms() -> u64 {
    60000
}

impl Default for SovitsConfig {
    fn default() -> Self {
        Self {
            base_url: default_sovits_base_url(),
            text_lang: default_lang(),
            ref_audio_path: String::new(),
            prompt_text: String::new(),
            prompt_lang: default_lang(),
            timeout_ms: default_tts_timeout_ms(),
        }
    }
}

/// Configuration for the DashScope cloud speech provider (ASR + TTS)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudSpeechConfig {
    /// Base URL of the DashScope API
    #[serde(default = "default_cloud_base_url")]
    pub base_url: String,

    /// ASR model
    #[serde(default = "default_asr_model")]
    pub asr_model: String,

    /// TTS model
    #[serde(default = "default_tts_model")]
    pub tts_model: String,

    /// TTS voice
    #[serde(default = "default_voice")]
    pub voice: String,

    /// TTS language
    #[serde(default = "default_language_type")]
    pub language_type: String,

    /// API key; normally filled from the `DASHSCOPE_API_KEY` environment
    /// variable rather than the config file
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in milliseconds
    #[serde(default = "default_tts_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_cloud_base_url() -> String {
    "https://dashscope.aliyuncs.com".to_string()
}

fn default_asr_model() -> String {
    "sensevoice-v1".to_string()
}

fn default_tts_model() -> String {
    "qwen3-tts-flash".to_string()
}

fn default_voice() -> String {
    "Cherry".to_string()
}

fn default_language_type() -> String {
    "Chinese".to_string()
}

impl Default for CloudSpeechConfig {
    fn default() -> Self {
        Self {
            base_url: default_cloud_base_url(),
            asr_model: default_asr_model(),
            tts_model: default_tts_model(),
            voice: default_voice(),
            language_type: default_language_type(),
            api_key: None,
            timeout_ms: default_tts_timeout_ms(),
        }
    }
}

impl CloudSpeechConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.as_deref().unwrap_or("").is_empty() {
            return Err(
                "DashScope API key is required for the cloud speech provider".to_string(),
            );
        }
        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}
