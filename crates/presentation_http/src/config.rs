//! Application configuration
//!
//! Backend selection follows the local/cloud split: inference, speech
//! recognition, and synthesis each pick one of the two variants at startup.
//! The DashScope credential comes from `DASHSCOPE_API_KEY` rather than the
//! config file.

use ai_core::{CloudInferenceConfig, InferenceConfig};
use ai_speech::{CloudSpeechConfig, FunAsrConfig, SovitsConfig};
use serde::{Deserialize, Serialize};

/// Which backend variant an engine uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Self-hosted service on the local network
    #[default]
    Local,
    /// Managed DashScope API
    Cloud,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL under which stored audio is reachable by clients
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    /// Directory where synthesized audio files are written
    #[serde(default = "default_audio_dir")]
    pub audio_dir: String,

    /// Seconds to wait for connections to drain on shutdown
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8080
}

fn default_public_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_audio_dir() -> String {
    "static/audio".to_string()
}

const fn default_shutdown_timeout_secs() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_base_url: default_public_base_url(),
            audio_dir: default_audio_dir(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

/// Inference backend selection and per-variant settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InferenceSection {
    /// Which inference backend to use
    #[serde(default)]
    pub backend: BackendKind,

    /// Local Ollama-compatible runtime
    #[serde(default)]
    pub local: InferenceConfig,

    /// DashScope chat completions
    #[serde(default)]
    pub cloud: CloudInferenceConfig,
}

/// Speech backend selection and per-variant settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeechSection {
    /// Which recognition backend to use
    #[serde(default)]
    pub stt_backend: BackendKind,

    /// Which synthesis backend to use
    #[serde(default)]
    pub tts_backend: BackendKind,

    /// FunASR websocket recognition service
    #[serde(default)]
    pub funasr: FunAsrConfig,

    /// GPT-SoVITS local synthesis service
    #[serde(default)]
    pub sovits: SovitsConfig,

    /// DashScope cloud ASR and TTS
    #[serde(default)]
    pub cloud: CloudSpeechConfig,
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Inference configuration
    #[serde(default)]
    pub inference: InferenceSection,

    /// Speech configuration
    #[serde(default)]
    pub speech: SpeechSection,
}

impl AppConfig {
    /// Load configuration from environment and optional file
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables (e.g., VOXPIPE_SERVER__PORT)
            .add_source(
                config::Environment::with_prefix("VOXPIPE")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        // The cloud credential lives in its own well-known variable
        if let Ok(key) = std::env::var("DASHSCOPE_API_KEY") {
            if !key.is_empty() {
                config.inference.cloud.api_key.get_or_insert(key.clone());
                config.speech.cloud.api_key.get_or_insert(key);
            }
        }

        Ok(config)
    }

    /// Address the server binds to
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_local_backends() {
        let config = AppConfig::default();
        assert_eq!(config.inference.backend, BackendKind::Local);
        assert_eq!(config.speech.stt_backend, BackendKind::Local);
        assert_eq!(config.speech.tts_backend, BackendKind::Local);
    }

    #[test]
    fn default_server_settings() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.server.public_base_url, "http://localhost:8080");
        assert_eq!(config.server.audio_dir, "static/audio");
    }

    #[test]
    fn backends_deserialize_from_toml() {
        let toml = r#"
            [inference]
            backend = "cloud"

            [speech]
            stt_backend = "local"
            tts_backend = "cloud"

            [speech.funasr]
            endpoint = "ws://asr-box:10095"
        "#;

        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.inference.backend, BackendKind::Cloud);
        assert_eq!(config.speech.tts_backend, BackendKind::Cloud);
        assert_eq!(config.speech.funasr.endpoint, "ws://asr-box:10095");
        // Untouched sections keep their defaults
        assert_eq!(config.server.port, 8080);
    }
}
