//! Configuration for inference engines

use serde::{Deserialize, Serialize};

/// Configuration for the local Ollama-compatible engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Base URL of the inference server
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model to use
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Optional system prompt sent with every request
    #[serde(default)]
    pub system_prompt: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "qwen2.5:7b".to_string()
}

const fn default_timeout_ms() -> u64 {
    60000
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_ms: default_timeout_ms(),
            system_prompt: None,
        }
    }
}

/// Configuration for the DashScope cloud chat engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudInferenceConfig {
    /// Base URL of the DashScope API
    #[serde(default = "default_cloud_base_url")]
    pub base_url: String,

    /// Model to use
    #[serde(default = "default_cloud_model")]
    pub model: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// API key; normally filled from the `DASHSCOPE_API_KEY` environment
    /// variable rather than the config file
    #[serde(default)]
    pub api_key: Option<String>,

    /// Optional system prompt sent with every request
    #[serde(default = "default_system_prompt")]
    pub system_prompt: Option<String>,
}

fn default_cloud_base_url() -> String {
    "https://dashscope.aliyuncs.com".to_string()
}

fn default_cloud_model() -> String {
    "qwen-plus".to_string()
}

fn default_system_prompt() -> Option<String> {
    Some("You are a helpful assistant.".to_string())
}

impl Default for CloudInferenceConfig {
    fn default() -> Self {
        Self {
            base_url: default_cloud_base_url(),
            model: default_cloud_model(),
            timeout_ms: default_timeout_ms(),
            api_key: None,
            system_prompt: default_system_prompt(),
        }
    }
}

impl CloudInferenceConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.as_deref().unwrap_or("").is_empty() {
            return Err(
                "DashScope API key is required for the cloud inference engine".to_string(),
            );
        }
        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}
