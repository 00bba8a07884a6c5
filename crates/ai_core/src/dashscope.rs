//! DashScope cloud chat engine
//!
//! Uses the OpenAI-compatible chat completions endpoint at
//! `{base}/compatible-mode/v1/chat/completions`. The reply text is at
//! `choices[0].message.content`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::CloudInferenceConfig;
use crate::error::InferenceError;
use crate::ports::{InferenceEngine, InferenceReply};

/// Cloud chat engine using the DashScope OpenAI-compatible API
#[derive(Debug, Clone)]
pub struct DashScopeChatEngine {
    client: Client,
    config: CloudInferenceConfig,
    api_key: String,
}

impl DashScopeChatEngine {
    /// Create a new engine
    ///
    /// # Errors
    ///
    /// Returns `InferenceError::Configuration` when the API key is missing.
    pub fn new(config: CloudInferenceConfig) -> Result<Self, InferenceError> {
        config.validate().map_err(InferenceError::Configuration)?;

        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| InferenceError::Configuration("API key missing".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| InferenceError::Configuration(e.to_string()))?;

        info!(
            base_url = %config.base_url,
            model = %config.model,
            "Initialized DashScope chat engine"
        );

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn chat_url(&self) -> String {
        format!(
            "{}/compatible-mode/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[async_trait]
impl InferenceEngine for DashScopeChatEngine {
    #[instrument(skip(self, prompt), fields(model = %self.config.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<InferenceReply, InferenceError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = self.config.system_prompt.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages,
        };

        debug!("Sending chat completion request to DashScope");

        let response = self
            .client
            .post(self.chat_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| InferenceError::from_reqwest(e, self.config.timeout_ms))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "DashScope chat request failed");
            return Err(InferenceError::ServerError(format!(
                "Status {status}: {body}"
            )));
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| {
                InferenceError::InvalidResponse("response contains no choices".to_string())
            })?;

        debug!(content_len = content.len(), "Inference completed");

        Ok(InferenceReply {
            content,
            model: body.model.unwrap_or_else(|| self.config.model.clone()),
        })
    }

    async fn health_check(&self) -> bool {
        // No cheap unauthenticated probe on the managed API; treat a
        // configured engine as ready.
        true
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> CloudInferenceConfig {
        CloudInferenceConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn creation_requires_api_key() {
        assert!(DashScopeChatEngine::new(CloudInferenceConfig::default()).is_err());
        assert!(DashScopeChatEngine::new(test_config()).is_ok());
    }

    #[test]
    fn chat_url_is_compatible_mode() {
        let engine = DashScopeChatEngine::new(test_config()).unwrap();
        assert_eq!(
            engine.chat_url(),
            "https://dashscope.aliyuncs.com/compatible-mode/v1/chat/completions"
        );
    }

    #[test]
    fn model_name_comes_from_config() {
        let engine = DashScopeChatEngine::new(test_config()).unwrap();
        assert_eq!(engine.model_name(), "qwen-plus");
    }
}
