//! Ollama-compatible local inference engine
//!
//! Talks to the `/api/generate` endpoint of a local Ollama-compatible
//! runtime. Ollama reports some failures inline as an `error` field in a 200
//! response, so both the status code and the body are checked.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::InferenceConfig;
use crate::error::InferenceError;
use crate::ports::{InferenceEngine, InferenceReply};

/// Local inference engine using an Ollama-compatible server
#[derive(Debug, Clone)]
pub struct OllamaEngine {
    client: Client,
    config: InferenceConfig,
}

impl OllamaEngine {
    /// Create a new engine
    pub fn new(config: InferenceConfig) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| InferenceError::Configuration(e.to_string()))?;

        info!(
            base_url = %config.base_url,
            model = %config.model,
            "Initialized Ollama inference engine"
        );

        Ok(Self { client, config })
    }

    /// Build the API URL for a given endpoint
    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/api/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

/// Ollama generate request
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
}

/// Ollama generate response; `error` is set instead of `response` on failure
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[async_trait]
impl InferenceEngine for OllamaEngine {
    #[instrument(skip(self, prompt), fields(model = %self.config.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<InferenceReply, InferenceError> {
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            system: self.config.system_prompt.as_deref(),
            stream: false,
        };

        debug!("Sending generate request to Ollama");

        let response = self
            .client
            .post(self.api_url("generate"))
            .json(&request)
            .send()
            .await
            .map_err(|e| InferenceError::from_reqwest(e, self.config.timeout_ms))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Ollama request failed");
            return Err(InferenceError::ServerError(format!(
                "Status {status}: {body}"
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        if let Some(error) = body.error {
            return Err(InferenceError::ServerError(error));
        }

        let content = body.response.ok_or_else(|| {
            InferenceError::InvalidResponse("response field missing".to_string())
        })?;

        debug!(content_len = content.len(), "Inference completed");

        Ok(InferenceReply {
            content,
            model: body.model.unwrap_or_else(|| self.config.model.clone()),
        })
    }

    async fn health_check(&self) -> bool {
        self.client
            .get(self.api_url("tags"))
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map(|resp| resp.status().is_success())
            .unwrap_or(false)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
