//! Port definitions for LLM inference
//!
//! Defines the trait that inference engines implement. The orchestrator only
//! depends on this trait; the concrete engine (local or cloud) is chosen once
//! at startup.

use async_trait::async_trait;

use crate::error::InferenceError;

/// A completed inference round-trip
#[derive(Debug, Clone)]
pub struct InferenceReply {
    /// Generated assistant text
    pub content: String,
    /// Model that produced the reply
    pub model: String,
}

impl InferenceReply {
    /// Create a new reply
    pub fn new(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
        }
    }
}

/// Port for text-to-text conversational backends
#[async_trait]
pub trait InferenceEngine: Send + Sync {
    /// Generate a reply for a single user prompt
    ///
    /// # Errors
    ///
    /// Returns `InferenceError` if the backend is unreachable, times out, or
    /// returns an error payload.
    async fn generate(&self, prompt: &str) -> Result<InferenceReply, InferenceError>;

    /// Check whether the backend is reachable and ready
    async fn health_check(&self) -> bool;

    /// Name of the model this engine is configured to use
    fn model_name(&self) -> &str;
}
