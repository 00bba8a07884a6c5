//! Application state shared across handlers

use std::sync::Arc;

use ai_core::InferenceEngine;
use application::ChatPipeline;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The chat pipeline behind both endpoints
    pub pipeline: Arc<ChatPipeline>,
    /// Inference engine handle for readiness probing
    pub inference: Arc<dyn InferenceEngine>,
}
