//! AI Core - LLM inference engines
//!
//! Provides the `InferenceEngine` abstraction and two implementations:
//! - `OllamaEngine` - local Ollama-compatible runtime (`/api/generate`)
//! - `DashScopeChatEngine` - DashScope OpenAI-compatible chat API
//!
//! The engine to use is selected once at process startup from configuration;
//! callers only ever see the trait.

pub mod config;
pub mod dashscope;
pub mod error;
pub mod ollama;
pub mod ports;

pub use config::{CloudInferenceConfig, InferenceConfig};
pub use dashscope::DashScopeChatEngine;
pub use error::InferenceError;
pub use ollama::OllamaEngine;
pub use ports::{InferenceEngine, InferenceReply};
