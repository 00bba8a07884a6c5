//! Application layer - Use cases and orchestration
//!
//! Orchestrates the speech and inference adapters into the chat pipeline:
//! transcribe, reply, synthesize, persist. Holds no transport concerns; the
//! HTTP layer maps `ApplicationError` to status codes.

pub mod audio_store;
pub mod error;
pub mod pipeline;

pub use audio_store::AudioStore;
pub use error::ApplicationError;
pub use pipeline::{ChatPipeline, PipelineReply};
