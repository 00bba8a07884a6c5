//! VoxPipe HTTP presentation layer
//!
//! This crate provides the HTTP API for VoxPipe: the two chat endpoints,
//! health probes, and static serving of synthesized audio.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::{AppConfig, BackendKind, ServerConfig};
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
