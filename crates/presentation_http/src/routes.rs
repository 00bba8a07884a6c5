//! Route definitions

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::{handlers, state::AppState};

/// Create the main router with all routes
///
/// `audio_dir` is the directory where synthesized audio lands; it is served
/// under `/audio` so the minted URLs resolve.
pub fn create_router(state: AppState, audio_dir: &str) -> Router {
    Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Chat API
        .route("/api/chat/text", post(handlers::chat::chat_text))
        .route("/api/chat/audio", post(handlers::chat::chat_audio))
        // Synthesized audio files
        .nest_service("/audio", ServeDir::new(audio_dir))
        // Attach state
        .with_state(state)
}
