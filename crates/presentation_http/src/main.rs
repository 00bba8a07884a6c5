//! VoxPipe HTTP Server
//!
//! Main entry point for the voice assistant API server.

use std::{sync::Arc, time::Duration};

use ai_core::{DashScopeChatEngine, InferenceEngine, OllamaEngine};
use ai_speech::{
    DashScopeSpeechProvider, FunAsrTranscriber, SovitsSynthesizer, SpeechSynthesis, SpeechToText,
};
use application::{AudioStore, ChatPipeline};
use presentation_http::{
    config::{AppConfig, BackendKind, InferenceSection, SpeechSection},
    routes,
    state::AppState,
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voxpipe_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("VoxPipe v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });

    info!(
        host = %config.server.host,
        port = %config.server.port,
        inference = ?config.inference.backend,
        stt = ?config.speech.stt_backend,
        tts = ?config.speech.tts_backend,
        "Configuration loaded"
    );

    // Wire up the engines chosen by the config
    let inference = build_inference(&config.inference)
        .map_err(|e| anyhow::anyhow!("Failed to initialize inference: {e}"))?;
    let transcriber = build_transcriber(&config.speech)
        .map_err(|e| anyhow::anyhow!("Failed to initialize recognition: {e}"))?;
    let synthesizer = build_synthesizer(&config.speech)
        .map_err(|e| anyhow::anyhow!("Failed to initialize synthesis: {e}"))?;

    let audio_store = AudioStore::new(
        config.server.audio_dir.clone(),
        config.server.public_base_url.clone(),
    );

    let pipeline = ChatPipeline::new(
        Arc::clone(&inference),
        transcriber,
        synthesizer,
        audio_store,
    );

    let state = AppState {
        pipeline: Arc::new(pipeline),
        inference,
    };

    // Build router
    let app = routes::create_router(state, &config.server.audio_dir);

    // Browser clients call from file:// and dev origins
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = app.layer(TraceLayer::new_for_http()).layer(cors_layer);

    // Start server
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server listening on http://{}", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

fn build_inference(config: &InferenceSection) -> anyhow::Result<Arc<dyn InferenceEngine>> {
    Ok(match config.backend {
        BackendKind::Local => Arc::new(OllamaEngine::new(config.local.clone())?),
        BackendKind::Cloud => Arc::new(DashScopeChatEngine::new(config.cloud.clone())?),
    })
}

fn build_transcriber(config: &SpeechSection) -> anyhow::Result<Arc<dyn SpeechToText>> {
    Ok(match config.stt_backend {
        BackendKind::Local => Arc::new(FunAsrTranscriber::new(config.funasr.clone())?),
        BackendKind::Cloud => Arc::new(DashScopeSpeechProvider::new(config.cloud.clone())?),
    })
}

fn build_synthesizer(config: &SpeechSection) -> anyhow::Result<Arc<dyn SpeechSynthesis>> {
    Ok(match config.tts_backend {
        BackendKind::Local => Arc::new(SovitsSynthesizer::new(config.sovits.clone())?),
        BackendKind::Cloud => Arc::new(DashScopeSpeechProvider::new(config.cloud.clone())?),
    })
}

/// Wait for shutdown signals (SIGINT, SIGTERM) and handle graceful shutdown
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        // Log error but continue waiting - this is a best-effort signal handler
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("Waiting up to {:?} for connections to close...", timeout);
    // The actual connection draining is handled by axum's graceful_shutdown
}
