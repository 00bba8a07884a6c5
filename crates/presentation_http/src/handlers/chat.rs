//! Chat handlers
//!
//! Two entry points into the same pipeline: `/api/chat/text` takes a JSON
//! body, `/api/chat/audio` takes a multipart upload under the `file` field.
//! Response fields are camelCase to match the browser client.

use ai_speech::{AudioData, AudioFormat};
use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{error::ApiError, state::AppState};

/// Text chat request body
#[derive(Debug, Deserialize)]
pub struct ChatTextRequest {
    /// User message
    pub text: String,
}

/// Chat response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    /// What the recognizer heard; only present for audio requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recognized_text: Option<String>,
    /// Assistant text reply
    pub reply_text: String,
    /// Playable URL of the spoken reply
    pub audio_url: String,
}

/// Handle a text chat request
#[instrument(skip(state, request), fields(text_len = request.text.len()))]
pub async fn chat_text(
    State(state): State<AppState>,
    Json(request): Json<ChatTextRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let reply = state.pipeline.chat_text(&request.text).await?;

    Ok(Json(ChatResponse {
        recognized_text: None,
        reply_text: reply.reply_text,
        audio_url: reply.audio_url,
    }))
}

/// Handle an audio chat request
#[instrument(skip(state, multipart))]
pub async fn chat_audio(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ChatResponse>, ApiError> {
    let mut audio: Option<AudioData> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            // Browser recordings usually carry a content type; default to WAV
            // when they don't
            let format = field
                .content_type()
                .and_then(AudioFormat::from_mime_type)
                .unwrap_or(AudioFormat::Wav);

            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {e}")))?;

            audio = Some(AudioData::new(bytes.to_vec(), format));
            break;
        }
    }

    let audio = audio
        .ok_or_else(|| ApiError::BadRequest("Missing multipart field 'file'".to_string()))?;

    let reply = state.pipeline.chat_audio(audio).await?;

    Ok(Json(ChatResponse {
        recognized_text: reply.recognized_text,
        reply_text: reply.reply_text,
        audio_url: reply.audio_url,
    }))
}
