//! Persistence for synthesized audio
//!
//! Locally synthesized audio is written under the served audio directory
//! with a unique name and addressed through the public base URL. Files are
//! never reused or rewritten, so concurrent requests cannot collide.

use std::path::PathBuf;

use ai_speech::{AudioData, SynthesizedAudio};
use tokio::fs;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::ApplicationError;

/// Stores synthesized audio files and mints their public URLs
#[derive(Debug, Clone)]
pub struct AudioStore {
    dir: PathBuf,
    public_base_url: String,
}

impl AudioStore {
    /// Create a store rooted at `dir`, addressed under `public_base_url`
    pub fn new(dir: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_base_url: public_base_url.into(),
        }
    }

    /// Resolve a synthesis result to a playable URL
    ///
    /// Provider-hosted audio passes through unchanged; local bytes are
    /// persisted first.
    pub async fn resolve(&self, audio: SynthesizedAudio) -> Result<String, ApplicationError> {
        match audio {
            SynthesizedAudio::RemoteUrl(url) => Ok(url),
            SynthesizedAudio::Bytes(audio) => self.store(audio).await,
        }
    }

    /// Persist audio bytes and return their public URL
    #[instrument(skip(self, audio), fields(bytes = audio.size_bytes()))]
    pub async fn store(&self, audio: AudioData) -> Result<String, ApplicationError> {
        let file_name = format!("tts-{}.{}", Uuid::new_v4(), audio.format().extension());

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ApplicationError::Storage(e.to_string()))?;

        let path = self.dir.join(&file_name);
        fs::write(&path, audio.data())
            .await
            .map_err(|e| ApplicationError::Storage(e.to_string()))?;

        let url = format!(
            "{}/audio/{}",
            self.public_base_url.trim_end_matches('/'),
            file_name
        );

        debug!(path = %path.display(), url = %url, "Stored synthesized audio");

        Ok(url)
    }
}
