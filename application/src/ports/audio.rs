//! Audio capability ports: song recognition, speech synthesis, merging.
//!
//! Each capability is its own trait so adapters can be swapped or stubbed
//! independently; they share one error enum because the dispatcher treats
//! all audio failures uniformly.

use async_trait::async_trait;
use cadenza_domain::SongMetadata;
use thiserror::Error;

/// Errors from the audio capabilities
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Audio backend request failed: {0}")]
    Http(String),

    #[error("Song could not be identified")]
    Unrecognized,

    #[error("Synthesis failed: {0}")]
    Synthesis(String),

    #[error("Merge failed: {0}")]
    Merge(String),

    #[error("Malformed backend response: {0}")]
    Decode(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Port for the song recognition capability
#[async_trait]
pub trait SongRecognizer: Send + Sync {
    async fn recognize(&self, audio: &[u8]) -> Result<SongMetadata, AudioError>;
}

/// Port for the speech synthesis capability
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` (plain or SSML) to encoded audio bytes.
    async fn synthesize(
        &self,
        text: &str,
        voice_name: &str,
        language_code: &str,
    ) -> Result<Vec<u8>, AudioError>;
}

/// Port for the audio concatenation capability
#[async_trait]
pub trait AudioMerger: Send + Sync {
    /// Concatenate `intro` followed by `main` into one audio stream.
    async fn merge(&self, intro: &[u8], main: &[u8]) -> Result<Vec<u8>, AudioError>;
}
