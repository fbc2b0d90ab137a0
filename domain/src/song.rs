//! Song metadata returned by the recognition capability.

use serde::{Deserialize, Serialize};

/// Metadata describing a recognized song.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SongMetadata {
    pub title: String,
    pub artist: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub album: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub release_date: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub genre: String,
    /// Link to the track on a streaming service, when the backend returns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_url: Option<String>,
}

impl SongMetadata {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            ..Self::default()
        }
    }

    /// One-line human-readable summary.
    pub fn summary(&self) -> String {
        format!("Found: {} - {}", self.title, self.artist)
    }
}
