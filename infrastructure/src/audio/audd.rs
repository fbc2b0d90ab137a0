//! Song recognition via the audd.io API.
//!
//! The audio sample goes up as a multipart upload; a successful match comes
//! back as `{"status": "success", "result": {...}}` and a miss as the same
//! envelope with a null `result`.

use async_trait::async_trait;
use cadenza_application::ports::audio::{AudioError, SongRecognizer};
use cadenza_domain::SongMetadata;
use serde::Deserialize;
use tracing::{debug, warn};

/// Streaming services the backend is asked to resolve links for.
const RETURN_SERVICES: &str = "spotify,apple_music,deezer";

/// [`SongRecognizer`] backed by audd.io.
pub struct AuddRecognizer {
    client: reqwest::Client,
    api_token: String,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct AuddEnvelope {
    status: String,
    result: Option<AuddResult>,
    error: Option<AuddApiError>,
}

#[derive(Debug, Deserialize)]
struct AuddApiError {
    error_message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AuddResult {
    title: String,
    artist: String,
    album: String,
    release_date: String,
    song_link: String,
    spotify: Option<AuddSpotify>,
    apple_music: Option<AuddAppleMusic>,
}

#[derive(Debug, Deserialize)]
struct AuddSpotify {
    external_urls: Option<AuddSpotifyUrls>,
}

#[derive(Debug, Deserialize)]
struct AuddSpotifyUrls {
    spotify: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuddAppleMusic {
    url: Option<String>,
    #[serde(rename = "genreNames", default)]
    genre_names: Vec<String>,
}

impl AuddRecognizer {
    pub fn new(client: reqwest::Client, api_token: impl Into<String>) -> Self {
        Self::with_endpoint(client, api_token, "https://api.audd.io/")
    }

    pub fn with_endpoint(
        client: reqwest::Client,
        api_token: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_token: api_token.into(),
            endpoint: endpoint.into(),
        }
    }

    fn to_metadata(result: AuddResult) -> SongMetadata {
        let mut metadata = SongMetadata::new(result.title, result.artist);
        metadata.album = result.album;
        metadata.release_date = result.release_date;

        if let Some(apple) = &result.apple_music
            && let Some(genre) = apple.genre_names.first()
        {
            metadata.genre = genre.clone();
        }

        // Prefer a Spotify link, then Apple Music, then the generic link.
        metadata.stream_url = result
            .spotify
            .and_then(|s| s.external_urls)
            .and_then(|u| u.spotify)
            .or_else(|| result.apple_music.and_then(|a| a.url))
            .or_else(|| {
                (!result.song_link.is_empty()).then_some(result.song_link)
            });

        metadata
    }
}

#[async_trait]
impl SongRecognizer for AuddRecognizer {
    async fn recognize(&self, audio: &[u8]) -> Result<SongMetadata, AudioError> {
        let part = reqwest::multipart::Part::bytes(audio.to_vec())
            .file_name("audio.mp3")
            .mime_str("audio/mpeg")
            .map_err(|e| AudioError::Http(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .text("api_token", self.api_token.clone())
            .text("return", RETURN_SERVICES)
            .part("file", part);

        debug!(bytes = audio.len(), "Submitting audio sample for recognition");
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AudioError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AudioError::Http(format!(
                "recognition backend returned {}",
                status.as_u16()
            )));
        }

        let envelope: AuddEnvelope = response
            .json()
            .await
            .map_err(|e| AudioError::Decode(e.to_string()))?;

        if envelope.status != "success" {
            let detail = envelope
                .error
                .map(|e| e.error_message)
                .unwrap_or_else(|| envelope.status.clone());
            return Err(AudioError::Http(detail));
        }

        match envelope.result {
            Some(result) => Ok(Self::to_metadata(result)),
            None => {
                warn!("Recognition backend returned no match");
                Err(AudioError::Unrecognized)
            }
        }
    }
}
