//! Speech synthesis via the Google Cloud Text-to-Speech REST API.
//!
//! Input starting with `<speak` is sent as SSML, anything else as plain
//! text. The backend returns MP3 bytes base64-encoded in `audioContent`.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use cadenza_application::ports::audio::{AudioError, SpeechSynthesizer};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// [`SpeechSynthesizer`] backed by the Google TTS REST endpoint.
pub struct GoogleSpeechSynthesizer {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: String,
}

impl GoogleSpeechSynthesizer {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self::with_endpoint(
            client,
            api_key,
            "https://texttospeech.googleapis.com/v1/text:synthesize",
        )
    }

    pub fn with_endpoint(
        client: reqwest::Client,
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    fn build_input(text: &str) -> serde_json::Value {
        if text.trim_start().starts_with("<speak") {
            json!({ "ssml": text })
        } else {
            json!({ "text": text })
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleSpeechSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        voice_name: &str,
        language_code: &str,
    ) -> Result<Vec<u8>, AudioError> {
        let body = json!({
            "input": Self::build_input(text),
            "voice": {
                "languageCode": language_code,
                "name": voice_name,
            },
            "audioConfig": {
                "audioEncoding": "MP3",
            },
        });

        debug!(voice_name, language_code, chars = text.len(), "Synthesizing speech");
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AudioError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AudioError::Synthesis(format!(
                "backend returned {}: {}",
                status.as_u16(),
                detail
            )));
        }

        let payload: SynthesizeResponse = response
            .json()
            .await
            .map_err(|e| AudioError::Decode(e.to_string()))?;

        BASE64
            .decode(payload.audio_content.as_bytes())
            .map_err(|e| AudioError::Decode(e.to_string()))
    }
}
