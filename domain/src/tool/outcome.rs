//! Tool outcome value object.
//!
//! Every tool handler produces a [`ToolOutcome`]: success flag plus exactly
//! one payload variant (text, audio bytes, or error detail). The outcome is
//! serialized to a stable `{success, data}` wire JSON before it is folded
//! into the transcript; binary audio is carried as a hex string because the
//! model transport is a text/JSON channel.

use serde::{Deserialize, Serialize};

/// The single payload of a tool outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomePayload {
    /// Plain text result (often itself a JSON document for structured tools).
    Text(String),
    /// Binary audio with an optional human-readable caption.
    Audio {
        data: Vec<u8>,
        caption: Option<String>,
    },
    /// Error detail: message plus an optional error-kind tag.
    Error {
        message: String,
        kind: Option<String>,
    },
}

/// Outcome of a tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutcome {
    pub success: bool,
    payload: OutcomePayload,
}

impl ToolOutcome {
    /// Successful text result.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            success: true,
            payload: OutcomePayload::Text(text.into()),
        }
    }

    /// Successful audio result with an optional caption used when no audio
    /// channel exists on the way out.
    pub fn from_audio(data: Vec<u8>, caption: Option<String>) -> Self {
        Self {
            success: true,
            payload: OutcomePayload::Audio { data, caption },
        }
    }

    /// Failed result with a plain error message.
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            payload: OutcomePayload::Error {
                message: message.into(),
                kind: None,
            },
        }
    }

    /// Failed result converted from an unexpected handler failure.
    ///
    /// This is the single point where a handler error becomes data instead
    /// of propagating as a crash; the kind tag preserves the error category.
    pub fn from_failure(kind: impl Into<String>, message: impl ToString) -> Self {
        Self {
            success: false,
            payload: OutcomePayload::Error {
                message: message.to_string(),
                kind: Some(kind.into()),
            },
        }
    }

    pub fn payload(&self) -> &OutcomePayload {
        &self.payload
    }

    /// Decoded audio bytes, if this is an audio outcome.
    pub fn audio_bytes(&self) -> Option<&[u8]> {
        match &self.payload {
            OutcomePayload::Audio { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Error kind tag, if this is a failure converted from a handler error.
    pub fn error_kind(&self) -> Option<&str> {
        match &self.payload {
            OutcomePayload::Error { kind, .. } => kind.as_deref(),
            _ => None,
        }
    }

    /// The stable `{success, data}` wire JSON exchanged with the model.
    ///
    /// `data` is the text itself, `{audio_data: <hex>, text: <caption>}` for
    /// audio, or `{error: <message>}` (plus `type` when a kind is known).
    pub fn to_wire_json(&self) -> serde_json::Value {
        let data = match &self.payload {
            OutcomePayload::Text(text) => serde_json::json!(text),
            OutcomePayload::Audio { data, caption } => serde_json::json!({
                "audio_data": hex::encode(data),
                "text": caption.as_deref().unwrap_or("Audio generated successfully"),
            }),
            OutcomePayload::Error { message, kind } => match kind {
                Some(kind) => serde_json::json!({ "error": message, "type": kind }),
                None => serde_json::json!({ "error": message }),
            },
        };

        serde_json::json!({ "success": self.success, "data": data })
    }

    /// Text shown to the user when this outcome ends the exchange.
    ///
    /// Total: every outcome maps to some reply text.
    pub fn user_facing_text(&self) -> String {
        match &self.payload {
            OutcomePayload::Text(text) if !text.is_empty() => text.clone(),
            OutcomePayload::Text(_) => "Operation completed".to_string(),
            OutcomePayload::Audio { caption, .. } => caption
                .clone()
                .unwrap_or_else(|| "Audio generated successfully".to_string()),
            OutcomePayload::Error { message, .. } => format!("Error: {}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_wire_json() {
        let outcome = ToolOutcome::from_text("hi");
        assert_eq!(
            outcome.to_wire_json(),
            serde_json::json!({"success": true, "data": "hi"})
        );
    }

    #[test]
    fn test_error_wire_json() {
        let outcome = ToolOutcome::from_error("x");
        assert_eq!(
            outcome.to_wire_json(),
            serde_json::json!({"success": false, "data": {"error": "x"}})
        );
    }

    #[test]
    fn test_failure_carries_kind() {
        let outcome = ToolOutcome::from_failure("audio", "synthesis backend unreachable");
        assert!(!outcome.success);
        assert_eq!(outcome.error_kind(), Some("audio"));
        let wire = outcome.to_wire_json();
        assert_eq!(wire["data"]["type"], "audio");
        assert_eq!(wire["data"]["error"], "synthesis backend unreachable");
    }

    #[test]
    fn test_audio_round_trip() {
        let bytes = vec![0x00, 0x01, 0xfe, 0xff, 0x42];
        let outcome = ToolOutcome::from_audio(bytes.clone(), None);
        assert_eq!(outcome.audio_bytes(), Some(bytes.as_slice()));

        let wire = outcome.to_wire_json();
        assert_eq!(wire["data"]["audio_data"], "0001feff42");
        assert_eq!(wire["data"]["text"], "Audio generated successfully");
    }

    #[test]
    fn test_audio_caption() {
        let outcome = ToolOutcome::from_audio(vec![1, 2, 3], Some("Your intro".to_string()));
        assert_eq!(outcome.to_wire_json()["data"]["text"], "Your intro");
        assert_eq!(outcome.user_facing_text(), "Your intro");
    }

    #[test]
    fn test_user_facing_text_is_total() {
        assert_eq!(ToolOutcome::from_text("done").user_facing_text(), "done");
        assert_eq!(ToolOutcome::from_text("").user_facing_text(), "Operation completed");
        assert_eq!(
            ToolOutcome::from_audio(vec![1], None).user_facing_text(),
            "Audio generated successfully"
        );
        assert_eq!(
            ToolOutcome::from_error("boom").user_facing_text(),
            "Error: boom"
        );
    }

    #[test]
    fn test_non_audio_has_no_bytes() {
        assert!(ToolOutcome::from_text("hi").audio_bytes().is_none());
        assert!(ToolOutcome::from_error("x").audio_bytes().is_none());
    }
}
