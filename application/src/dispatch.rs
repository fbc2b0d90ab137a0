//! Tool dispatcher.
//!
//! Given a [`ToolInvocation`] from the model, the dispatcher resolves the
//! catalog entry, validates required arguments, injects side-channel bytes
//! where a tool needs them, invokes the capability behind the tool, and
//! normalizes the result into a [`ToolOutcome`]. Dispatch never fails:
//! every path, including handler errors, terminates in an outcome.
//!
//! Two tools have an outbound side effect beyond their returned data:
//! `generate_audio_fragment` and `merge_audio` deliver their audio to the
//! user through the transport before the outcome is returned.

use crate::catalog;
use crate::config::ExchangeConfig;
use crate::ports::audio::{AudioError, AudioMerger, SongRecognizer, SpeechSynthesizer};
use crate::ports::chat_transport::{ChatTransport, TransportError};
use crate::ports::event_store::{EventStore, EventStoreError};
use crate::ports::user_directory::{DirectoryError, UserDirectory};
use crate::side_channel::AttachmentStore;
use cadenza_domain::{Event, EventKind, Precision, ToolCatalog, ToolInvocation, ToolOutcome};
use cadenza_domain::event::parse_event_datetime;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Failure inside a tool handler, converted to outcome data at the dispatch
/// boundary.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Events(#[from] EventStoreError),

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HandlerError {
    /// Error-kind tag preserved on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            HandlerError::Directory(_) => "directory",
            HandlerError::Events(_) => "event_store",
            HandlerError::Audio(_) => "audio",
            HandlerError::Transport(_) => "transport",
            HandlerError::Serialization(_) => "serialization",
        }
    }
}

/// Dispatches tool invocations to the capability ports.
pub struct ToolDispatcher {
    catalog: ToolCatalog,
    users: Arc<dyn UserDirectory>,
    events: Arc<dyn EventStore>,
    recognizer: Arc<dyn SongRecognizer>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    merger: Arc<dyn AudioMerger>,
    transport: Arc<dyn ChatTransport>,
    config: ExchangeConfig,
}

impl ToolDispatcher {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn UserDirectory>,
        events: Arc<dyn EventStore>,
        recognizer: Arc<dyn SongRecognizer>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        merger: Arc<dyn AudioMerger>,
        transport: Arc<dyn ChatTransport>,
        config: ExchangeConfig,
    ) -> Self {
        Self {
            catalog: catalog::assistant_catalog(),
            users,
            events,
            recognizer,
            synthesizer,
            merger,
            transport,
            config,
        }
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Dispatch one invocation. Never panics and never returns an error:
    /// unknown tools, bad arguments and handler failures all become outcomes.
    pub async fn dispatch(
        &self,
        invocation: &ToolInvocation,
        attachments: &AttachmentStore,
    ) -> ToolOutcome {
        let Some(definition) = self.catalog.resolve(&invocation.tool_name) else {
            warn!("Unknown tool requested: {}", invocation.tool_name);
            return ToolOutcome::from_error(format!("Unknown tool: {}", invocation.tool_name));
        };

        for required in definition.required_parameters() {
            if !invocation.arguments.contains_key(required) {
                return ToolOutcome::from_error(format!(
                    "Missing required argument: {}",
                    required
                ));
            }
        }

        debug!(
            tool = %invocation.tool_name,
            invocation_id = %invocation.invocation_id,
            "Dispatching tool invocation"
        );

        let result = match invocation.tool_name.as_str() {
            catalog::CHECK_USER => self.handle_check_user(invocation).await,
            catalog::REGISTER_USER => self.handle_register_user(invocation).await,
            catalog::ADD_EVENT => self.handle_add_event(invocation).await,
            catalog::CHECK_TODAY_EVENTS => self.handle_check_today_events().await,
            catalog::RECOGNIZE_SONG => self.handle_recognize_song(invocation, attachments).await,
            catalog::GENERATE_AUDIO_FRAGMENT => {
                self.handle_generate_audio_fragment(invocation).await
            }
            catalog::MERGE_AUDIO => self.handle_merge_audio(invocation).await,
            // Registered but unrouted names cannot happen with the fixed
            // catalog; report instead of panicking if they ever do.
            other => Ok(ToolOutcome::from_error(format!("Unknown tool: {}", other))),
        };

        match result {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(tool = %invocation.tool_name, error = %e, "Tool handler failed");
                ToolOutcome::from_failure(e.kind(), e)
            }
        }
    }

    async fn handle_check_user(
        &self,
        invocation: &ToolInvocation,
    ) -> Result<ToolOutcome, HandlerError> {
        let handle = match invocation.require_string("telegramName") {
            Ok(h) => h,
            Err(e) => return Ok(ToolOutcome::from_error(e)),
        };
        let exists = self.users.check_user(handle).await?;
        Ok(ToolOutcome::from_text(
            serde_json::json!({"status": "success", "exists": exists}).to_string(),
        ))
    }

    async fn handle_register_user(
        &self,
        invocation: &ToolInvocation,
    ) -> Result<ToolOutcome, HandlerError> {
        let handle = match invocation.require_string("telegramName") {
            Ok(h) => h,
            Err(e) => return Ok(ToolOutcome::from_error(e)),
        };
        self.users.register_user(handle).await?;
        Ok(ToolOutcome::from_text(
            serde_json::json!({"status": "success"}).to_string(),
        ))
    }

    async fn handle_add_event(
        &self,
        invocation: &ToolInvocation,
    ) -> Result<ToolOutcome, HandlerError> {
        // Required presence is already checked; values still need parsing.
        let around = match invocation
            .require_string("around")
            .and_then(|s| parse_event_datetime(s))
        {
            Ok(dt) => dt,
            Err(e) => return Ok(ToolOutcome::from_error(e)),
        };

        let precision: Precision = match parse_enum_argument(invocation, "precision") {
            Ok(p) => p,
            Err(e) => return Ok(ToolOutcome::from_error(e)),
        };
        let kind: EventKind = match parse_enum_argument(invocation, "type") {
            Ok(k) => k,
            Err(e) => return Ok(ToolOutcome::from_error(e)),
        };

        let description = invocation.get_string("description").unwrap_or_default();
        let author = invocation.get_string("author").unwrap_or_default();

        let event = Event::new(around, precision, description, kind, author);
        let event_id = self.events.add_event(event).await?;

        Ok(ToolOutcome::from_text(
            serde_json::json!({"status": "success", "event_id": event_id}).to_string(),
        ))
    }

    async fn handle_check_today_events(&self) -> Result<ToolOutcome, HandlerError> {
        let events = self.events.events_today().await?;
        let payload = serde_json::json!({
            "status": "success",
            "events": events,
        });
        Ok(ToolOutcome::from_text(serde_json::to_string(&payload)?))
    }

    async fn handle_recognize_song(
        &self,
        invocation: &ToolInvocation,
        attachments: &AttachmentStore,
    ) -> Result<ToolOutcome, HandlerError> {
        let message_id = match invocation.require_string("message_id") {
            Ok(id) => id,
            Err(e) => return Ok(ToolOutcome::from_error(e)),
        };

        let Some(audio) = attachments.get(message_id) else {
            return Ok(ToolOutcome::from_error(format!(
                "No audio attachment found for message_id: {}",
                message_id
            )));
        };

        let metadata = self.recognizer.recognize(audio).await?;
        let payload = serde_json::json!({
            "status": "success",
            "metadata": metadata,
        });
        Ok(ToolOutcome::from_text(serde_json::to_string(&payload)?))
    }

    async fn handle_generate_audio_fragment(
        &self,
        invocation: &ToolInvocation,
    ) -> Result<ToolOutcome, HandlerError> {
        let text = match invocation.require_string("text") {
            Ok(t) => t,
            Err(e) => return Ok(ToolOutcome::from_error(e)),
        };
        let voice = invocation
            .get_string("voice_name")
            .unwrap_or(&self.config.voice_name);
        let language = invocation
            .get_string("language_code")
            .unwrap_or(&self.config.language_code);

        let speech = self.synthesizer.synthesize(text, voice, language).await?;
        self.transport
            .send_audio_reply(&speech, "tts_audio.mp3")
            .await?;

        Ok(ToolOutcome::from_audio(speech, None))
    }

    async fn handle_merge_audio(
        &self,
        invocation: &ToolInvocation,
    ) -> Result<ToolOutcome, HandlerError> {
        let intro = match require_hex_argument(invocation, "intro_audio") {
            Ok(b) => b,
            Err(e) => return Ok(ToolOutcome::from_error(e)),
        };
        let main = match require_hex_argument(invocation, "main_audio") {
            Ok(b) => b,
            Err(e) => return Ok(ToolOutcome::from_error(e)),
        };

        let merged = self.merger.merge(&intro, &main).await?;
        self.transport
            .send_audio_reply(&merged, "merged_audio.mp3")
            .await?;

        Ok(ToolOutcome::from_audio(merged, None))
    }
}

fn parse_enum_argument<T: serde::de::DeserializeOwned>(
    invocation: &ToolInvocation,
    key: &str,
) -> Result<T, String> {
    let value = invocation.require_string(key)?;
    serde_json::from_value(serde_json::json!(value))
        .map_err(|_| format!("Invalid value for {}: {}", key, value))
}

fn require_hex_argument(invocation: &ToolInvocation, key: &str) -> Result<Vec<u8>, String> {
    let value = invocation.require_string(key)?;
    hex::decode(value).map_err(|_| format!("Invalid hex data in argument: {}", key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cadenza_domain::SongMetadata;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct StubDirectory;

    #[async_trait]
    impl UserDirectory for StubDirectory {
        async fn check_user(&self, handle: &str) -> Result<bool, DirectoryError> {
            Ok(handle == "ada")
        }
        async fn register_user(&self, _handle: &str) -> Result<(), DirectoryError> {
            Ok(())
        }
    }

    struct StubEventStore;

    #[async_trait]
    impl EventStore for StubEventStore {
        async fn add_event(&self, _event: Event) -> Result<String, EventStoreError> {
            Ok("evt-1".to_string())
        }
        async fn events_today(&self) -> Result<Vec<Event>, EventStoreError> {
            Ok(vec![])
        }
    }

    struct OkRecognizer;

    #[async_trait]
    impl SongRecognizer for OkRecognizer {
        async fn recognize(&self, _audio: &[u8]) -> Result<SongMetadata, AudioError> {
            Ok(SongMetadata::new("Companero", "Camaro's"))
        }
    }

    struct FailingRecognizer;

    #[async_trait]
    impl SongRecognizer for FailingRecognizer {
        async fn recognize(&self, _audio: &[u8]) -> Result<SongMetadata, AudioError> {
            Err(AudioError::Http("connection reset".to_string()))
        }
    }

    struct StubSynthesizer;

    #[async_trait]
    impl SpeechSynthesizer for StubSynthesizer {
        async fn synthesize(
            &self,
            _text: &str,
            _voice: &str,
            _language: &str,
        ) -> Result<Vec<u8>, AudioError> {
            Ok(vec![0xAA, 0xBB])
        }
    }

    struct StubMerger;

    #[async_trait]
    impl AudioMerger for StubMerger {
        async fn merge(&self, intro: &[u8], main: &[u8]) -> Result<Vec<u8>, AudioError> {
            Ok([intro, main].concat())
        }
    }

    /// Records delivered replies for assertions.
    #[derive(Default)]
    struct RecordingTransport {
        audio: Mutex<Vec<(Vec<u8>, String)>>,
    }

    #[async_trait]
    impl ChatTransport for RecordingTransport {
        async fn download_attachment(&self, id: &str) -> Result<Vec<u8>, TransportError> {
            Err(TransportError::AttachmentNotFound(id.to_string()))
        }
        async fn send_text_reply(&self, _text: &str) -> Result<(), TransportError> {
            Ok(())
        }
        async fn send_audio_reply(
            &self,
            bytes: &[u8],
            filename: &str,
        ) -> Result<(), TransportError> {
            self.audio
                .lock()
                .unwrap()
                .push((bytes.to_vec(), filename.to_string()));
            Ok(())
        }
    }

    fn dispatcher_with(
        recognizer: Arc<dyn SongRecognizer>,
        transport: Arc<RecordingTransport>,
    ) -> ToolDispatcher {
        ToolDispatcher::new(
            Arc::new(StubDirectory),
            Arc::new(StubEventStore),
            recognizer,
            Arc::new(StubSynthesizer),
            Arc::new(StubMerger),
            transport,
            ExchangeConfig::default(),
        )
    }

    fn invocation(tool: &str, args: &[(&str, serde_json::Value)]) -> ToolInvocation {
        let arguments: HashMap<String, serde_json::Value> = args
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        ToolInvocation::new("inv-1", tool, arguments)
    }

    #[tokio::test]
    async fn test_unknown_tool_is_recoverable() {
        let dispatcher = dispatcher_with(Arc::new(OkRecognizer), Arc::default());
        let outcome = dispatcher
            .dispatch(&invocation("nonexistent_tool", &[]), &AttachmentStore::new())
            .await;

        assert!(!outcome.success);
        assert!(outcome.user_facing_text().contains("Unknown tool"));
    }

    #[tokio::test]
    async fn test_missing_required_argument() {
        let dispatcher = dispatcher_with(Arc::new(OkRecognizer), Arc::default());
        let outcome = dispatcher
            .dispatch(&invocation(catalog::CHECK_USER, &[]), &AttachmentStore::new())
            .await;

        assert!(!outcome.success);
        assert!(
            outcome
                .user_facing_text()
                .contains("Missing required argument: telegramName")
        );
    }

    #[tokio::test]
    async fn test_check_user_reports_existence() {
        let dispatcher = dispatcher_with(Arc::new(OkRecognizer), Arc::default());
        let outcome = dispatcher
            .dispatch(
                &invocation(catalog::CHECK_USER, &[("telegramName", serde_json::json!("ada"))]),
                &AttachmentStore::new(),
            )
            .await;

        assert!(outcome.success);
        let wire = outcome.to_wire_json();
        let data: serde_json::Value =
            serde_json::from_str(wire["data"].as_str().unwrap()).unwrap();
        assert_eq!(data["exists"], true);
    }

    #[tokio::test]
    async fn test_add_event_returns_generated_id() {
        let dispatcher = dispatcher_with(Arc::new(OkRecognizer), Arc::default());
        let outcome = dispatcher
            .dispatch(
                &invocation(
                    catalog::ADD_EVENT,
                    &[
                        ("around", serde_json::json!("2026-08-30T09:00:00")),
                        ("precision", serde_json::json!("exact_time")),
                        ("description", serde_json::json!("dentist")),
                        ("type", serde_json::json!("reminder")),
                        ("author", serde_json::json!("ada")),
                    ],
                ),
                &AttachmentStore::new(),
            )
            .await;

        assert!(outcome.success);
        assert!(outcome.user_facing_text().contains("evt-1"));
    }

    #[tokio::test]
    async fn test_add_event_rejects_bad_precision() {
        let dispatcher = dispatcher_with(Arc::new(OkRecognizer), Arc::default());
        let outcome = dispatcher
            .dispatch(
                &invocation(
                    catalog::ADD_EVENT,
                    &[
                        ("around", serde_json::json!("2026-08-30T09:00:00")),
                        ("precision", serde_json::json!("whenever")),
                        ("description", serde_json::json!("dentist")),
                        ("type", serde_json::json!("reminder")),
                        ("author", serde_json::json!("ada")),
                    ],
                ),
                &AttachmentStore::new(),
            )
            .await;

        assert!(!outcome.success);
        assert!(outcome.user_facing_text().contains("precision"));
    }

    #[tokio::test]
    async fn test_recognize_song_resolves_side_channel() {
        let dispatcher = dispatcher_with(Arc::new(OkRecognizer), Arc::default());
        let mut attachments = AttachmentStore::new();
        attachments.insert("42", vec![1, 2, 3]);

        let outcome = dispatcher
            .dispatch(
                &invocation(catalog::RECOGNIZE_SONG, &[("message_id", serde_json::json!("42"))]),
                &attachments,
            )
            .await;

        assert!(outcome.success);
        assert!(outcome.user_facing_text().contains("Companero"));
    }

    #[tokio::test]
    async fn test_recognize_song_without_attachment() {
        let dispatcher = dispatcher_with(Arc::new(OkRecognizer), Arc::default());
        let outcome = dispatcher
            .dispatch(
                &invocation(catalog::RECOGNIZE_SONG, &[("message_id", serde_json::json!("42"))]),
                &AttachmentStore::new(),
            )
            .await;

        assert!(!outcome.success);
        assert!(outcome.user_facing_text().contains("42"));
    }

    #[tokio::test]
    async fn test_handler_failure_is_contained() {
        let dispatcher = dispatcher_with(Arc::new(FailingRecognizer), Arc::default());
        let mut attachments = AttachmentStore::new();
        attachments.insert("42", vec![1, 2, 3]);

        let outcome = dispatcher
            .dispatch(
                &invocation(catalog::RECOGNIZE_SONG, &[("message_id", serde_json::json!("42"))]),
                &attachments,
            )
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.error_kind(), Some("audio"));
    }

    #[tokio::test]
    async fn test_generate_audio_delivers_to_user() {
        let transport = Arc::new(RecordingTransport::default());
        let dispatcher = dispatcher_with(Arc::new(OkRecognizer), transport.clone());

        let outcome = dispatcher
            .dispatch(
                &invocation(
                    catalog::GENERATE_AUDIO_FRAGMENT,
                    &[("text", serde_json::json!("Hello there"))],
                ),
                &AttachmentStore::new(),
            )
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.audio_bytes(), Some([0xAA, 0xBB].as_slice()));

        let delivered = transport.audio.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].1, "tts_audio.mp3");
    }

    #[tokio::test]
    async fn test_merge_audio_concatenates_and_delivers() {
        let transport = Arc::new(RecordingTransport::default());
        let dispatcher = dispatcher_with(Arc::new(OkRecognizer), transport.clone());

        let outcome = dispatcher
            .dispatch(
                &invocation(
                    catalog::MERGE_AUDIO,
                    &[
                        ("intro_audio", serde_json::json!("0102")),
                        ("main_audio", serde_json::json!("0304")),
                    ],
                ),
                &AttachmentStore::new(),
            )
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.audio_bytes(), Some([1, 2, 3, 4].as_slice()));
        assert_eq!(transport.audio.lock().unwrap()[0].1, "merged_audio.mp3");
    }

    #[tokio::test]
    async fn test_merge_audio_rejects_bad_hex() {
        let dispatcher = dispatcher_with(Arc::new(OkRecognizer), Arc::default());
        let outcome = dispatcher
            .dispatch(
                &invocation(
                    catalog::MERGE_AUDIO,
                    &[
                        ("intro_audio", serde_json::json!("not-hex")),
                        ("main_audio", serde_json::json!("0304")),
                    ],
                ),
                &AttachmentStore::new(),
            )
            .await;

        assert!(!outcome.success);
        assert!(outcome.user_facing_text().contains("intro_audio"));
    }
}
