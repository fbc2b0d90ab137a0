//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Secrets (API keys) never live here; they come from the environment at
//! wiring time.

use cadenza_application::config::{DEFAULT_MAX_TOOL_TURNS, ExchangeConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Model and orchestration settings
    pub assistant: FileAssistantConfig,
    /// Audio backend settings
    pub audio: FileAudioConfig,
    /// Structured logging settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Project the file settings onto the application's exchange config.
    pub fn to_exchange_config(&self) -> ExchangeConfig {
        ExchangeConfig {
            max_tool_turns: self.assistant.max_tool_turns,
            voice_name: self.audio.voice_name.clone(),
            language_code: self.audio.language_code.clone(),
        }
    }
}

/// `[assistant]` section: model selection and the tool-loop bound.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAssistantConfig {
    /// Model identifier sent to the API.
    pub model: String,
    /// Token cap for each model response.
    pub max_tokens: u32,
    /// Upper bound on tool round trips per exchange.
    pub max_tool_turns: usize,
    /// API base URL, overridable for proxies and tests.
    pub base_url: String,
}

impl Default for FileAssistantConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-5".to_string(),
            max_tokens: 1024,
            max_tool_turns: DEFAULT_MAX_TOOL_TURNS,
            base_url: "https://api.anthropic.com".to_string(),
        }
    }
}

/// `[audio]` section: synthesis voice and backend endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAudioConfig {
    /// Default synthesis voice when the model doesn't pick one.
    pub voice_name: String,
    /// Default synthesis language.
    pub language_code: String,
    /// Speech synthesis endpoint.
    pub tts_endpoint: String,
    /// Song recognition endpoint.
    pub audd_endpoint: String,
    /// ffmpeg binary used for merging; resolved via PATH by default.
    pub ffmpeg_path: String,
}

impl Default for FileAudioConfig {
    fn default() -> Self {
        Self {
            voice_name: "en-US-Wavenet-D".to_string(),
            language_code: "en-US".to_string(),
            tts_endpoint: "https://texttospeech.googleapis.com/v1/text:synthesize".to_string(),
            audd_endpoint: "https://api.audd.io/".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Path for the JSONL exchange log; absent means no structured log.
    pub exchange_log: Option<PathBuf>,
}
