//! Configuration loading and file format.

mod file_config;
mod loader;

pub use file_config::{FileAssistantConfig, FileAudioConfig, FileConfig, FileLoggingConfig};
pub use loader::ConfigLoader;
