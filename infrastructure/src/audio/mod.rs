//! Audio capability adapters: recognition, synthesis, merging.

mod audd;
mod ffmpeg;
mod tts;

pub use audd::AuddRecognizer;
pub use ffmpeg::FfmpegMerger;
pub use tts::GoogleSpeechSynthesizer;
