//! Conversation module: the transcript exchanged with the model and the
//! structured responses coming back from it.

pub mod response;
pub mod transcript;

pub use response::{ContentBlock, ModelResponse, StopReason};
pub use transcript::{Role, Transcript, Turn};
