//! Domain layer for cadenza
//!
//! This crate contains the core business logic, entities, and value objects
//! of the assistant. It has no dependencies on infrastructure or transport
//! concerns.
//!
//! # Core Concepts
//!
//! ## Exchange
//!
//! One inbound user message is processed as an *exchange*: the message is
//! appended to a [`Transcript`], sent to the model capability together with
//! the declared tool catalog, and the model either answers directly or
//! requests a tool call. Tool results are folded back into the transcript
//! and the loop continues until the model produces a final answer.
//!
//! ## Tools
//!
//! Tools are named, schema-declared local operations the model may request.
//! The fixed catalog covers user registration, event storage, song
//! recognition, speech synthesis and audio merging.

pub mod conversation;
pub mod core;
pub mod event;
pub mod prompt;
pub mod song;
pub mod tool;

// Re-export commonly used types
pub use conversation::{
    response::{ContentBlock, ModelResponse, StopReason},
    transcript::{Role, Transcript, Turn},
};
pub use core::error::TranscriptError;
pub use event::{Event, EventKind, Precision};
pub use prompt::SystemPrompt;
pub use song::SongMetadata;
pub use tool::{
    entities::{ToolCatalog, ToolDefinition, ToolInvocation, ToolParameter},
    outcome::ToolOutcome,
};
