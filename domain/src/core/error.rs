//! Domain error types

use thiserror::Error;

/// Violations of the transcript ordering protocol.
///
/// These indicate a broken orchestration loop, not bad user input: a tool
/// result may only be appended for the invocation that is currently open,
/// and a new tool call may not be opened while another is outstanding.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("No open tool invocation to attach a result to")]
    NoOpenInvocation,

    #[error("Tool result for invocation '{got}' does not match open invocation '{expected}'")]
    InvocationMismatch { expected: String, got: String },

    #[error("Tool invocation '{0}' is still open; its result must be appended first")]
    UnclosedInvocation(String),

    #[error("Transcript already finalized")]
    AlreadyFinalized,
}
