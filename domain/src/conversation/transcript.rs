//! Conversation transcript entities.
//!
//! A [`Transcript`] is the append-only ordered sequence of turns exchanged
//! with the model during one exchange. The ordering invariant is enforced
//! here: an assistant tool-call turn opens exactly one invocation which must
//! be closed by a matching tool-result turn before the next model request.

use crate::conversation::response::ContentBlock;
use crate::core::error::TranscriptError;
use crate::tool::entities::ToolInvocation;
use crate::tool::outcome::ToolOutcome;
use serde::{Deserialize, Serialize};

/// Role of a turn in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    ToolResult,
}

/// One entry in the conversation transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Turn {
    /// Plain user text.
    User { text: String },
    /// The assistant's content for a round in which it requested a tool,
    /// echoed back verbatim on the next request.
    Assistant { content: Vec<ContentBlock> },
    /// The outcome of a tool invocation, correlated by invocation id.
    ToolResult {
        invocation_id: String,
        content: String,
    },
}

impl Turn {
    pub fn role(&self) -> Role {
        match self {
            Turn::User { .. } => Role::User,
            Turn::Assistant { .. } => Role::Assistant,
            Turn::ToolResult { .. } => Role::ToolResult,
        }
    }
}

/// The ordered transcript of one exchange.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
    /// Invocation id opened by the last assistant tool-call turn and not yet
    /// answered by a tool-result turn.
    open_invocation: Option<String>,
    final_text: Option<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Final assistant answer, once the exchange reached a terminal turn.
    pub fn final_text(&self) -> Option<&str> {
        self.final_text.as_deref()
    }

    pub fn append_user(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::User { text: text.into() });
    }

    /// Append the assistant turn that requested `invocation`, opening it.
    ///
    /// `content` is the model's full response content for the round, which
    /// must be echoed back with the tool result on the next request.
    pub fn append_assistant_tool_call(
        &mut self,
        invocation: &ToolInvocation,
        content: Vec<ContentBlock>,
    ) -> Result<(), TranscriptError> {
        if let Some(open) = &self.open_invocation {
            return Err(TranscriptError::UnclosedInvocation(open.clone()));
        }
        self.open_invocation = Some(invocation.invocation_id.clone());
        self.turns.push(Turn::Assistant { content });
        Ok(())
    }

    /// Append the result of the currently open invocation, closing it.
    pub fn append_tool_result(
        &mut self,
        invocation_id: &str,
        outcome: &ToolOutcome,
    ) -> Result<(), TranscriptError> {
        match self.open_invocation.take() {
            None => Err(TranscriptError::NoOpenInvocation),
            Some(expected) if expected != invocation_id => {
                // Put it back so the caller can still close it correctly.
                self.open_invocation = Some(expected.clone());
                Err(TranscriptError::InvocationMismatch {
                    expected,
                    got: invocation_id.to_string(),
                })
            }
            Some(_) => {
                self.turns.push(Turn::ToolResult {
                    invocation_id: invocation_id.to_string(),
                    content: outcome.to_wire_json().to_string(),
                });
                Ok(())
            }
        }
    }

    /// Record the terminal assistant answer.
    pub fn set_final_text(&mut self, text: impl Into<String>) -> Result<(), TranscriptError> {
        if self.final_text.is_some() {
            return Err(TranscriptError::AlreadyFinalized);
        }
        self.final_text = Some(text.into());
        Ok(())
    }

    /// Serialize the transcript into the ordered message sequence the model
    /// capability expects.
    ///
    /// Tool results travel as `user` messages carrying a `tool_result` block,
    /// per the model capability's wire protocol.
    pub fn to_model_payload(&self) -> serde_json::Value {
        let messages: Vec<serde_json::Value> = self
            .turns
            .iter()
            .map(|turn| match turn {
                Turn::User { text } => serde_json::json!({
                    "role": "user",
                    "content": [{"type": "text", "text": text}],
                }),
                Turn::Assistant { content } => serde_json::json!({
                    "role": "assistant",
                    "content": content,
                }),
                Turn::ToolResult {
                    invocation_id,
                    content,
                } => serde_json::json!({
                    "role": "user",
                    "content": [{
                        "type": "tool_result",
                        "tool_use_id": invocation_id,
                        "content": content,
                    }],
                }),
            })
            .collect();

        serde_json::Value::Array(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn invocation(id: &str) -> ToolInvocation {
        ToolInvocation::new(id, "check_user", HashMap::new())
    }

    fn tool_call_content(id: &str) -> Vec<ContentBlock> {
        vec![
            ContentBlock::text("Checking..."),
            ContentBlock::ToolUse {
                id: id.to_string(),
                name: "check_user".to_string(),
                input: HashMap::new(),
            },
        ]
    }

    #[test]
    fn test_append_and_roles() {
        let mut transcript = Transcript::new();
        transcript.append_user("hello");
        transcript
            .append_assistant_tool_call(&invocation("inv-1"), tool_call_content("inv-1"))
            .unwrap();
        transcript
            .append_tool_result("inv-1", &ToolOutcome::from_text("ok"))
            .unwrap();

        let roles: Vec<_> = transcript.turns().iter().map(Turn::role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::ToolResult]);
    }

    #[test]
    fn test_result_without_open_invocation_fails() {
        let mut transcript = Transcript::new();
        transcript.append_user("hello");
        let err = transcript
            .append_tool_result("inv-1", &ToolOutcome::from_text("ok"))
            .unwrap_err();
        assert_eq!(err, TranscriptError::NoOpenInvocation);
    }

    #[test]
    fn test_mismatched_result_fails_and_keeps_invocation_open() {
        let mut transcript = Transcript::new();
        transcript
            .append_assistant_tool_call(&invocation("inv-1"), tool_call_content("inv-1"))
            .unwrap();

        let err = transcript
            .append_tool_result("inv-9", &ToolOutcome::from_text("ok"))
            .unwrap_err();
        assert_eq!(
            err,
            TranscriptError::InvocationMismatch {
                expected: "inv-1".to_string(),
                got: "inv-9".to_string(),
            }
        );

        // The correct id still closes it.
        transcript
            .append_tool_result("inv-1", &ToolOutcome::from_text("ok"))
            .unwrap();
    }

    #[test]
    fn test_double_open_fails() {
        let mut transcript = Transcript::new();
        transcript
            .append_assistant_tool_call(&invocation("inv-1"), tool_call_content("inv-1"))
            .unwrap();
        let err = transcript
            .append_assistant_tool_call(&invocation("inv-2"), tool_call_content("inv-2"))
            .unwrap_err();
        assert_eq!(err, TranscriptError::UnclosedInvocation("inv-1".to_string()));
    }

    #[test]
    fn test_model_payload_shape() {
        let mut transcript = Transcript::new();
        transcript.append_user("recognize this");
        transcript
            .append_assistant_tool_call(&invocation("inv-1"), tool_call_content("inv-1"))
            .unwrap();
        transcript
            .append_tool_result("inv-1", &ToolOutcome::from_text("ok"))
            .unwrap();

        let payload = transcript.to_model_payload();
        let messages = payload.as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"][0]["type"], "text");
        assert_eq!(messages[1]["role"], "assistant");
        assert_eq!(messages[1]["content"][1]["type"], "tool_use");
        assert_eq!(messages[2]["role"], "user");
        assert_eq!(messages[2]["content"][0]["type"], "tool_result");
        assert_eq!(messages[2]["content"][0]["tool_use_id"], "inv-1");
        // The tool result content is the wire JSON as a string
        let embedded: serde_json::Value =
            serde_json::from_str(messages[2]["content"][0]["content"].as_str().unwrap()).unwrap();
        assert_eq!(embedded["success"], true);
    }

    #[test]
    fn test_final_text_set_once() {
        let mut transcript = Transcript::new();
        transcript.set_final_text("done").unwrap();
        assert_eq!(transcript.final_text(), Some("done"));
        assert_eq!(
            transcript.set_final_text("again").unwrap_err(),
            TranscriptError::AlreadyFinalized
        );
    }
}
