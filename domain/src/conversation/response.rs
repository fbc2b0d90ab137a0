//! Structured model responses.
//!
//! The model capability returns an ordered list of content blocks (text
//! and/or tool use requests) plus a stop reason. When the stop reason is
//! [`StopReason::ToolUse`] the orchestrator must execute the requested tool
//! and feed the result back; on [`StopReason::EndTurn`] the text content is
//! the final answer.

use crate::tool::entities::ToolInvocation;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single block of content within a model response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// A text content block from the model.
    Text { text: String },

    /// A tool use request from the model.
    ///
    /// The model capability assigns the `id` used to correlate the tool
    /// result on the next round trip.
    ToolUse {
        id: String,
        name: String,
        input: HashMap<String, serde_json::Value>,
    },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Returns the text content if this is a `Text` block.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text } => Some(text),
            _ => None,
        }
    }

    /// Returns `true` if this is a tool use request.
    pub fn is_tool_use(&self) -> bool {
        matches!(self, ContentBlock::ToolUse { .. })
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of response: the model is done answering.
    EndTurn,
    /// The model wants a tool executed; dispatch it and send the result back.
    ToolUse,
    /// Hit the token limit; the response may be truncated.
    MaxTokens,
    /// Provider-specific stop reason.
    Other(String),
}

/// A structured response from the model capability.
#[derive(Debug, Clone)]
pub struct ModelResponse {
    /// Content blocks in the response (text and/or tool use).
    pub content: Vec<ContentBlock>,
    /// Why the model stopped generating.
    pub stop_reason: StopReason,
}

impl ModelResponse {
    /// Create a text-only response that ends the turn.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            stop_reason: StopReason::EndTurn,
        }
    }

    /// Concatenate all text blocks into a single string.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|b| b.as_text())
            .collect::<Vec<_>>()
            .join("")
    }

    /// Extract all tool use blocks as invocations in order.
    pub fn tool_invocations(&self) -> Vec<ToolInvocation> {
        self.content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::ToolUse { id, name, input } => {
                    Some(ToolInvocation::new(id, name, input.clone()))
                }
                _ => None,
            })
            .collect()
    }

    /// The first (actionable) tool use block, if any.
    pub fn first_invocation(&self) -> Option<ToolInvocation> {
        self.tool_invocations().into_iter().next()
    }

    pub fn has_tool_invocations(&self) -> bool {
        self.content.iter().any(ContentBlock::is_tool_use)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool_use(id: &str, name: &str) -> ContentBlock {
        ContentBlock::ToolUse {
            id: id.to_string(),
            name: name.to_string(),
            input: [("telegramName".to_string(), serde_json::json!("ada"))]
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn from_text_ends_turn() {
        let response = ModelResponse::from_text("Hello!");
        assert_eq!(response.stop_reason, StopReason::EndTurn);
        assert_eq!(response.text_content(), "Hello!");
        assert!(!response.has_tool_invocations());
        assert!(response.first_invocation().is_none());
    }

    #[test]
    fn invocation_extraction() {
        let response = ModelResponse {
            content: vec![
                ContentBlock::text("Let me check that user. "),
                tool_use("inv-1", "check_user"),
            ],
            stop_reason: StopReason::ToolUse,
        };

        assert!(response.has_tool_invocations());
        assert_eq!(response.text_content(), "Let me check that user. ");

        let invocation = response.first_invocation().unwrap();
        assert_eq!(invocation.invocation_id, "inv-1");
        assert_eq!(invocation.tool_name, "check_user");
        assert_eq!(invocation.get_string("telegramName"), Some("ada"));
    }

    #[test]
    fn first_invocation_picks_the_first_of_several() {
        let response = ModelResponse {
            content: vec![tool_use("inv-1", "check_user"), tool_use("inv-2", "register_user")],
            stop_reason: StopReason::ToolUse,
        };
        assert_eq!(response.tool_invocations().len(), 2);
        assert_eq!(response.first_invocation().unwrap().invocation_id, "inv-1");
    }

    #[test]
    fn empty_response() {
        let response = ModelResponse {
            content: vec![],
            stop_reason: StopReason::EndTurn,
        };
        assert_eq!(response.text_content(), "");
        assert!(response.tool_invocations().is_empty());
    }
}
