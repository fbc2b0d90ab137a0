//! Model gateway for the Anthropic Messages API.
//!
//! One `send` is one `POST /v1/messages` carrying the full transcript, the
//! system prompt and the declared tool catalog. The response's content
//! blocks and stop reason map directly onto [`ModelResponse`].

use async_trait::async_trait;
use cadenza_application::ports::model_gateway::{GatewayError, ModelGateway};
use cadenza_domain::{ContentBlock, ModelResponse, StopReason};
use serde_json::{Value, json};
use tracing::{debug, warn};

const API_VERSION: &str = "2023-06-01";

/// [`ModelGateway`] backed by the Anthropic Messages API.
pub struct AnthropicGateway {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicGateway {
    pub fn new(
        client: reqwest::Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
            max_tokens,
        }
    }

    fn parse_response(payload: &Value) -> Result<ModelResponse, GatewayError> {
        let blocks = payload
            .get("content")
            .and_then(Value::as_array)
            .ok_or_else(|| GatewayError::Protocol("missing content array".to_string()))?;

        let mut content = Vec::with_capacity(blocks.len());
        for block in blocks {
            match serde_json::from_value::<ContentBlock>(block.clone()) {
                Ok(parsed) => content.push(parsed),
                // Unknown block kinds (e.g. thinking) are not part of the
                // tool-use protocol and can be skipped.
                Err(e) => debug!(error = %e, "Skipping unsupported content block"),
            }
        }

        let stop_reason = match payload.get("stop_reason").and_then(Value::as_str) {
            Some("end_turn") => StopReason::EndTurn,
            Some("tool_use") => StopReason::ToolUse,
            Some("max_tokens") => StopReason::MaxTokens,
            Some(other) => StopReason::Other(other.to_string()),
            None => {
                return Err(GatewayError::Protocol("missing stop_reason".to_string()));
            }
        };

        Ok(ModelResponse {
            content,
            stop_reason,
        })
    }
}

#[async_trait]
impl ModelGateway for AnthropicGateway {
    async fn send(
        &self,
        transcript: Value,
        system_prompt: &str,
        tools: &[Value],
    ) -> Result<ModelResponse, GatewayError> {
        let body = json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "system": system_prompt,
            "messages": transcript,
            "tools": tools,
        });

        debug!(model = %self.model, "Sending model request");
        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::ConnectionError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Model request rejected");
            return Err(GatewayError::RequestFailed(format!(
                "{}: {}",
                status.as_u16(),
                detail
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::Protocol(e.to_string()))?;

        Self::parse_response(&payload)
    }
}
