//! Model gateway port
//!
//! Defines the interface for the language-model capability. The gateway is
//! given the serialized transcript, the fixed system prompt and the declared
//! tool catalog, and returns a structured response with a stop reason.

use async_trait::async_trait;
use cadenza_domain::ModelResponse;
use thiserror::Error;

/// Errors that can occur during model gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Malformed model response: {0}")]
    Protocol(String),

    #[error("Timeout")]
    Timeout,
}

/// Gateway for model communication
///
/// One call corresponds to one round trip of the tool-use loop. The payload
/// is the full ordered transcript; the gateway holds no conversational state
/// of its own.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn send(
        &self,
        transcript: serde_json::Value,
        system_prompt: &str,
        tools: &[serde_json::Value],
    ) -> Result<ModelResponse, GatewayError>;
}
