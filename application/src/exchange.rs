//! Exchange orchestration.
//!
//! [`ExchangeRunner`] turns one inbound user message into a bounded sequence
//! of model round trips. Each round either ends the exchange with the
//! model's final answer or dispatches exactly one requested tool and feeds
//! its result back into the transcript.
//!
//! The loop is a two-state machine: it stays in *awaiting-model* while the
//! stop reason is `tool_use` and moves to *done* on `end_turn`. A hard bound
//! on tool round trips guards against a model that never stops asking for
//! tools; exhausting it produces a synthetic failure answer instead of
//! looping forever.

use crate::config::ExchangeConfig;
use crate::dispatch::ToolDispatcher;
use crate::ports::chat_transport::{ChatTransport, TransportError};
use crate::ports::exchange_logger::{ExchangeEvent, ExchangeLogger, NoExchangeLogger};
use crate::ports::model_gateway::{GatewayError, ModelGateway};
use crate::side_channel::AttachmentStore;
use cadenza_domain::{StopReason, SystemPrompt, Transcript, TranscriptError};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Reply sent when the tool round-trip bound is exhausted.
pub const LOOP_BOUND_REPLY: &str = "I couldn't complete this request.";

/// Reply sent when the exchange fails for any other reason.
pub const FAILURE_REPLY: &str = "An error occurred";

/// Errors that end an exchange without a model answer
#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Protocol violation: {0}")]
    Protocol(String),

    #[error(transparent)]
    Transcript(#[from] TranscriptError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Message carries neither text nor an attachment")]
    EmptyMessage,

    #[error("Exchange cancelled")]
    Cancelled,
}

/// One inbound user message, as handed over by the chat transport.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Message identifier; also the side-channel key for its attachment.
    pub id: String,
    /// Text or caption, if any.
    pub text: Option<String>,
    /// Identifier of an audio attachment to download, if any.
    pub attachment_id: Option<String>,
}

impl InboundMessage {
    pub fn text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: Some(text.into()),
            attachment_id: None,
        }
    }

    pub fn audio(
        id: impl Into<String>,
        attachment_id: impl Into<String>,
        caption: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            text: caption,
            attachment_id: Some(attachment_id.into()),
        }
    }
}

/// Runs one exchange at a time against the model capability.
///
/// One runner instance may serve many sequential exchanges; each exchange
/// gets its own [`Transcript`] and [`AttachmentStore`].
pub struct ExchangeRunner<G: ModelGateway> {
    gateway: Arc<G>,
    dispatcher: Arc<ToolDispatcher>,
    transport: Arc<dyn ChatTransport>,
    logger: Arc<dyn ExchangeLogger>,
    config: ExchangeConfig,
    system_prompt: String,
    cancellation: Option<CancellationToken>,
}

impl<G: ModelGateway> ExchangeRunner<G> {
    pub fn new(
        gateway: Arc<G>,
        dispatcher: Arc<ToolDispatcher>,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        Self {
            gateway,
            dispatcher,
            transport,
            logger: Arc::new(NoExchangeLogger),
            config: ExchangeConfig::default(),
            system_prompt: SystemPrompt::assistant(),
            cancellation: None,
        }
    }

    pub fn with_config(mut self, config: ExchangeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ExchangeLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Set a cancellation token for graceful interruption.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Process one inbound message from receipt to final reply.
    ///
    /// On success the reply has already been delivered through the transport
    /// and is returned for the caller. On a fatal error a generic failure
    /// reply is delivered before the error is returned.
    pub async fn handle_message(&self, message: InboundMessage) -> Result<String, ExchangeError> {
        let mut attachments = AttachmentStore::new();

        let user_text = match &message.attachment_id {
            Some(attachment_id) => {
                let bytes = self.transport.download_attachment(attachment_id).await?;
                debug!(
                    message_id = %message.id,
                    bytes = bytes.len(),
                    "Stored inbound audio attachment in side channel"
                );
                attachments.insert(message.id.clone(), bytes);
                format!(
                    "An audio file has been uploaded (message_id: {}). {}",
                    message.id,
                    message.text.as_deref().unwrap_or("Recognize this song")
                )
            }
            None => match &message.text {
                Some(text) => text.clone(),
                None => return Err(ExchangeError::EmptyMessage),
            },
        };

        self.logger.log(ExchangeEvent::new(
            "exchange_started",
            serde_json::json!({ "message_id": message.id, "text": user_text }),
        ));

        match self.run(&user_text, &attachments).await {
            Ok(reply) => {
                self.transport.send_text_reply(&reply).await?;
                self.logger.log(ExchangeEvent::new(
                    "exchange_completed",
                    serde_json::json!({ "message_id": message.id, "reply": reply }),
                ));
                Ok(reply)
            }
            Err(e) => {
                error!(message_id = %message.id, error = %e, "Exchange failed");
                self.logger.log(ExchangeEvent::new(
                    "exchange_failed",
                    serde_json::json!({ "message_id": message.id, "error": e.to_string() }),
                ));
                // Best effort: the user still gets an answer.
                if let Err(send_err) = self.transport.send_text_reply(FAILURE_REPLY).await {
                    warn!(error = %send_err, "Could not deliver failure reply");
                }
                Err(e)
            }
        }
    }

    /// The model/tool round-trip loop for one exchange.
    async fn run(
        &self,
        user_text: &str,
        attachments: &AttachmentStore,
    ) -> Result<String, ExchangeError> {
        let mut transcript = Transcript::new();
        transcript.append_user(user_text);

        let tools = self.dispatcher.catalog().to_api_tools();
        let mut tool_turns = 0usize;

        loop {
            self.check_cancelled()?;

            let response = self
                .gateway
                .send(transcript.to_model_payload(), &self.system_prompt, &tools)
                .await?;

            match response.stop_reason {
                StopReason::EndTurn => {
                    let text = response.text_content();
                    let reply = if text.is_empty() {
                        "Operation completed".to_string()
                    } else {
                        text
                    };
                    transcript.set_final_text(&reply)?;
                    info!(tool_turns, "Exchange finished");
                    return Ok(reply);
                }
                StopReason::ToolUse => {
                    let Some(invocation) = response.first_invocation() else {
                        return Err(ExchangeError::Protocol(
                            "stop reason 'tool_use' without a tool invocation".to_string(),
                        ));
                    };
                    if response.tool_invocations().len() > 1 {
                        warn!(
                            tool = %invocation.tool_name,
                            "Model requested several tools in one round; dispatching the first"
                        );
                    }

                    if tool_turns >= self.config.max_tool_turns {
                        warn!(
                            max_tool_turns = self.config.max_tool_turns,
                            "Tool round-trip bound exhausted"
                        );
                        transcript.set_final_text(LOOP_BOUND_REPLY)?;
                        return Ok(LOOP_BOUND_REPLY.to_string());
                    }
                    tool_turns += 1;

                    info!(
                        tool = %invocation.tool_name,
                        turn = tool_turns,
                        "Tool requested"
                    );

                    let outcome = self.dispatcher.dispatch(&invocation, attachments).await;
                    self.logger.log(ExchangeEvent::new(
                        "tool_dispatch",
                        serde_json::json!({
                            "tool": invocation.tool_name,
                            "invocation_id": invocation.invocation_id,
                            "success": outcome.success,
                        }),
                    ));

                    transcript.append_assistant_tool_call(&invocation, response.content)?;
                    transcript.append_tool_result(&invocation.invocation_id, &outcome)?;
                }
                StopReason::MaxTokens => {
                    return Err(ExchangeError::Protocol(
                        "model hit the token limit mid-answer".to_string(),
                    ));
                }
                StopReason::Other(reason) => {
                    return Err(ExchangeError::Protocol(format!(
                        "unexpected stop reason: {}",
                        reason
                    )));
                }
            }
        }
    }

    fn check_cancelled(&self) -> Result<(), ExchangeError> {
        if let Some(token) = &self.cancellation
            && token.is_cancelled()
        {
            return Err(ExchangeError::Cancelled);
        }
        Ok(())
    }
}
