//! Chat transport port
//!
//! The surrounding chat platform: downloading message attachments and
//! delivering text or audio replies to the user.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during transport operations
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Attachment '{0}' not found")]
    AttachmentNotFound(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Reply delivery failed: {0}")]
    DeliveryFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Port for the chat transport collaborator
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Download the raw bytes of a message attachment.
    async fn download_attachment(&self, id: &str) -> Result<Vec<u8>, TransportError>;

    /// Deliver a text reply to the user.
    async fn send_text_reply(&self, text: &str) -> Result<(), TransportError>;

    /// Deliver an audio reply to the user as a message attachment.
    async fn send_audio_reply(&self, bytes: &[u8], filename: &str) -> Result<(), TransportError>;
}
