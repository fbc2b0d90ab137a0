//! Console chat transport.
//!
//! Attachment ids are local file paths, text replies go to stdout and audio
//! replies are written to an output directory. This is the transport used by
//! the CLI; a messaging-platform transport would implement the same port.

use async_trait::async_trait;
use cadenza_application::ports::chat_transport::{ChatTransport, TransportError};
use std::path::{Path, PathBuf};
use tracing::info;

/// [`ChatTransport`] for interactive terminal use.
pub struct ConsoleTransport {
    output_dir: PathBuf,
}

impl ConsoleTransport {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[async_trait]
impl ChatTransport for ConsoleTransport {
    async fn download_attachment(&self, id: &str) -> Result<Vec<u8>, TransportError> {
        let path = Path::new(id);
        if !path.exists() {
            return Err(TransportError::AttachmentNotFound(id.to_string()));
        }
        tokio::fs::read(path)
            .await
            .map_err(|e| TransportError::DownloadFailed(format!("{}: {}", id, e)))
    }

    async fn send_text_reply(&self, text: &str) -> Result<(), TransportError> {
        println!("{}", text);
        Ok(())
    }

    async fn send_audio_reply(&self, bytes: &[u8], filename: &str) -> Result<(), TransportError> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(filename);
        tokio::fs::write(&path, bytes).await?;
        info!(path = %path.display(), bytes = bytes.len(), "Wrote audio reply");
        println!("[audio reply written to {}]", path.display());
        Ok(())
    }
}
