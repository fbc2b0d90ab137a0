//! Audio concatenation via an external ffmpeg process.
//!
//! The two inputs land in a scratch directory and are joined with ffmpeg's
//! `concat` filter, which re-encodes so inputs with differing codecs or
//! sample rates still merge cleanly.

use async_trait::async_trait;
use cadenza_application::ports::audio::{AudioError, AudioMerger};
use tokio::process::Command;
use tracing::debug;

/// [`AudioMerger`] that shells out to ffmpeg.
pub struct FfmpegMerger {
    ffmpeg_path: String,
}

impl FfmpegMerger {
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }
}

impl Default for FfmpegMerger {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl AudioMerger for FfmpegMerger {
    async fn merge(&self, intro: &[u8], main: &[u8]) -> Result<Vec<u8>, AudioError> {
        let scratch = tempfile::tempdir()?;
        let intro_path = scratch.path().join("intro.mp3");
        let main_path = scratch.path().join("main.mp3");
        let out_path = scratch.path().join("merged.mp3");

        tokio::fs::write(&intro_path, intro).await?;
        tokio::fs::write(&main_path, main).await?;

        debug!(
            intro_bytes = intro.len(),
            main_bytes = main.len(),
            "Merging audio via ffmpeg"
        );

        let output = Command::new(&self.ffmpeg_path)
            .arg("-y")
            .arg("-i")
            .arg(&intro_path)
            .arg("-i")
            .arg(&main_path)
            .arg("-filter_complex")
            .arg("[0:a][1:a]concat=n=2:v=0:a=1[out]")
            .arg("-map")
            .arg("[out]")
            .arg(&out_path)
            .output()
            .await
            .map_err(|e| AudioError::Merge(format!("could not run ffmpeg: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let last_line = stderr.lines().last().unwrap_or("unknown ffmpeg error");
            return Err(AudioError::Merge(last_line.to_string()));
        }

        Ok(tokio::fs::read(&out_path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_a_merge_error() {
        let merger = FfmpegMerger::new("/nonexistent/ffmpeg-binary");
        let err = merger.merge(b"a", b"b").await.unwrap_err();
        assert!(matches!(err, AudioError::Merge(_)));
    }
}
