//! Transcoder port interface

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::recording::{EncodedArtifact, SampleBuffer};

/// Encoding failures.
///
/// Transcoder absence is its own variant so callers can route it to an
/// install-guidance path instead of a raw error report.
#[derive(Debug, Clone, Error)]
pub enum EncodeError {
    #[error("ffmpeg not found in PATH")]
    TranscoderNotFound,

    #[error("Failed to write intermediate WAV: {0}")]
    ScratchWrite(String),

    #[error("Transcoder failed: {0}")]
    TranscoderFailed(String),

    #[error("Failed to write output file: {0}")]
    OutputWrite(String),
}

/// Port for turning a frozen sample buffer into an audio file
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Encode the buffer to MP3 at `bitrate` kbps via an intermediate
    /// uncompressed container. The intermediate never outlives the
    /// call, success or failure.
    async fn encode_mp3(
        &self,
        buffer: &SampleBuffer,
        bitrate: u32,
        output: &Path,
    ) -> Result<EncodedArtifact, EncodeError>;

    /// Lossless path: write the buffer straight to a 16-bit PCM WAV,
    /// no external transcoder involved.
    async fn save_wav(&self, buffer: &SampleBuffer, output: &Path)
        -> Result<PathBuf, EncodeError>;
}
