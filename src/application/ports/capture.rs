//! Capture port interface

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::recording::{CaptureSpec, Duration, InvalidStateError, SampleBuffer};

/// Device and stream-open failures
#[derive(Debug, Clone, Error)]
pub enum DeviceError {
    #[error("No audio input device available")]
    NoDevices,

    #[error("Audio device not found: {0}")]
    NotFound(String),

    #[error("'{0}' has no input channels. Multi-Output devices are output-only; use a loopback device such as BlackHole to capture system audio")]
    NoInputChannels(String),

    #[error("Unsupported stream parameters for '{device}': {sample_rate} Hz, {channels} channel(s)")]
    UnsupportedConfig {
        device: String,
        sample_rate: u32,
        channels: u16,
    },

    #[error("Failed to open audio stream: {0}")]
    OpenFailed(String),
}

/// Failures surfaced by a capture session
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    InvalidState(#[from] InvalidStateError),
}

/// Progress callback type for bounded recording.
/// Parameters: (elapsed_ms, total_ms)
pub type ProgressCallback = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// Port for a live capture session.
///
/// Holds at most one open hardware stream. Delivered blocks are
/// appended by the audio subsystem's callback thread; the consumer
/// reads only after `stop` has fully quiesced the stream.
#[async_trait]
pub trait Capture: Send + Sync {
    /// Open a stream with the given parameters and begin accumulating
    /// blocks. Any previously accumulated audio is discarded.
    ///
    /// Fails with `InvalidStateError` when a stream is already open
    /// (the first stream keeps the hardware) and with `DeviceError`
    /// when the stream cannot be opened, leaving the session idle.
    async fn start(&self, spec: CaptureSpec) -> Result<(), CaptureError>;

    /// Halt and release the stream, waiting for it to fully close,
    /// then return the accumulated blocks concatenated in delivery
    /// order. Without an active stream this is a no-op returning an
    /// empty buffer of the configured channel width.
    async fn stop(&self) -> SampleBuffer;

    /// Whether a stream is currently open
    fn is_recording(&self) -> bool;

    /// Elapsed capture time in milliseconds
    fn elapsed_ms(&self) -> u64;

    /// Bounded convenience variant: start, wait, stop.
    async fn record_for(
        &self,
        spec: CaptureSpec,
        duration: Duration,
    ) -> Result<SampleBuffer, CaptureError> {
        self.start(spec).await?;
        tokio::time::sleep(duration.as_std()).await;
        Ok(self.stop().await)
    }
}
