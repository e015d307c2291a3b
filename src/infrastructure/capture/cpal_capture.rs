//! Capture session backed by a cpal input stream
//!
//! The stream lives on a dedicated thread because cpal::Stream is not
//! Send. The audio subsystem's callback appends one block per delivery
//! under a briefly-held mutex; `stop` flips the run flag and joins the
//! thread, so the buffer is frozen only after the hardware stream has
//! fully closed.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::thread::JoinHandle;
use std::time::Instant;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::application::ports::{Capture, CaptureError, DeviceError};
use crate::domain::recording::{
    CaptureSpec, DeviceSelector, InvalidStateError, SampleBuffer, SessionPhase,
};

type BlockList = Arc<StdMutex<Vec<Vec<f32>>>>;

/// cpal-backed capture session
pub struct CpalCapture {
    /// Blocks appended by the audio callback, in delivery order
    blocks: BlockList,
    /// Whether a stream is currently open
    running: Arc<AtomicBool>,
    /// Elapsed capture time, updated by the stream thread
    elapsed_ms: Arc<AtomicU64>,
    /// Thread owning the live cpal::Stream
    worker: StdMutex<Option<JoinHandle<()>>>,
    /// Parameters the session was last armed with; determines the
    /// channel width of the empty buffer a bare `stop` returns
    active_spec: StdMutex<CaptureSpec>,
}

impl CpalCapture {
    pub fn new() -> Self {
        Self::with_defaults(CaptureSpec::default())
    }

    /// Create with explicit default stream parameters
    pub fn with_defaults(spec: CaptureSpec) -> Self {
        Self {
            blocks: Arc::new(StdMutex::new(Vec::new())),
            running: Arc::new(AtomicBool::new(false)),
            elapsed_ms: Arc::new(AtomicU64::new(0)),
            worker: StdMutex::new(None),
            active_spec: StdMutex::new(spec),
        }
    }

    fn resolve_device(selector: &DeviceSelector) -> Result<cpal::Device, DeviceError> {
        let host = cpal::default_host();
        match selector {
            DeviceSelector::Default => host
                .default_input_device()
                .ok_or(DeviceError::NoDevices),
            DeviceSelector::Index(idx) => host
                .devices()
                .map_err(|e| DeviceError::OpenFailed(e.to_string()))?
                .nth(*idx)
                .ok_or_else(|| DeviceError::NotFound(format!("#{}", idx))),
            DeviceSelector::Name(needle) => {
                let needle_lower = needle.to_lowercase();
                host.devices()
                    .map_err(|e| DeviceError::OpenFailed(e.to_string()))?
                    .find(|d| {
                        d.name()
                            .map(|n| n.to_lowercase().contains(&needle_lower))
                            .unwrap_or(false)
                    })
                    .ok_or_else(|| DeviceError::NotFound(needle.clone()))
            }
        }
    }

    /// Build and start an input stream delivering into `blocks`.
    fn open_stream(
        device: &cpal::Device,
        spec: &CaptureSpec,
        blocks: BlockList,
        running: Arc<AtomicBool>,
    ) -> Result<cpal::Stream, DeviceError> {
        let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());
        let sample_format = device
            .default_input_config()
            .map(|c| c.sample_format())
            .unwrap_or(SampleFormat::F32);

        let config = StreamConfig {
            channels: spec.channels,
            sample_rate: SampleRate(spec.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let err_fn = |err| warn!(error = %err, "Audio stream error");

        // The data callbacks only copy and append; the mutex is never
        // held across anything slower than a Vec push.
        let stream = match sample_format {
            SampleFormat::F32 => device
                .build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        if running.load(Ordering::SeqCst) {
                            if let Ok(mut blocks) = blocks.lock() {
                                blocks.push(data.to_vec());
                            }
                        }
                    },
                    err_fn,
                    None,
                ),
            SampleFormat::I16 => device
                .build_input_stream(
                    &config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        if running.load(Ordering::SeqCst) {
                            let block: Vec<f32> =
                                data.iter().map(|&s| s as f32 / 32768.0).collect();
                            if let Ok(mut blocks) = blocks.lock() {
                                blocks.push(block);
                            }
                        }
                    },
                    err_fn,
                    None,
                ),
            other => {
                return Err(DeviceError::OpenFailed(format!(
                    "unsupported sample format: {:?}",
                    other
                )))
            }
        }
        .map_err(|e| match e {
            cpal::BuildStreamError::StreamConfigNotSupported => DeviceError::UnsupportedConfig {
                device: device_name.clone(),
                sample_rate: spec.sample_rate,
                channels: spec.channels,
            },
            cpal::BuildStreamError::DeviceNotAvailable => DeviceError::NotFound(device_name.clone()),
            other => DeviceError::OpenFailed(other.to_string()),
        })?;

        stream
            .play()
            .map_err(|e| DeviceError::OpenFailed(e.to_string()))?;

        debug!(device = %device_name, sample_rate = spec.sample_rate, channels = spec.channels, "Input stream opened");
        Ok(stream)
    }
}

impl Default for CpalCapture {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Capture for CpalCapture {
    async fn start(&self, spec: CaptureSpec) -> Result<(), CaptureError> {
        // The first stream keeps the hardware
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(InvalidStateError {
                phase: SessionPhase::Recording,
                action: "start recording".to_string(),
            }
            .into());
        }

        // A new recording destroys the previous accumulation
        self.blocks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
        self.elapsed_ms.store(0, Ordering::SeqCst);
        *self.active_spec.lock().unwrap_or_else(|e| e.into_inner()) = spec.clone();

        let (opened_tx, opened_rx) = oneshot::channel::<Result<(), DeviceError>>();
        let blocks = Arc::clone(&self.blocks);
        let running = Arc::clone(&self.running);
        let elapsed_ms = Arc::clone(&self.elapsed_ms);

        let handle = std::thread::spawn(move || {
            let opened = Self::resolve_device(&spec.device).and_then(|device| {
                Self::open_stream(&device, &spec, blocks, Arc::clone(&running))
            });

            let stream = match opened {
                Ok(stream) => {
                    let _ = opened_tx.send(Ok(()));
                    stream
                }
                Err(e) => {
                    running.store(false, Ordering::SeqCst);
                    let _ = opened_tx.send(Err(e));
                    return;
                }
            };

            let started = Instant::now();
            while running.load(Ordering::SeqCst) {
                elapsed_ms.store(started.elapsed().as_millis() as u64, Ordering::SeqCst);
                std::thread::sleep(std::time::Duration::from_millis(50));
            }

            // Dropping the stream closes the hardware before the
            // thread exits; stop() joins on this.
            drop(stream);
        });

        match opened_rx.await {
            Ok(Ok(())) => {
                *self.worker.lock().unwrap_or_else(|e| e.into_inner()) = Some(handle);
                Ok(())
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e.into())
            }
            Err(_) => {
                self.running.store(false, Ordering::SeqCst);
                let _ = handle.join();
                Err(DeviceError::OpenFailed("capture thread exited unexpectedly".to_string()).into())
            }
        }
    }

    async fn stop(&self) -> SampleBuffer {
        self.running.store(false, Ordering::SeqCst);

        let handle = self
            .worker
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(handle) = handle {
            // Quiesce: the buffer is final only once the stream thread
            // has dropped the hardware stream.
            let _ = tokio::task::spawn_blocking(move || handle.join()).await;
        }

        let spec = self
            .active_spec
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        let blocks = std::mem::take(
            &mut *self.blocks.lock().unwrap_or_else(|e| e.into_inner()),
        );

        SampleBuffer::from_blocks(blocks, spec.channels, spec.sample_rate)
    }

    fn is_recording(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_default_state() {
        let capture = CpalCapture::new();
        assert!(!capture.is_recording());
        assert_eq!(capture.elapsed_ms(), 0);
    }

    #[tokio::test]
    async fn stop_without_start_returns_empty_buffer_of_configured_width() {
        let capture = CpalCapture::with_defaults(CaptureSpec {
            device: DeviceSelector::Default,
            sample_rate: 48000,
            channels: 2,
        });

        let buffer = capture.stop().await;
        assert!(buffer.is_empty());
        assert_eq!(buffer.channels(), 2);
        assert_eq!(buffer.sample_rate(), 48000);
    }

    #[tokio::test]
    async fn stop_is_idempotent() {
        let capture = CpalCapture::new();
        let first = capture.stop().await;
        let second = capture.stop().await;
        assert!(first.is_empty());
        assert!(second.is_empty());
        assert!(!capture.is_recording());
    }
}
