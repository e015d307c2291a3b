//! Bounded record-to-file use case

use std::path::PathBuf;
use std::time::Instant;

use tracing::info;

use crate::domain::config::AppConfig;
use crate::domain::recording::{CaptureSpec, DeviceSelector, Duration};

use super::ports::{
    Capture, ConfigStore, DeviceCatalog, DeviceError, Notifier, ProgressCallback, Transcoder,
};
use super::routing;
use super::session::SessionError;

/// Input parameters for a bounded recording
#[derive(Debug, Clone)]
pub struct RecordInput {
    pub duration: Duration,
    pub output: PathBuf,
    /// Device name fragment; `None` uses the saved preference or the
    /// host default
    pub device: Option<String>,
    /// Skip the transcoder and write a lossless WAV instead
    pub wav: bool,
}

/// Output of a completed bounded recording
#[derive(Debug, Clone)]
pub struct RecordOutput {
    pub path: PathBuf,
    pub device_name: String,
    pub frames: usize,
}

/// Fixed-duration recording for non-interactive use: resolve device,
/// capture for the requested time, encode, return the artifact path.
pub struct RecordToFileUseCase<Cat, Cap, Tr, St, No>
where
    Cat: DeviceCatalog,
    Cap: Capture,
    Tr: Transcoder,
    St: ConfigStore,
    No: Notifier,
{
    catalog: Cat,
    capture: Cap,
    transcoder: Tr,
    store: St,
    notifier: No,
    config: AppConfig,
}

impl<Cat, Cap, Tr, St, No> RecordToFileUseCase<Cat, Cap, Tr, St, No>
where
    Cat: DeviceCatalog,
    Cap: Capture,
    Tr: Transcoder,
    St: ConfigStore,
    No: Notifier,
{
    pub fn new(
        catalog: Cat,
        capture: Cap,
        transcoder: Tr,
        store: St,
        notifier: No,
        config: AppConfig,
    ) -> Self {
        Self {
            catalog,
            capture,
            transcoder,
            store,
            notifier,
            config,
        }
    }

    /// Execute the bounded recording workflow.
    pub async fn execute(
        &mut self,
        input: RecordInput,
        on_progress: Option<ProgressCallback>,
    ) -> Result<RecordOutput, SessionError> {
        let selected = match input.device {
            Some(ref needle) => self
                .catalog
                .find_by_name(needle)
                .ok_or_else(|| DeviceError::NotFound(needle.clone()))?,
            None => routing::select_device(&self.catalog, &self.config)?,
        };

        let device = routing::reroute_output_only(
            &self.catalog,
            &self.store,
            &self.notifier,
            &mut self.config,
            selected,
        )
        .await;

        let channels = if device.input_channels > 0 {
            self.config.channels.min(device.input_channels)
        } else {
            self.config.channels
        };
        let spec = CaptureSpec {
            device: DeviceSelector::Index(device.index),
            sample_rate: self.config.sample_rate,
            channels,
        };

        info!(device = %device.name, duration = %input.duration, "Bounded recording started");

        if let Some(progress) = on_progress {
            let total_ms = input.duration.as_millis();
            let start = Instant::now();
            tokio::spawn(async move {
                let mut ticker =
                    tokio::time::interval(std::time::Duration::from_millis(100));
                loop {
                    ticker.tick().await;
                    let elapsed = start.elapsed().as_millis() as u64;
                    if elapsed >= total_ms {
                        progress(total_ms, total_ms);
                        break;
                    }
                    progress(elapsed, total_ms);
                }
            });
        }

        let buffer = self.capture.record_for(spec, input.duration).await?;

        let path = if input.wav {
            self.transcoder.save_wav(&buffer, &input.output).await?
        } else {
            self.transcoder
                .encode_mp3(&buffer, self.config.bitrate, &input.output)
                .await?
                .path
        };

        Ok(RecordOutput {
            path,
            device_name: device.name,
            frames: buffer.frames(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        CaptureError, EncodeError, Notification, NotificationError,
    };
    use crate::domain::error::ConfigError;
    use crate::domain::recording::{AudioDevice, EncodedArtifact, SampleBuffer};
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    struct FixedCatalog(Vec<AudioDevice>);

    impl DeviceCatalog for FixedCatalog {
        fn list(&self) -> Vec<AudioDevice> {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct InstantCapture {
        recording: AtomicBool,
    }

    #[async_trait]
    impl Capture for InstantCapture {
        async fn start(&self, _spec: CaptureSpec) -> Result<(), CaptureError> {
            self.recording.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn stop(&self) -> SampleBuffer {
            self.recording.store(false, Ordering::SeqCst);
            SampleBuffer::from_blocks(vec![vec![0.0; 100], vec![0.0; 50]], 1, 44100)
        }

        fn is_recording(&self) -> bool {
            self.recording.load(Ordering::SeqCst)
        }

        fn elapsed_ms(&self) -> u64 {
            0
        }
    }

    #[derive(Default)]
    struct RecordingTranscoder {
        wav_calls: Mutex<Vec<PathBuf>>,
        mp3_calls: Mutex<Vec<PathBuf>>,
    }

    #[async_trait]
    impl Transcoder for RecordingTranscoder {
        async fn encode_mp3(
            &self,
            buffer: &SampleBuffer,
            bitrate: u32,
            output: &Path,
        ) -> Result<EncodedArtifact, EncodeError> {
            self.mp3_calls.lock().unwrap().push(output.to_path_buf());
            Ok(EncodedArtifact {
                path: output.to_path_buf(),
                bitrate,
                duration_secs: buffer.duration_secs(),
            })
        }

        async fn save_wav(
            &self,
            _buffer: &SampleBuffer,
            output: &Path,
        ) -> Result<PathBuf, EncodeError> {
            self.wav_calls.lock().unwrap().push(output.to_path_buf());
            Ok(output.to_path_buf())
        }
    }

    #[derive(Default)]
    struct NullStore;

    #[async_trait]
    impl ConfigStore for NullStore {
        async fn load(&self) -> Result<AppConfig, ConfigError> {
            Ok(AppConfig::default())
        }
        async fn save(&self, _config: &AppConfig) -> Result<(), ConfigError> {
            Ok(())
        }
        fn path(&self) -> PathBuf {
            PathBuf::from("/dev/null")
        }
        fn exists(&self) -> bool {
            false
        }
        async fn init(&self) -> Result<(), ConfigError> {
            Ok(())
        }
        async fn delete(&self) -> Result<(), ConfigError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct NullNotifier;

    #[async_trait]
    impl Notifier for NullNotifier {
        async fn notify(&self, _notification: &Notification) -> Result<(), NotificationError> {
            Ok(())
        }
    }

    fn device(index: usize, name: &str, input_channels: u16, is_default: bool) -> AudioDevice {
        AudioDevice {
            index,
            name: name.to_string(),
            input_channels,
            default_sample_rate: 44100.0,
            is_default,
        }
    }

    fn use_case(
        catalog: FixedCatalog,
    ) -> RecordToFileUseCase<FixedCatalog, InstantCapture, RecordingTranscoder, NullStore, NullNotifier>
    {
        RecordToFileUseCase::new(
            catalog,
            InstantCapture::default(),
            RecordingTranscoder::default(),
            NullStore,
            NullNotifier,
            AppConfig::default(),
        )
    }

    #[tokio::test]
    async fn unknown_device_name_fails() {
        let mut uc = use_case(FixedCatalog(vec![device(0, "Mic", 2, true)]));

        let err = uc
            .execute(
                RecordInput {
                    duration: Duration::from_millis(10),
                    output: PathBuf::from("/tmp/out.mp3"),
                    device: Some("Ghost".to_string()),
                    wav: false,
                },
                None,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::Device(DeviceError::NotFound(_))));
    }

    #[tokio::test]
    async fn records_and_encodes_mp3() {
        let mut uc = use_case(FixedCatalog(vec![device(0, "Mic", 2, true)]));

        let output = uc
            .execute(
                RecordInput {
                    duration: Duration::from_millis(10),
                    output: PathBuf::from("/tmp/out.mp3"),
                    device: None,
                    wav: false,
                },
                None,
            )
            .await
            .unwrap();

        assert_eq!(output.path, PathBuf::from("/tmp/out.mp3"));
        assert_eq!(output.device_name, "Mic");
        assert_eq!(output.frames, 150);
        assert_eq!(uc.transcoder.mp3_calls.lock().unwrap().len(), 1);
        assert!(uc.transcoder.wav_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn wav_flag_takes_lossless_path() {
        let mut uc = use_case(FixedCatalog(vec![device(0, "Mic", 2, true)]));

        uc.execute(
            RecordInput {
                duration: Duration::from_millis(10),
                output: PathBuf::from("/tmp/out.wav"),
                device: Some("Mic".to_string()),
                wav: true,
            },
            None,
        )
        .await
        .unwrap();

        assert!(uc.transcoder.mp3_calls.lock().unwrap().is_empty());
        assert_eq!(uc.transcoder.wav_calls.lock().unwrap().len(), 1);
    }
}
