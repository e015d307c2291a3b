//! Interactive recording session controller

use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::config::AppConfig;
use crate::domain::recording::{
    AudioDevice, CaptureSpec, DeviceSelector, EncodedArtifact, InvalidStateError,
    RecordingSession, SessionPhase,
};

use super::ports::{
    Capture, CaptureError, ConfigStore, DeviceCatalog, DeviceError, EncodeError, Notification,
    Notifier, Transcoder,
};
use super::routing;

/// How many saved recordings the controller remembers
const RECENT_LIMIT: usize = 5;

/// Errors from the session controller
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    State(#[from] InvalidStateError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl From<CaptureError> for SessionError {
    fn from(err: CaptureError) -> Self {
        match err {
            CaptureError::Device(e) => Self::Device(e),
            CaptureError::InvalidState(e) => Self::State(e),
        }
    }
}

/// Orchestrates one recording lifecycle: resolve device, open the
/// stream, stop on request, encode, notify.
///
/// The sole layer responsible for user-visible failure reporting; every
/// failure path routes through the same reset-to-idle cleanup so no
/// dangling stream or stale phase survives.
pub struct SessionController<Cat, Cap, Tr, St, No>
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
    session: RecordingSession,
    active_device: Option<AudioDevice>,
    recent: Vec<PathBuf>,
}

impl<Cat, Cap, Tr, St, No> SessionController<Cat, Cap, Tr, St, No>
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
            session: RecordingSession::new(),
            active_device: None,
            recent: Vec::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn active_device(&self) -> Option<&AudioDevice> {
        self.active_device.as_ref()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.capture.elapsed_ms()
    }

    /// Paths of the last few saved recordings, oldest first
    pub fn recent_recordings(&self) -> &[PathBuf] {
        &self.recent
    }

    /// Resolve the device and open the capture stream.
    ///
    /// Rejects a re-entrant start while a stream is outstanding; any
    /// open failure resets the session to idle and notifies before
    /// surfacing the error.
    pub async fn start(&mut self) -> Result<AudioDevice, SessionError> {
        self.session.begin()?;

        match self.open_stream().await {
            Ok(device) => {
                info!(device = %device.name, "Recording started");
                self.active_device = Some(device.clone());
                Ok(device)
            }
            Err(e) => {
                self.session.reset();
                self.report_failure(&e).await;
                Err(e)
            }
        }
    }

    async fn open_stream(&mut self) -> Result<AudioDevice, SessionError> {
        let selected = routing::select_device(&self.catalog, &self.config)?;
        let device = routing::reroute_output_only(
            &self.catalog,
            &self.store,
            &self.notifier,
            &mut self.config,
            selected,
        )
        .await;

        // Never ask the stream for more channels than the device has
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

        self.capture.start(spec).await?;
        Ok(device)
    }

    /// Stop the stream, encode the captured buffer to a timestamped
    /// MP3 in the configured output folder, and notify.
    ///
    /// Returns `Ok(None)` when nothing was recording (benign no-op).
    pub async fn stop_and_save(&mut self) -> Result<Option<EncodedArtifact>, SessionError> {
        if self.session.is_idle() {
            return Ok(None);
        }
        self.session.begin_stop()?;

        match self.finish_recording().await {
            Ok(artifact) => {
                self.session.finish()?;
                self.remember(&artifact.path);

                let filename = artifact
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                info!(path = %artifact.path.display(), "Recording saved");
                self.notify(Notification::new(
                    "Recording Complete",
                    format!("Duration: {}", artifact.duration_display()),
                    filename,
                ))
                .await;

                Ok(Some(artifact))
            }
            Err(e) => {
                self.session.reset();
                self.report_failure(&e).await;
                Err(e)
            }
        }
    }

    async fn finish_recording(&mut self) -> Result<EncodedArtifact, SessionError> {
        let buffer = self.capture.stop().await;

        let filename = format!(
            "recording_{}.mp3",
            Local::now().format("%Y-%m-%d_%H-%M-%S")
        );
        let output = self.config.output_folder.join(filename);

        let artifact = self
            .transcoder
            .encode_mp3(&buffer, self.config.bitrate, &output)
            .await?;
        Ok(artifact)
    }

    fn remember(&mut self, path: &Path) {
        self.recent.push(path.to_path_buf());
        if self.recent.len() > RECENT_LIMIT {
            let overflow = self.recent.len() - RECENT_LIMIT;
            self.recent.drain(..overflow);
        }
    }

    async fn report_failure(&self, error: &SessionError) {
        self.notify(Notification::new(
            "Recording Error",
            "An error occurred",
            error.to_string(),
        ))
        .await;
    }

    async fn notify(&self, notification: Notification) {
        if let Err(e) = self.notifier.notify(&notification).await {
            warn!(error = %e, "Notification delivery failed");
        }
    }
}
