//! Command runners

use std::process::ExitCode;

use tracing::debug;

use crate::application::ports::{DeviceCatalog, EncodeError};
use crate::application::routing::LOOPBACK_NAME_PATTERN;
use crate::application::{
    RecordInput, RecordToFileUseCase, SessionController, SessionError,
};
use crate::domain::config::AppConfig;
use crate::domain::recording::Duration;
use crate::infrastructure::{
    CpalCapture, CpalCatalog, FfmpegTranscoder, JsonConfigStore, NotifyRustNotifier,
};

use super::args::{RecordArgs, SessionArgs};
use super::presenter::Presenter;
use super::signals::ShutdownSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

const FFMPEG_INSTALL_HINT: &str =
    "Install it with 'brew install ffmpeg', or download a build from https://ffmpeg.org/download.html";

const BLACKHOLE_SETUP_HINT: &str = "System-audio recording needs the BlackHole virtual device: \
https://existential.audio/blackhole/ — route playback through a Multi-Output device that \
includes BlackHole, then record from the BlackHole input.";

/// List available audio devices
pub async fn run_devices() -> ExitCode {
    let presenter = Presenter::new();
    let catalog = CpalCatalog::new();
    let devices = catalog.list();

    if devices.is_empty() {
        presenter.error("No audio devices found.");
        return ExitCode::from(EXIT_ERROR);
    }

    presenter.output("Available Audio Devices:");
    for device in &devices {
        let default_marker = if device.is_default { " (default)" } else { "" };
        presenter.output(&format!("  [{}] {}{}", device.index, device.name, default_marker));
        presenter.output(&format!(
            "      Input channels: {}, Sample rate: {:.0} Hz",
            device.input_channels, device.default_sample_rate
        ));
    }
    presenter.output(&format!("Total: {} device(s)", devices.len()));

    ExitCode::from(EXIT_SUCCESS)
}

/// Bounded recording to an explicit output path
pub async fn run_record(args: RecordArgs) -> ExitCode {
    let mut presenter = Presenter::new();

    let duration = match args.duration.parse::<Duration>() {
        Ok(d) => d,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let store = JsonConfigStore::new();
    let mut config = load_config(&store).await;
    if let Some(rate) = args.sample_rate {
        config.sample_rate = rate;
    }
    if let Some(channels) = args.channels {
        config.channels = channels;
    }
    if let Some(bitrate) = args.bitrate {
        config.bitrate = bitrate;
    }

    let transcoder = FfmpegTranscoder::new();
    if !args.wav {
        // Transcoder absence is caught before the stream ever opens
        if let Err(e) = transcoder.probe().await {
            report_encode_error(&presenter, &e);
            return ExitCode::from(EXIT_ERROR);
        }
    }

    let mut use_case = RecordToFileUseCase::new(
        CpalCatalog::new(),
        CpalCapture::new(),
        transcoder,
        store,
        NotifyRustNotifier::new(),
        config,
    );

    let input = RecordInput {
        duration,
        output: args.output,
        device: args.device,
        wav: args.wav,
    };

    presenter.start_spinner(&format!("Recording for {}...", duration));

    match use_case.execute(input, None).await {
        Ok(output) => {
            presenter.spinner_success(&format!(
                "Recorded {} frames from '{}'",
                output.frames, output.device_name
            ));
            presenter.success(&format!("Saved to: {}", output.path.display()));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.spinner_fail("Recording failed");
            report_session_error(&presenter, &e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Interactive session: record until Ctrl-C, then encode on a worker
/// and drop a timestamped MP3 in the configured output folder.
pub async fn run_session(args: SessionArgs) -> ExitCode {
    let mut presenter = Presenter::new();

    let store = JsonConfigStore::new();
    let mut config = load_config(&store).await;
    if let Some(rate) = args.sample_rate {
        config.sample_rate = rate;
    }
    if let Some(channels) = args.channels {
        config.channels = channels;
    }
    if let Some(bitrate) = args.bitrate {
        config.bitrate = bitrate;
    }
    if let Some(folder) = args.output_folder {
        config.output_folder = folder;
    }

    let catalog = CpalCatalog::new();
    if let Some(ref needle) = args.device {
        match catalog.find_by_name(needle) {
            Some(device) => config.default_device = Some(device.name),
            None => {
                presenter.error(&format!(
                    "Device '{}' not found. Use 'tapedeck devices' to list inputs.",
                    needle
                ));
                return ExitCode::from(EXIT_USAGE_ERROR);
            }
        }
    }

    let transcoder = FfmpegTranscoder::new();
    match transcoder.probe().await {
        Ok(version) => debug!(version = %version, "Transcoder available"),
        Err(e) => {
            report_encode_error(&presenter, &e);
            return ExitCode::from(EXIT_ERROR);
        }
    }

    let shutdown = ShutdownSignal::new();
    if let Err(e) = shutdown.setup().await {
        presenter.error(&format!("Failed to setup signal handler: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }

    let mut controller = SessionController::new(
        catalog,
        CpalCapture::new(),
        transcoder,
        store,
        NotifyRustNotifier::new(),
        config,
    );

    let device = match controller.start().await {
        Ok(device) => device,
        Err(e) => {
            report_session_error(&presenter, &e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    presenter.info(&format!("Recording from: {}", device.name));
    presenter.info("Press Ctrl-C to stop and save");
    presenter.start_spinner("Recording... 0:00");

    while !shutdown.is_shutdown() {
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        presenter.update_spinner(&format!(
            "Recording... {}",
            Presenter::format_elapsed(controller.elapsed_ms())
        ));
    }

    presenter.update_spinner("Saving...");

    // Stop + encode runs on a worker task; this flow keeps ownership
    // of the terminal and is the only place presenter state changes.
    let worker = tokio::spawn(async move {
        let result = controller.stop_and_save().await;
        (controller, result)
    });

    match worker.await {
        Ok((_, Ok(Some(artifact)))) => {
            presenter.spinner_success(&format!(
                "Saved {} ({})",
                artifact.path.display(),
                artifact.duration_display()
            ));
            ExitCode::from(EXIT_SUCCESS)
        }
        Ok((_, Ok(None))) => {
            presenter.stop_spinner();
            ExitCode::from(EXIT_SUCCESS)
        }
        Ok((_, Err(e))) => {
            presenter.spinner_fail("Save failed");
            report_session_error(&presenter, &e);
            ExitCode::from(EXIT_ERROR)
        }
        Err(e) => {
            presenter.spinner_fail("Save failed");
            presenter.error(&format!("Worker task failed: {}", e));
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Report external dependency status
pub async fn run_doctor() -> ExitCode {
    let presenter = Presenter::new();

    let transcoder = FfmpegTranscoder::new();
    match transcoder.probe().await {
        Ok(version) => presenter.success(&format!("FFmpeg: {}", version)),
        Err(EncodeError::TranscoderNotFound) => {
            presenter.warn("FFmpeg: not found in PATH");
            presenter.info(FFMPEG_INSTALL_HINT);
        }
        Err(e) => presenter.warn(&format!("FFmpeg: {}", e)),
    }

    let catalog = CpalCatalog::new();
    match catalog.find_by_name(LOOPBACK_NAME_PATTERN) {
        Some(device) => presenter.success(&format!(
            "BlackHole: {} ({} input channels)",
            device.name, device.input_channels
        )),
        None => {
            presenter.warn("BlackHole: not found");
            presenter.info(BLACKHOLE_SETUP_HINT);
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// Load preferences, falling back to defaults on storage errors
pub async fn load_config(store: &JsonConfigStore) -> AppConfig {
    use crate::application::ports::ConfigStore;
    store.load().await.unwrap_or_else(|_| AppConfig::default())
}

fn report_session_error(presenter: &Presenter, error: &SessionError) {
    match error {
        SessionError::Encode(e) => report_encode_error(presenter, e),
        other => presenter.error(&other.to_string()),
    }
}

fn report_encode_error(presenter: &Presenter, error: &EncodeError) {
    presenter.error(&error.to_string());
    if matches!(error, EncodeError::TranscoderNotFound) {
        presenter.info(FFMPEG_INSTALL_HINT);
    }
}
