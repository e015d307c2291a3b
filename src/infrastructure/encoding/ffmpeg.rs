//! ffmpeg transcoder adapter

use std::env;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::OnceLock;
use std::time::{Duration as StdDuration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::application::ports::{EncodeError, Transcoder};
use crate::domain::recording::{EncodedArtifact, SampleBuffer};

use super::wav;

/// Bound on the availability probe; the encode itself runs to completion
const PROBE_TIMEOUT: StdDuration = StdDuration::from_secs(3);

/// Scratch WAV bridging raw samples into ffmpeg.
/// The file is removed when the guard drops, on every exit path.
struct ScratchWav {
    path: PathBuf,
}

impl ScratchWav {
    fn new() -> Self {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        Self {
            path: env::temp_dir().join(format!("tapedeck-{}-{}.wav", std::process::id(), stamp)),
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchWav {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// MP3 transcoding through an ffmpeg subprocess.
///
/// The binary location is resolved once per instance and cached;
/// construct a fresh transcoder to force re-resolution.
pub struct FfmpegTranscoder {
    binary: OnceLock<Option<PathBuf>>,
}

impl FfmpegTranscoder {
    pub fn new() -> Self {
        Self {
            binary: OnceLock::new(),
        }
    }

    /// Use an explicit binary path instead of searching PATH
    pub fn with_binary(path: impl Into<PathBuf>) -> Self {
        let binary = OnceLock::new();
        let _ = binary.set(Some(path.into()));
        Self { binary }
    }

    fn locate(&self) -> Result<&Path, EncodeError> {
        self.binary
            .get_or_init(|| find_in_path("ffmpeg"))
            .as_deref()
            .ok_or(EncodeError::TranscoderNotFound)
    }

    /// Check that the transcoder is callable and report its version
    /// line. Bounded wait so a wedged binary cannot hang startup.
    pub async fn probe(&self) -> Result<String, EncodeError> {
        let binary = self.locate()?;

        let output = tokio::time::timeout(
            PROBE_TIMEOUT,
            Command::new(binary)
                .arg("-version")
                .stdin(Stdio::null())
                .output(),
        )
        .await
        .map_err(|_| EncodeError::TranscoderFailed("version probe timed out".to_string()))?
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                EncodeError::TranscoderNotFound
            } else {
                EncodeError::TranscoderFailed(e.to_string())
            }
        })?;

        if !output.status.success() {
            return Err(EncodeError::TranscoderFailed(
                "version probe exited with an error".to_string(),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string())
    }

    fn ensure_parent_dir(path: &Path) -> Result<(), EncodeError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| EncodeError::OutputWrite(e.to_string()))?;
            }
        }
        Ok(())
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn encode_mp3(
        &self,
        buffer: &SampleBuffer,
        bitrate: u32,
        output: &Path,
    ) -> Result<EncodedArtifact, EncodeError> {
        let binary = self.locate()?.to_path_buf();
        Self::ensure_parent_dir(output)?;

        let scratch = ScratchWav::new();

        let scratch_path = scratch.path().to_path_buf();
        let to_write = buffer.clone();
        tokio::task::spawn_blocking(move || wav::write(&to_write, &scratch_path))
            .await
            .map_err(|e| EncodeError::ScratchWrite(e.to_string()))?
            .map_err(|e| EncodeError::ScratchWrite(e.to_string()))?;

        // No deadline here: the encode is allowed to run to completion
        let result = Command::new(&binary)
            .args(["-y", "-loglevel", "error", "-i"])
            .arg(scratch.path())
            .args(["-codec:a", "libmp3lame", "-b:a"])
            .arg(format!("{}k", bitrate))
            .arg(output)
            .stdin(Stdio::null())
            .output()
            .await;

        // The scratch guard drops below whichever way this goes
        let run = result.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                EncodeError::TranscoderNotFound
            } else {
                EncodeError::TranscoderFailed(e.to_string())
            }
        })?;

        if !run.status.success() {
            let stderr = String::from_utf8_lossy(&run.stderr);
            let cause = stderr.lines().last().unwrap_or("unknown error").to_string();
            return Err(EncodeError::TranscoderFailed(cause));
        }

        debug!(path = %output.display(), bitrate, "Encoded MP3");
        Ok(EncodedArtifact {
            path: output.to_path_buf(),
            bitrate,
            duration_secs: buffer.duration_secs(),
        })
    }

    async fn save_wav(
        &self,
        buffer: &SampleBuffer,
        output: &Path,
    ) -> Result<PathBuf, EncodeError> {
        Self::ensure_parent_dir(output)?;

        let path = output.to_path_buf();
        let to_write = buffer.clone();
        tokio::task::spawn_blocking(move || wav::write(&to_write, &path))
            .await
            .map_err(|e| EncodeError::OutputWrite(e.to_string()))?
            .map_err(|e| EncodeError::OutputWrite(e.to_string()))?;

        debug!(path = %output.display(), "Saved WAV");
        Ok(output.to_path_buf())
    }
}

/// Search PATH for an executable, the way the shell would
fn find_in_path(name: &str) -> Option<PathBuf> {
    let path_var = env::var_os("PATH")?;
    env::split_paths(&path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}
