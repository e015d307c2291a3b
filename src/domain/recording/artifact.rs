//! Encoded output artifact

use std::path::PathBuf;

/// The final encoded file from one completed session.
/// Immutable after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedArtifact {
    pub path: PathBuf,
    /// Bitrate in kbps
    pub bitrate: u32,
    pub duration_secs: f64,
}

impl EncodedArtifact {
    /// Duration formatted as M:SS for user-facing messages
    pub fn duration_display(&self) -> String {
        let total = self.duration_secs.round() as u64;
        format!("{}:{:02}", total / 60, total % 60)
    }
}
