//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// MP3 bitrates the encoder accepts, in kbps
pub const VALID_BITRATES: &[u32] = &[128, 192, 256, 320];

/// Sample rates the capture stream accepts, in Hz
pub const VALID_SAMPLE_RATES: &[u32] = &[44100, 48000, 96000];

/// Channel counts the capture stream accepts (mono, stereo)
pub const VALID_CHANNELS: &[u16] = &[1, 2];

pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
pub const DEFAULT_CHANNELS: u16 = 2;
pub const DEFAULT_BITRATE: u32 = 192;

/// Persisted user preferences.
///
/// Unknown keys in the stored JSON are ignored on load; out-of-range
/// values are replaced per field by `validated`, never propagated as
/// errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_output_folder")]
    pub output_folder: PathBuf,
    #[serde(default)]
    pub default_device: Option<String>,
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    #[serde(default = "default_channels")]
    pub channels: u16,
    #[serde(default = "default_bitrate")]
    pub bitrate: u32,
    #[serde(default)]
    pub debug: bool,
}

fn default_output_folder() -> PathBuf {
    dirs::desktop_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

fn default_channels() -> u16 {
    DEFAULT_CHANNELS
}

fn default_bitrate() -> u32 {
    DEFAULT_BITRATE
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_folder: default_output_folder(),
            default_device: None,
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: DEFAULT_CHANNELS,
            bitrate: DEFAULT_BITRATE,
            debug: false,
        }
    }
}

impl AppConfig {
    /// Substitute validated defaults for any out-of-range field.
    pub fn validated(mut self) -> Self {
        if !VALID_BITRATES.contains(&self.bitrate) {
            warn!(bitrate = self.bitrate, "Invalid bitrate, defaulting to {}", DEFAULT_BITRATE);
            self.bitrate = DEFAULT_BITRATE;
        }
        if !VALID_CHANNELS.contains(&self.channels) {
            warn!(channels = self.channels, "Invalid channels, defaulting to {}", DEFAULT_CHANNELS);
            self.channels = DEFAULT_CHANNELS;
        }
        if !VALID_SAMPLE_RATES.contains(&self.sample_rate) {
            warn!(
                sample_rate = self.sample_rate,
                "Invalid sample rate, defaulting to {}", DEFAULT_SAMPLE_RATE
            );
            self.sample_rate = DEFAULT_SAMPLE_RATE;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::default();
        assert!(config.default_device.is_none());
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.channels, 2);
        assert_eq!(config.bitrate, 192);
        assert!(!config.debug);
    }

    #[test]
    fn out_of_range_bitrate_is_replaced() {
        let config = AppConfig {
            bitrate: 999,
            ..Default::default()
        }
        .validated();
        assert_eq!(config.bitrate, 192);
    }

    #[test]
    fn out_of_range_channels_are_replaced() {
        let config = AppConfig {
            channels: 7,
            ..Default::default()
        }
        .validated();
        assert_eq!(config.channels, 2);
    }

    #[test]
    fn out_of_range_sample_rate_is_replaced() {
        let config = AppConfig {
            sample_rate: 12345,
            ..Default::default()
        }
        .validated();
        assert_eq!(config.sample_rate, 44100);
    }

    #[test]
    fn valid_values_survive_validation() {
        let config = AppConfig {
            sample_rate: 48000,
            channels: 1,
            bitrate: 320,
            ..Default::default()
        }
        .validated();
        assert_eq!(config.sample_rate, 48000);
        assert_eq!(config.channels, 1);
        assert_eq!(config.bitrate, 320);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"bitrate": 256}"#).unwrap();
        assert_eq!(config.bitrate, 256);
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.channels, 2);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config: AppConfig =
            serde_json::from_str(r#"{"bitrate": 128, "legacy_field": true}"#).unwrap();
        assert_eq!(config.bitrate, 128);
    }

    #[test]
    fn json_round_trip() {
        let config = AppConfig {
            default_device: Some("BlackHole 2ch".to_string()),
            bitrate: 320,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }
}
