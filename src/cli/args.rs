//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::config::app_config::{VALID_BITRATES, VALID_CHANNELS, VALID_SAMPLE_RATES};

/// Tapedeck - terminal MP3 audio recorder
#[derive(Parser, Debug)]
#[command(name = "tapedeck")]
#[command(version)]
#[command(about = "Terminal MP3 audio recorder")]
#[command(long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available audio devices
    Devices,
    /// Record for a fixed duration
    Record(RecordArgs),
    /// Interactive recording session (Ctrl-C to stop and save)
    Session(SessionArgs),
    /// Check external dependencies (ffmpeg, loopback device)
    Doctor,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments for the bounded record command
#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Recording duration (e.g., 30s, 1m, 2m30s)
    #[arg(short = 'd', long, value_name = "TIME")]
    pub duration: String,

    /// Output file path
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: PathBuf,

    /// Audio input device name (partial match)
    #[arg(long, value_name = "NAME")]
    pub device: Option<String>,

    /// Sample rate in Hz (44100, 48000, 96000)
    #[arg(long, value_name = "HZ", value_parser = parse_sample_rate)]
    pub sample_rate: Option<u32>,

    /// Number of channels: 1=mono, 2=stereo
    #[arg(long, value_parser = parse_channels)]
    pub channels: Option<u16>,

    /// MP3 bitrate in kbps (128, 192, 256, 320)
    #[arg(long, value_parser = parse_bitrate)]
    pub bitrate: Option<u32>,

    /// Write a lossless WAV instead of invoking the transcoder
    #[arg(long)]
    pub wav: bool,
}

/// Arguments for the interactive session command
#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Audio input device name (partial match)
    #[arg(long, value_name = "NAME")]
    pub device: Option<String>,

    /// Sample rate in Hz (44100, 48000, 96000)
    #[arg(long, value_name = "HZ", value_parser = parse_sample_rate)]
    pub sample_rate: Option<u32>,

    /// Number of channels: 1=mono, 2=stereo
    #[arg(long, value_parser = parse_channels)]
    pub channels: Option<u16>,

    /// MP3 bitrate in kbps (128, 192, 256, 320)
    #[arg(long, value_parser = parse_bitrate)]
    pub bitrate: Option<u32>,

    /// Folder for the timestamped recording
    #[arg(long, value_name = "DIR")]
    pub output_folder: Option<PathBuf>,
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
    /// Reset config to defaults
    Reset,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "output_folder",
    "default_device",
    "sample_rate",
    "channels",
    "bitrate",
    "debug",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

fn parse_choice<T>(value: &str, valid: &[T], what: &str) -> Result<T, String>
where
    T: std::str::FromStr + PartialEq + Copy + std::fmt::Display,
{
    let parsed: T = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if valid.contains(&parsed) {
        Ok(parsed)
    } else {
        let options: Vec<String> = valid.iter().map(|v| v.to_string()).collect();
        Err(format!(
            "invalid {} '{}'. Valid options: {}",
            what,
            value,
            options.join(", ")
        ))
    }
}

pub fn parse_bitrate(value: &str) -> Result<u32, String> {
    parse_choice(value, VALID_BITRATES, "bitrate")
}

pub fn parse_sample_rate(value: &str) -> Result<u32, String> {
    parse_choice(value, VALID_SAMPLE_RATES, "sample rate")
}

pub fn parse_channels(value: &str) -> Result<u16, String> {
    parse_choice(value, VALID_CHANNELS, "channel count")
}
