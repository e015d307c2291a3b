//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with the host audio subsystem, ffmpeg, the filesystem,
//! and the desktop notification service.

pub mod capture;
pub mod catalog;
pub mod config;
pub mod encoding;
pub mod logging;
pub mod notification;

// Re-export adapters
pub use capture::CpalCapture;
pub use catalog::CpalCatalog;
pub use config::JsonConfigStore;
pub use encoding::FfmpegTranscoder;
pub use notification::NotifyRustNotifier;
