//! Encoding adapters

pub mod ffmpeg;
pub mod wav;

pub use ffmpeg::FfmpegTranscoder;
