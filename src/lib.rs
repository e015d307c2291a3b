//! Tapedeck - terminal MP3 audio recorder
//!
//! Records audio from a selected input device and encodes it to MP3
//! through ffmpeg, with automatic rerouting from output-only
//! Multi-Output devices to a loopback input.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects, entities, and errors (devices, sample
//!   buffers, the session state machine, preferences)
//! - **Application**: Use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, ffmpeg, JSON
//!   config, desktop notifications)
//! - **CLI**: Command-line interface, argument parsing, and signal
//!   handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
