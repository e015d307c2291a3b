//! Recording domain: devices, buffers, durations, session lifecycle

pub mod artifact;
pub mod buffer;
pub mod device;
pub mod duration;
pub mod session;

pub use artifact::EncodedArtifact;
pub use buffer::SampleBuffer;
pub use device::{AudioDevice, CaptureSpec, DeviceSelector};
pub use duration::Duration;
pub use session::{InvalidStateError, RecordingSession, SessionPhase};
