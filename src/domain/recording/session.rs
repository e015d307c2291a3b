//! Recording session state machine

use std::fmt;
use thiserror::Error;

/// Recording session phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Recording,
    Stopping,
}

impl SessionPhase {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Stopping => "stopping",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid phase transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while in {phase} state")]
pub struct InvalidStateError {
    pub phase: SessionPhase,
    pub action: String,
}

/// Recording session entity.
/// Tracks the lifecycle of one open-to-closed capture.
///
/// State machine:
///   IDLE -> RECORDING (begin)
///   RECORDING -> STOPPING (begin_stop)
///   STOPPING -> IDLE (finish)
///   any -> IDLE (reset, failure cleanup)
#[derive(Debug, Default)]
pub struct RecordingSession {
    phase: SessionPhase,
}

impl RecordingSession {
    /// Create a new session in the idle phase
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
        }
    }

    /// Get the current phase
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Check if currently idle
    pub fn is_idle(&self) -> bool {
        self.phase == SessionPhase::Idle
    }

    /// Check if currently recording
    pub fn is_recording(&self) -> bool {
        self.phase == SessionPhase::Recording
    }

    /// Check if currently stopping
    pub fn is_stopping(&self) -> bool {
        self.phase == SessionPhase::Stopping
    }

    /// Transition from IDLE to RECORDING
    pub fn begin(&mut self) -> Result<(), InvalidStateError> {
        if self.phase != SessionPhase::Idle {
            return Err(InvalidStateError {
                phase: self.phase,
                action: "start recording".to_string(),
            });
        }
        self.phase = SessionPhase::Recording;
        Ok(())
    }

    /// Transition from RECORDING to STOPPING
    pub fn begin_stop(&mut self) -> Result<(), InvalidStateError> {
        if self.phase != SessionPhase::Recording {
            return Err(InvalidStateError {
                phase: self.phase,
                action: "stop recording".to_string(),
            });
        }
        self.phase = SessionPhase::Stopping;
        Ok(())
    }

    /// Transition from STOPPING to IDLE
    pub fn finish(&mut self) -> Result<(), InvalidStateError> {
        if self.phase != SessionPhase::Stopping {
            return Err(InvalidStateError {
                phase: self.phase,
                action: "finish session".to_string(),
            });
        }
        self.phase = SessionPhase::Idle;
        Ok(())
    }

    /// Force the session back to IDLE from any phase.
    /// Every failure path routes through this so no stale phase survives.
    pub fn reset(&mut self) {
        self.phase = SessionPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_idle() {
        let session = RecordingSession::new();
        assert!(session.is_idle());
        assert!(!session.is_recording());
        assert!(!session.is_stopping());
    }

    #[test]
    fn begin_from_idle() {
        let mut session = RecordingSession::new();
        assert!(session.begin().is_ok());
        assert!(session.is_recording());
    }

    #[test]
    fn begin_while_recording_fails() {
        let mut session = RecordingSession::new();
        session.begin().unwrap();

        let err = session.begin().unwrap_err();
        assert_eq!(err.phase, SessionPhase::Recording);
        assert!(err.action.contains("start recording"));
    }

    #[test]
    fn begin_while_stopping_fails() {
        let mut session = RecordingSession::new();
        session.begin().unwrap();
        session.begin_stop().unwrap();

        let err = session.begin().unwrap_err();
        assert_eq!(err.phase, SessionPhase::Stopping);
    }

    #[test]
    fn begin_stop_from_recording() {
        let mut session = RecordingSession::new();
        session.begin().unwrap();

        assert!(session.begin_stop().is_ok());
        assert!(session.is_stopping());
    }

    #[test]
    fn begin_stop_from_idle_fails() {
        let mut session = RecordingSession::new();

        let err = session.begin_stop().unwrap_err();
        assert_eq!(err.phase, SessionPhase::Idle);
    }

    #[test]
    fn finish_from_stopping() {
        let mut session = RecordingSession::new();
        session.begin().unwrap();
        session.begin_stop().unwrap();

        assert!(session.finish().is_ok());
        assert!(session.is_idle());
    }

    #[test]
    fn finish_from_recording_fails() {
        let mut session = RecordingSession::new();
        session.begin().unwrap();

        let err = session.finish().unwrap_err();
        assert_eq!(err.phase, SessionPhase::Recording);
    }

    #[test]
    fn reset_from_any_phase() {
        let mut session = RecordingSession::new();
        session.begin().unwrap();
        session.reset();
        assert!(session.is_idle());

        session.begin().unwrap();
        session.begin_stop().unwrap();
        session.reset();
        assert!(session.is_idle());
    }

    #[test]
    fn full_cycle() {
        let mut session = RecordingSession::new();
        assert!(session.is_idle());

        session.begin().unwrap();
        assert!(session.is_recording());

        session.begin_stop().unwrap();
        assert!(session.is_stopping());

        session.finish().unwrap();
        assert!(session.is_idle());

        // Can start another cycle
        session.begin().unwrap();
        assert!(session.is_recording());
    }

    #[test]
    fn phase_display() {
        assert_eq!(SessionPhase::Idle.to_string(), "idle");
        assert_eq!(SessionPhase::Recording.to_string(), "recording");
        assert_eq!(SessionPhase::Stopping.to_string(), "stopping");
    }

    #[test]
    fn error_display() {
        let err = InvalidStateError {
            phase: SessionPhase::Recording,
            action: "start recording".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("start recording"));
        assert!(msg.contains("recording"));
    }
}
