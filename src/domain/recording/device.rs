//! Audio device snapshot and capture parameters

use std::fmt;

/// Snapshot of a host audio device from one catalog query.
///
/// Not a live handle: indices can shift between runs or hotplug events,
/// so a snapshot is rebuilt on every enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioDevice {
    pub index: usize,
    pub name: String,
    /// Maximum input channels; 0 for output-only devices (these are
    /// still listed so routing can detect and redirect them)
    pub input_channels: u16,
    pub default_sample_rate: f64,
    pub is_default: bool,
}

impl AudioDevice {
    /// Output-only devices (e.g. a Multi-Output aggregate) expose no
    /// input channels and cannot be captured from directly.
    pub fn is_output_only(&self) -> bool {
        self.input_channels == 0
    }
}

impl fmt::Display for AudioDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.index, self.name)
    }
}

/// How the capture session picks its device
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DeviceSelector {
    /// Host default input device
    #[default]
    Default,
    /// Enumeration index from a catalog snapshot
    Index(usize),
    /// Case-insensitive substring of the device name
    Name(String),
}

impl fmt::Display for DeviceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Index(i) => write!(f, "#{}", i),
            Self::Name(n) => write!(f, "{}", n),
        }
    }
}

/// Stream parameters a capture session is armed with
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureSpec {
    pub device: DeviceSelector,
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for CaptureSpec {
    fn default() -> Self {
        Self {
            device: DeviceSelector::Default,
            sample_rate: 44100,
            channels: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(name: &str, input_channels: u16) -> AudioDevice {
        AudioDevice {
            index: 0,
            name: name.to_string(),
            input_channels,
            default_sample_rate: 44100.0,
            is_default: false,
        }
    }

    #[test]
    fn multi_output_device_is_output_only() {
        assert!(device("Multi-Output Device", 0).is_output_only());
        assert!(!device("BlackHole 2ch", 2).is_output_only());
    }

    #[test]
    fn selector_display() {
        assert_eq!(DeviceSelector::Default.to_string(), "default");
        assert_eq!(DeviceSelector::Index(3).to_string(), "#3");
        assert_eq!(
            DeviceSelector::Name("BlackHole".to_string()).to_string(),
            "BlackHole"
        );
    }

    #[test]
    fn default_spec_is_stereo_44100() {
        let spec = CaptureSpec::default();
        assert_eq!(spec.sample_rate, 44100);
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.device, DeviceSelector::Default);
    }
}
