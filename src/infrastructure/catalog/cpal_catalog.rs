//! Host device enumeration backed by cpal

use cpal::traits::{DeviceTrait, HostTrait};
use tracing::debug;

use crate::application::ports::DeviceCatalog;
use crate::domain::recording::AudioDevice;

/// Catalog over the default cpal host.
///
/// Every call re-enumerates; snapshots carry no identity across
/// hotplug events. Output-only devices are listed with zero input
/// channels rather than filtered out.
pub struct CpalCatalog;

impl CpalCatalog {
    pub fn new() -> Self {
        Self
    }

    fn max_input_channels(device: &cpal::Device) -> u16 {
        device
            .supported_input_configs()
            .map(|configs| configs.map(|c| c.channels()).max().unwrap_or(0))
            .unwrap_or(0)
    }

    fn default_sample_rate(device: &cpal::Device) -> f64 {
        device
            .default_input_config()
            .map(|c| c.sample_rate().0 as f64)
            .unwrap_or(44100.0)
    }
}

impl Default for CpalCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceCatalog for CpalCatalog {
    fn list(&self) -> Vec<AudioDevice> {
        let host = cpal::default_host();
        let default_name = host
            .default_input_device()
            .and_then(|d| d.name().ok());

        let devices = match host.devices() {
            Ok(devices) => devices,
            Err(e) => {
                debug!(error = %e, "Device enumeration failed");
                return Vec::new();
            }
        };

        devices
            .enumerate()
            .map(|(index, device)| {
                let name = device
                    .name()
                    .unwrap_or_else(|_| format!("Device {}", index));
                AudioDevice {
                    index,
                    input_channels: Self::max_input_channels(&device),
                    default_sample_rate: Self::default_sample_rate(&device),
                    is_default: default_name.as_deref() == Some(name.as_str()),
                    name,
                }
            })
            .collect()
    }
}
