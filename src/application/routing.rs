//! Device selection and routing

use tracing::{debug, info, warn};

use crate::domain::config::AppConfig;
use crate::domain::recording::AudioDevice;

use super::ports::{ConfigStore, DeviceCatalog, DeviceError, Notification, Notifier};

/// Name fragment identifying a loopback-capable virtual device
pub const LOOPBACK_NAME_PATTERN: &str = "BlackHole";

/// Pick the device to record from: the saved preference by exact name
/// when it is still present, otherwise the host default.
pub fn select_device<C: DeviceCatalog>(
    catalog: &C,
    config: &AppConfig,
) -> Result<AudioDevice, DeviceError> {
    if let Some(ref name) = config.default_device {
        if let Some(device) = catalog.list().into_iter().find(|d| &d.name == name) {
            debug!(device = %device.name, "Restored device from preferences");
            return Ok(device);
        }
        debug!(device = %name, "Saved device not present, falling back to default");
    }
    catalog.default_device().ok_or(DeviceError::NoDevices)
}

/// Redirect an output-only selection to a loopback input.
///
/// A Multi-Output aggregate exposes zero input channels: the user
/// listening through it wants the loopback leg as the capture source.
/// Runs once at record-request time, never mid-session. When a
/// substitute is found the selection and the persisted preference are
/// updated and a single advisory is emitted; when none is found the
/// original selection is returned and the stream open is left to fail
/// with its ordinary device error.
pub async fn reroute_output_only<C, S, N>(
    catalog: &C,
    store: &S,
    notifier: &N,
    config: &mut AppConfig,
    selected: AudioDevice,
) -> AudioDevice
where
    C: DeviceCatalog,
    S: ConfigStore,
    N: Notifier,
{
    if !selected.is_output_only() {
        return selected;
    }

    let Some(loopback) = catalog.find_by_name(LOOPBACK_NAME_PATTERN) else {
        debug!(device = %selected.name, "No loopback device available for rerouting");
        return selected;
    };

    info!(from = %selected.name, to = %loopback.name, "Rerouting output-only device to loopback input");

    let advisory = Notification::new(
        "Audio Routing Auto-Switch",
        format!("Using {}", loopback.name),
        "Multi-Output sends audio. BlackHole receives it. Recording from BlackHole.",
    );
    if let Err(e) = notifier.notify(&advisory).await {
        warn!(error = %e, "Failed to deliver routing advisory");
    }

    config.default_device = Some(loopback.name.clone());
    if let Err(e) = store.save(config).await {
        warn!(error = %e, "Failed to persist rerouted device preference");
    }

    loopback
}
