//! Device catalog port interface

use crate::domain::recording::AudioDevice;

/// Port for host audio device enumeration.
///
/// Pure queries over host state; every call produces fresh snapshots.
/// Zero-input devices are included so routing can detect and redirect
/// them.
pub trait DeviceCatalog: Send + Sync {
    /// List all host audio devices in enumeration order.
    fn list(&self) -> Vec<AudioDevice>;

    /// Find a device by case-insensitive substring match.
    /// First match in enumeration order wins.
    fn find_by_name(&self, needle: &str) -> Option<AudioDevice> {
        let needle = needle.to_lowercase();
        self.list()
            .into_iter()
            .find(|d| d.name.to_lowercase().contains(&needle))
    }

    /// The device the host flags as default input.
    /// Falls back to the first entry when none is flagged; `None` only
    /// for an empty list.
    fn default_device(&self) -> Option<AudioDevice> {
        let devices = self.list();
        devices
            .iter()
            .find(|d| d.is_default)
            .cloned()
            .or_else(|| devices.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedCatalog(Vec<AudioDevice>);

    impl DeviceCatalog for FixedCatalog {
        fn list(&self) -> Vec<AudioDevice> {
            self.0.clone()
        }
    }

    fn device(index: usize, name: &str, is_default: bool) -> AudioDevice {
        AudioDevice {
            index,
            name: name.to_string(),
            input_channels: 2,
            default_sample_rate: 44100.0,
            is_default,
        }
    }

    #[test]
    fn find_by_name_is_case_insensitive_substring() {
        let catalog = FixedCatalog(vec![
            device(0, "MacBook Pro Microphone", false),
            device(1, "BlackHole 2ch", false),
        ]);

        let found = catalog.find_by_name("blackhole").unwrap();
        assert_eq!(found.name, "BlackHole 2ch");
    }

    #[test]
    fn find_by_name_first_match_wins() {
        let catalog = FixedCatalog(vec![
            device(0, "BlackHole 2ch", false),
            device(1, "BlackHole 16ch", false),
        ]);

        let found = catalog.find_by_name("BlackHole").unwrap();
        assert_eq!(found.index, 0);
    }

    #[test]
    fn find_by_name_missing_returns_none() {
        let catalog = FixedCatalog(vec![device(0, "Microphone", false)]);
        assert!(catalog.find_by_name("BlackHole").is_none());
    }

    #[test]
    fn default_device_prefers_flagged() {
        let catalog = FixedCatalog(vec![
            device(0, "First", false),
            device(1, "Flagged", true),
        ]);
        assert_eq!(catalog.default_device().unwrap().name, "Flagged");
    }

    #[test]
    fn default_device_falls_back_to_first() {
        let catalog = FixedCatalog(vec![
            device(0, "First", false),
            device(1, "Second", false),
        ]);
        assert_eq!(catalog.default_device().unwrap().name, "First");
    }

    #[test]
    fn default_device_none_on_empty_list() {
        let catalog = FixedCatalog(vec![]);
        assert!(catalog.default_device().is_none());
    }
}
