//! JSON config store adapter

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Preferences persisted as JSON under the platform config directory.
///
/// Load never fails on bad content: a missing file yields defaults, a
/// corrupted file yields defaults, and out-of-range values are replaced
/// per field.
pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    /// Create a store at the default platform path
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("tapedeck");

        Self {
            path: config_dir.join("config.json"),
        }
    }

    /// Create with custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for JsonConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for JsonConfigStore {
    async fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.exists() {
            debug!("Config file not found, using defaults");
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        let config = match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Failed to parse config, using defaults");
                AppConfig::default()
            }
        };

        Ok(config.validated())
    }

    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(config)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        fs::write(&self.path, content)
            .await
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        debug!(path = %self.path.display(), "Saved config");
        Ok(())
    }

    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    async fn init(&self) -> Result<(), ConfigError> {
        if self.exists() {
            return Err(ConfigError::AlreadyExists(
                self.path.to_string_lossy().to_string(),
            ));
        }

        self.save(&AppConfig::default()).await
    }

    async fn delete(&self) -> Result<(), ConfigError> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .await
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        // Remove the directory too if nothing else lives there;
        // a directory that never existed is already deleted.
        if let Some(parent) = self.path.parent() {
            if parent.exists() {
                let mut entries = fs::read_dir(parent)
                    .await
                    .map_err(|e| ConfigError::WriteError(e.to_string()))?;
                let is_empty = entries
                    .next_entry()
                    .await
                    .map_err(|e| ConfigError::WriteError(e.to_string()))?
                    .is_none();
                if is_empty {
                    fs::remove_dir(parent)
                        .await
                        .map_err(|e| ConfigError::WriteError(e.to_string()))?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_is_under_config_dir() {
        let store = JsonConfigStore::new();
        let path = store.path();
        assert!(path.to_string_lossy().contains("tapedeck"));
        assert!(path.to_string_lossy().contains("config.json"));
    }

    #[test]
    fn custom_path() {
        let store = JsonConfigStore::with_path("/custom/path/config.json");
        assert_eq!(store.path(), PathBuf::from("/custom/path/config.json"));
    }

    #[tokio::test]
    async fn load_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonConfigStore::with_path(dir.path().join("config.json"));

        let config = store.load().await.unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonConfigStore::with_path(dir.path().join("nested").join("config.json"));

        let config = AppConfig {
            default_device: Some("BlackHole 2ch".to_string()),
            bitrate: 320,
            ..Default::default()
        };
        store.save(&config).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn out_of_range_bitrate_loads_as_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"bitrate": 999}"#).unwrap();

        let store = JsonConfigStore::with_path(&path);
        let config = store.load().await.unwrap();
        assert_eq!(config.bitrate, 192);
    }

    #[tokio::test]
    async fn corrupted_json_loads_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = JsonConfigStore::with_path(&path);
        let config = store.load().await.unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[tokio::test]
    async fn init_fails_when_file_exists() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonConfigStore::with_path(dir.path().join("config.json"));

        store.init().await.unwrap();
        assert!(store.exists());
        assert!(matches!(
            store.init().await,
            Err(ConfigError::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn delete_removes_file_and_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join("tapedeck");
        let store = JsonConfigStore::with_path(config_dir.join("config.json"));

        store.init().await.unwrap();
        store.delete().await.unwrap();
        assert!(!store.exists());
        assert!(!config_dir.exists());
    }

    #[tokio::test]
    async fn delete_missing_storage_is_a_success() {
        let dir = tempfile::tempdir().unwrap();
        let store =
            JsonConfigStore::with_path(dir.path().join("never-created").join("config.json"));

        assert!(store.delete().await.is_ok());
        assert!(store.delete().await.is_ok());
    }
}
