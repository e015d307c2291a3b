//! Configuration port interface

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Port for preference storage
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load preferences. Missing files and malformed values yield
    /// validated defaults rather than errors.
    async fn load(&self) -> Result<AppConfig, ConfigError>;

    /// Persist preferences.
    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError>;

    /// Storage file path.
    fn path(&self) -> PathBuf;

    /// Whether a stored file exists.
    fn exists(&self) -> bool;

    /// Create the storage file with defaults.
    /// Fails if it already exists.
    async fn init(&self) -> Result<(), ConfigError>;

    /// Remove the stored file and its directory if empty.
    /// Removing storage that does not exist is a success.
    async fn delete(&self) -> Result<(), ConfigError>;
}
