//! Config command handler

use std::path::PathBuf;

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

use super::args::{
    is_valid_config_key, parse_bitrate, parse_channels, parse_sample_rate, ConfigAction,
    VALID_CONFIG_KEYS,
};
use super::presenter::Presenter;

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
        ConfigAction::Reset => handle_reset(store, presenter).await,
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    let mut config = store.load().await?;

    match key {
        "output_folder" => config.output_folder = PathBuf::from(value),
        "default_device" => config.default_device = Some(value.to_string()),
        "sample_rate" => {
            config.sample_rate =
                parse_sample_rate(value).map_err(|message| ConfigError::ValidationError {
                    key: key.to_string(),
                    message,
                })?
        }
        "channels" => {
            config.channels =
                parse_channels(value).map_err(|message| ConfigError::ValidationError {
                    key: key.to_string(),
                    message,
                })?
        }
        "bitrate" => {
            config.bitrate =
                parse_bitrate(value).map_err(|message| ConfigError::ValidationError {
                    key: key.to_string(),
                    message,
                })?
        }
        "debug" => {
            config.debug = parse_bool(value).map_err(|_| ConfigError::ValidationError {
                key: key.to_string(),
                message: "Value must be 'true' or 'false'".to_string(),
            })?
        }
        _ => unreachable!(), // Already validated
    }

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    let config = store.load().await?;

    let value = match key {
        "output_folder" => Some(config.output_folder.to_string_lossy().into_owned()),
        "default_device" => config.default_device,
        "sample_rate" => Some(config.sample_rate.to_string()),
        "channels" => Some(config.channels.to_string()),
        "bitrate" => Some(config.bitrate.to_string()),
        "debug" => Some(config.debug.to_string()),
        _ => unreachable!(),
    };

    match value {
        Some(v) => presenter.output(&v),
        None => presenter.output("(not set)"),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    presenter.key_value("output_folder", &config.output_folder.to_string_lossy());
    presenter.key_value(
        "default_device",
        config.default_device.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value("sample_rate", &config.sample_rate.to_string());
    presenter.key_value("channels", &config.channels.to_string());
    presenter.key_value("bitrate", &config.bitrate.to_string());
    presenter.key_value("debug", &config.debug.to_string());

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

async fn handle_reset<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.save(&AppConfig::default()).await?;
    presenter.success("Config reset to defaults");
    Ok(())
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_values() {
        assert_eq!(parse_bool("true"), Ok(true));
        assert_eq!(parse_bool("false"), Ok(false));
        assert_eq!(parse_bool("yes"), Ok(true));
        assert_eq!(parse_bool("no"), Ok(false));
        assert_eq!(parse_bool("1"), Ok(true));
        assert_eq!(parse_bool("0"), Ok(false));
        assert!(parse_bool("invalid").is_err());
    }
}
