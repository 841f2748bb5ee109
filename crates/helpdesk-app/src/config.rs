use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_HELPDESK_CONFIG: &str = "HELPDESK_CONFIG";
pub const ENV_HELPDESK_TOKEN: &str = "HELPDESK_TOKEN";

const DEFAULT_DIRECTORY_URL: &str = "http://127.0.0.1:8001";
const DEFAULT_TICKETING_URL: &str = "http://127.0.0.1:8002";
const DEFAULT_STORAGE_URL: &str = "http://127.0.0.1:8003";
const DEFAULT_STREAM_URL: &str = "ws://127.0.0.1:8004/ws";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0}")]
    Message(String),
}

impl ConfigError {
    fn configuration(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HelpdeskConfig {
    #[serde(default = "default_directory_url")]
    pub directory_url: String,
    #[serde(default = "default_ticketing_url")]
    pub ticketing_url: String,
    #[serde(default = "default_storage_url")]
    pub storage_url: String,
    #[serde(default = "default_stream_url")]
    pub stream_url: String,
}

impl Default for HelpdeskConfig {
    fn default() -> Self {
        Self {
            directory_url: default_directory_url(),
            ticketing_url: default_ticketing_url(),
            storage_url: default_storage_url(),
            stream_url: default_stream_url(),
        }
    }
}

fn default_directory_url() -> String {
    DEFAULT_DIRECTORY_URL.to_owned()
}

fn default_ticketing_url() -> String {
    DEFAULT_TICKETING_URL.to_owned()
}

fn default_storage_url() -> String {
    DEFAULT_STORAGE_URL.to_owned()
}

fn default_stream_url() -> String {
    DEFAULT_STREAM_URL.to_owned()
}

pub fn load_from_env() -> Result<HelpdeskConfig, ConfigError> {
    let path = config_path_from_env()?;
    load_from_path(path)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<HelpdeskConfig, ConfigError> {
    load_or_create_config(path.as_ref())
}

fn config_path_from_env() -> Result<PathBuf, ConfigError> {
    match std::env::var(ENV_HELPDESK_CONFIG) {
        Ok(raw) if !raw.trim().is_empty() => Ok(raw.into()),
        Ok(_) => default_config_path(),
        Err(std::env::VarError::NotPresent) => default_config_path(),
        Err(_) => Err(ConfigError::configuration(
            "HELPDESK_CONFIG contained invalid UTF-8",
        )),
    }
}

fn default_config_path() -> Result<PathBuf, ConfigError> {
    let home = std::env::var("HOME")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| {
            ConfigError::configuration("Unable to resolve home directory from HOME")
        })?;

    Ok(home.join(".config").join("helpdesk").join("config.toml"))
}

/// Reads the config file, writing out a default one on first run.
fn load_or_create_config(path: &Path) -> Result<HelpdeskConfig, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|err| {
                        ConfigError::configuration(format!(
                            "Failed to create parent directory {} for HELPDESK_CONFIG: {err}",
                            parent.display()
                        ))
                    })?;
                }
            }

            let default_config = HelpdeskConfig::default();
            let rendered = toml::to_string_pretty(&default_config).map_err(|err| {
                ConfigError::configuration(format!(
                    "Failed to serialize default HELPDESK_CONFIG: {err}"
                ))
            })?;
            std::fs::write(path, &rendered).map_err(|err| {
                ConfigError::configuration(format!(
                    "Failed to write default HELPDESK_CONFIG to {}: {err}",
                    path.display()
                ))
            })?;
            rendered
        }
        Err(err) => {
            return Err(ConfigError::configuration(format!(
                "Failed to read HELPDESK_CONFIG from {}: {err}",
                path.display()
            )));
        }
    };

    parse_config(&raw, path)
}

fn parse_config(raw: &str, path: &Path) -> Result<HelpdeskConfig, ConfigError> {
    let config: HelpdeskConfig = toml::from_str(raw).map_err(|err| {
        ConfigError::configuration(format!(
            "Failed to parse HELPDESK_CONFIG from {}: {err}",
            path.display()
        ))
    })?;

    for (field, value) in [
        ("directory_url", &config.directory_url),
        ("ticketing_url", &config.ticketing_url),
        ("storage_url", &config.storage_url),
        ("stream_url", &config.stream_url),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::configuration(format!(
                "HELPDESK_CONFIG field `{field}` cannot be empty"
            )));
        }
    }

    Ok(config)
}

pub fn required_env(name: &str) -> Result<String, ConfigError> {
    let value = std::env::var(name).map_err(|_| {
        ConfigError::configuration(format!(
            "{name} is not set. Export a valid value before starting helpdesk-app."
        ))
    })?;
    let value = value.trim().to_owned();
    if value.is_empty() {
        return Err(ConfigError::configuration(format!(
            "{name} is empty. Provide a non-empty value."
        )));
    }
    Ok(value)
}
