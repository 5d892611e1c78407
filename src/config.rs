//! Persistent connection settings
//!
//! The server address and user name live in `$HOME/.synodsm` as TOML.
//! The password is never written here, see [`crate::credentials`].

use crate::client::{SynoError, validate_host};
use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = ".synodsm";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ConfigFileData {
    pub server: String,
    pub user: String,
}

/// Location of the configuration file in the user's home directory
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_file_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_FILE))
        .ok_or_else(|| SynoError::Configuration("Cannot determine home directory".into()).into())
}

/// Saves the configuration to the default location
///
/// # Errors
///
/// See [`save_config_to`].
pub fn save_config(server: &str, user: &str) -> Result<()> {
    save_config_to(&config_file_path()?, server, user)
}

/// Loads the configuration from the default location
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<ConfigFileData> {
    load_config_from(&config_file_path()?)
}

/// Saves the configuration to `path`, replacing any previous content
///
/// # Errors
///
/// Returns an error if:
/// - Server URL is not an HTTP(S) URL
/// - User is empty
/// - The file cannot be written
pub fn save_config_to(path: &Path, server: &str, user: &str) -> Result<()> {
    if user.is_empty() {
        return Err(SynoError::Configuration("User cannot be empty".into()).into());
    }

    let data = ConfigFileData {
        server: validate_host(server)?,
        user: user.to_string(),
    };

    let contents = toml::to_string(&data).context("Failed to serialize configuration")?;
    fs::write(path, contents)
        .with_context(|| format!("Failed to write configuration to {}", path.display()))?;

    debug!("Configuration saved to {}", path.display());
    Ok(())
}

/// Loads the configuration from `path`
///
/// # Errors
///
/// Returns an error if the file is missing or malformed.
pub fn load_config_from(path: &Path) -> Result<ConfigFileData> {
    let contents = fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read configuration from {}, run `synodsm init` first",
            path.display()
        )
    })?;

    let data: ConfigFileData = toml::from_str(&contents)
        .map_err(|e| SynoError::Configuration(format!("{}: {e}", path.display())))?;

    debug!("Configuration loaded from {}", path.display());
    Ok(data)
}
