//! Command dispatcher
//!
//! Each command that talks to the server runs the same chain:
//! load the password, log in, run one operation and log out again.

use crate::client::{SynoDS, SynoError};
use crate::config::{ConfigFileData, save_config_to};
use crate::credentials::SecretStore;
use crate::entities::{Session, TaskAction, TorrentTask};
use anyhow::Result;
use log::{info, warn};
use std::path::Path;
use url::Url;

/// Stores the server and user in the config file and the password in the secret store
///
/// # Errors
///
/// Returns an error if the server URL is invalid or either store fails.
pub fn init(
    config_path: &Path,
    secrets: &impl SecretStore,
    server: &str,
    user: &str,
    password: &str,
) -> Result<()> {
    save_config_to(config_path, server, user)?;
    secrets.save_credentials(user, password)?;
    info!("Saved configuration for {user} on {server}");
    Ok(())
}

/// Lists the `BitTorrent` tasks of the configured server
///
/// # Errors
///
/// Returns the first error of login, listing or logout.
pub async fn list(
    config: &ConfigFileData,
    secrets: &impl SecretStore,
    timeout_ms: u64,
) -> Result<Vec<TorrentTask>> {
    let (synods, session) = open_session(config, secrets, timeout_ms).await?;
    let result = synods.list_tasks(&session).await;
    close_session(&synods, result).await
}

/// Validates `uri`, checks an HTTP(S) URI is reachable and adds it as a new task
///
/// # Errors
///
/// Returns an error if the URI is malformed or unreachable, or if any API call fails.
pub async fn add_uri(
    config: &ConfigFileData,
    secrets: &impl SecretStore,
    timeout_ms: u64,
    uri: &str,
) -> Result<()> {
    let parsed = validate_uri(uri)?;

    let synods = SynoDS::builder()
        .host(&config.server)
        .timeout(timeout_ms)
        .build()?;

    if matches!(parsed.scheme(), "http" | "https") {
        synods.probe_uri(uri).await?;
    }

    let session = login(&synods, config, secrets).await?;
    let result = synods.create_task(&session, uri).await;
    close_session(&synods, result).await
}

/// Applies a pause, resume or delete to one task
///
/// # Errors
///
/// Returns the first error of login, the task operation or logout.
pub async fn manage_task(
    config: &ConfigFileData,
    secrets: &impl SecretStore,
    timeout_ms: u64,
    task_id: &str,
    action: TaskAction,
) -> Result<()> {
    let (synods, session) = open_session(config, secrets, timeout_ms).await?;
    let result = match action {
        TaskAction::Pause => synods.pause(&session, task_id).await,
        TaskAction::Resume => synods.resume(&session, task_id).await,
        TaskAction::Delete => synods.delete_task(&session, task_id).await,
    };
    close_session(&synods, result).await
}

/// Parses a task URI, accepting only absolute URIs with a scheme
///
/// # Errors
///
/// Returns [`SynoError::InvalidInput`] if `uri` cannot be parsed.
pub fn validate_uri(uri: &str) -> Result<Url, SynoError> {
    Url::parse(uri).map_err(|e| SynoError::InvalidInput(format!("invalid URI '{uri}': {e}")))
}

async fn open_session(
    config: &ConfigFileData,
    secrets: &impl SecretStore,
    timeout_ms: u64,
) -> Result<(SynoDS, Session)> {
    let synods = SynoDS::builder()
        .host(&config.server)
        .timeout(timeout_ms)
        .build()?;
    let session = login(&synods, config, secrets).await?;
    Ok((synods, session))
}

async fn login(
    synods: &SynoDS,
    config: &ConfigFileData,
    secrets: &impl SecretStore,
) -> Result<Session> {
    let password = secrets.get_password(&config.user)?;
    synods.login(&config.user, &password).await
}

/// Logs out after an operation, keeping the operation's error if both fail
async fn close_session<T>(synods: &SynoDS, result: Result<T>) -> Result<T> {
    let logout = synods.logout().await;
    match (result, logout) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(logout_error)) => Err(logout_error),
        (Err(error), Ok(())) => Err(error),
        (Err(error), Err(logout_error)) => {
            warn!("Logout failed: {logout_error:#}");
            Err(error)
        }
    }
}
