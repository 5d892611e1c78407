use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::client::SynoError;

/// Response envelope shared by every Synology API
#[derive(Deserialize, Debug)]
pub struct SynologyResponse<D> {
    pub success: bool,
    pub data: Option<D>,
    pub error: Option<ApiError>,
}

impl<D> SynologyResponse<D> {
    /// Error code reported by the envelope, `0` when the server sent none
    #[must_use]
    pub fn error_code(&self) -> i32 {
        self.error.as_ref().map_or(0, |error| error.code)
    }
}

/// Error information from Synology API
#[derive(Deserialize, Debug)]
pub struct ApiError {
    pub code: i32,
}

/// Discovery response data, keyed by API name
pub type ApiInfoMap = HashMap<String, ApiInfo>;

/// Discovery entry for a single API
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ApiInfo {
    pub path: String,
    pub max_version: u32,
}

/// Resolved location of a logical API
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiDescriptor {
    pub name: String,
    pub path: String,
    pub max_version: u32,
}

/// Authentication response data
#[derive(Deserialize, Debug)]
pub struct AuthData {
    /// Session ID used for authenticated requests
    pub sid: String,
}

/// Session established by a successful login
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub sid: String,
}

/// Collection of download tasks
#[derive(Deserialize, Debug)]
pub struct TaskList {
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub total: i32,
}

/// Individual download task information
#[derive(Deserialize, Debug)]
pub struct Task {
    /// Unique identifier for the task
    pub id: String,
    /// Type of download task (e.g., "bt" for `BitTorrent`)
    #[serde(rename = "type")]
    pub task_type: String,
    #[serde(default)]
    pub username: String,
    pub title: String,
    /// Total size in bytes
    #[serde(default)]
    pub size: i64,
    pub status: TaskStatus,
    pub additional: Option<AdditionalTaskInfo>,
}

/// Additional information requested through the `additional` parameter
#[derive(Deserialize, Default, Debug)]
pub struct AdditionalTaskInfo {
    pub transfer: Option<Transfer>,
}

/// Transfer statistics
#[derive(Deserialize, Default, Debug)]
pub struct Transfer {
    #[serde(default)]
    pub size_downloaded: i64,
}

/// Download task status as reported by the Task API
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Waiting,
    Downloading,
    Paused,
    Finishing,
    Finished,
    HashChecking,
    Seeding,
    FilehostingWaiting,
    Extracting,
    Error,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            Self::Waiting => "waiting",
            Self::Downloading => "downloading",
            Self::Paused => "paused",
            Self::Finishing => "finishing",
            Self::Finished => "finished",
            Self::HashChecking => "hash_checking",
            Self::Seeding => "seeding",
            Self::FilehostingWaiting => "filehosting_waiting",
            Self::Extracting => "extracting",
            Self::Error => "error",
            Self::Unknown => "unknown",
        };
        f.write_str(status)
    }
}

/// Per-task result of a pause, resume or delete call
#[derive(Deserialize, Debug)]
pub struct TaskResult {
    pub error: i32,
}

/// Single-task operations accepted by the Task API
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskAction {
    Pause,
    Resume,
    Delete,
}

impl TaskAction {
    /// Value sent as the `method` parameter
    #[must_use]
    pub fn method(self) -> &'static str {
        match self {
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Delete => "delete",
        }
    }
}

impl FromStr for TaskAction {
    type Err = SynoError;

    fn from_str(action: &str) -> Result<Self, Self::Err> {
        match action {
            "pause" => Ok(Self::Pause),
            "resume" => Ok(Self::Resume),
            "delete" => Ok(Self::Delete),
            other => Err(SynoError::InvalidInput(format!(
                "provided action '{other}' is invalid"
            ))),
        }
    }
}

/// `BitTorrent` task with its byte counts and display fields
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TorrentTask {
    pub id: String,
    pub user: String,
    pub title: String,
    pub status: TaskStatus,
    pub size_bytes: i64,
    pub downloaded_bytes: i64,
    /// Human-readable `size_bytes`
    pub size: String,
    /// Integer percentage followed by ` %`
    pub progress: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_is_tolerated() {
        let status: TaskStatus = serde_json::from_str("\"something_new\"").unwrap();
        assert_eq!(status, TaskStatus::Unknown);

        let status: TaskStatus = serde_json::from_str("\"hash_checking\"").unwrap();
        assert_eq!(status, TaskStatus::HashChecking);
        assert_eq!(status.to_string(), "hash_checking");
    }

    #[test]
    fn test_task_action_from_str() {
        assert_eq!("pause".parse::<TaskAction>().unwrap(), TaskAction::Pause);
        assert_eq!("delete".parse::<TaskAction>().unwrap().method(), "delete");
        assert!(matches!(
            "cancel".parse::<TaskAction>(),
            Err(SynoError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_error_code_defaults_to_zero() {
        let response: SynologyResponse<()> = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert_eq!(response.error_code(), 0);

        let response: SynologyResponse<()> =
            serde_json::from_str(r#"{"success":false,"error":{"code":105}}"#).unwrap();
        assert_eq!(response.error_code(), 105);
    }
}
