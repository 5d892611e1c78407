use crate::client::SynoError::*;
use crate::entities::{
    ApiDescriptor, ApiInfoMap, AuthData, Session, SynologyResponse, TaskAction, TaskList,
    TaskResult, TorrentTask,
};
use anyhow::{Context, Result};
use log::debug;
use reqwest::{Client, StatusCode};
use serde::de::IgnoredAny;
use std::time::Duration;
use thiserror::Error;

const INFO_API: &str = "SYNO.API.Info";
const INFO_PATH: &str = "query.cgi";
pub const AUTH_API: &str = "SYNO.API.Auth";
pub const TASK_API: &str = "SYNO.DownloadStation.Task";
const SESSION_NAME: &str = "DownloadStation";
/// Request timeout used when none is configured
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;

/// Custom error types for the [`SynoDS`] client
#[derive(Error, Debug)]
pub enum SynoError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("{api} Error {code}")]
    Api { api: String, code: i32 },

    #[error("Task {task_id} operation failed with error {code}")]
    TaskOperation { code: i32, task_id: String },

    #[error("Network request error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP request failed with status: {status}")]
    HttpStatus { status: u16 },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid input parameter: {0}")]
    InvalidInput(String),

    #[error("uri returned http error {status} [{uri}]")]
    UriUnreachable { status: u16, uri: String },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Synology Download Station client
///
/// Holds the server address and the HTTP client for one command invocation.
/// Sessions are returned by [`SynoDS::login`] and passed back to every task operation.
pub struct SynoDS {
    host: String,
    client: Client,
}

impl SynoDS {
    /// Creates a new `SynoDS` client for the given host and request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Host URL is empty
    /// - Host URL doesn't start with "http://" or "https://"
    /// - The HTTP client cannot be constructed
    pub fn new(host: &str, timeout_ms: u64) -> Result<Self> {
        let host = validate_host(host)?;
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(Network)?;

        Ok(Self { host, client })
    }

    /// Creates a new `SynoDS` client with a builder pattern
    #[must_use]
    pub fn builder() -> SynoDSBuilder {
        SynoDSBuilder::default()
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Resolves the request path and maximum version of `api` through the discovery endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Network request fails
    /// - Discovery reports `success=false`
    /// - The response does not describe `api`
    pub async fn resolve_api(&self, api: &str) -> Result<ApiDescriptor> {
        let params = [
            ("api", INFO_API),
            ("version", "1"),
            ("method", "query"),
            ("query", api),
        ];

        let response = self
            .make_api_request::<SynologyResponse<ApiInfoMap>>(INFO_PATH, &params)
            .await
            .with_context(|| format!("Failed to resolve {api}"))?;

        if !response.success {
            return Err(Api {
                api: INFO_API.into(),
                code: response.error_code(),
            }
            .into());
        }

        let info = response
            .data
            .and_then(|mut apis| apis.remove(api))
            .ok_or_else(|| InvalidResponse(format!("{api} is not available on this server")))?;

        debug!("Resolved {api} to {} (v{})", info.path, info.max_version);

        Ok(ApiDescriptor {
            name: api.to_string(),
            path: info.path,
            max_version: info.max_version,
        })
    }

    /// Logs in and returns the new session
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Network request fails
    /// - Authentication fails
    /// - Response cannot be parsed
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let auth = self.resolve_api(AUTH_API).await?;
        let version = auth.max_version.to_string();
        let params = [
            ("api", AUTH_API),
            ("version", &version),
            ("method", "login"),
            ("account", username),
            ("passwd", password),
            ("session", SESSION_NAME),
            ("format", "sid"),
        ];

        let response = self
            .make_api_request::<SynologyResponse<AuthData>>(&auth.path, &params)
            .await
            .context("Failed to authorize")?;

        if !response.success {
            return Err(Api {
                api: AUTH_API.into(),
                code: response.error_code(),
            }
            .into());
        }

        match response.data {
            Some(data) if !data.sid.is_empty() => {
                debug!("Logged in as {username}");
                Ok(Session { sid: data.sid })
            }
            _ => Err(InvalidResponse("No session ID received".into()).into()),
        }
    }

    /// Ends the Download Station session
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Network request fails
    /// - API returns an error response
    pub async fn logout(&self) -> Result<()> {
        let auth = self.resolve_api(AUTH_API).await?;
        let version = auth.max_version.to_string();
        let params = [
            ("api", AUTH_API),
            ("version", &version),
            ("method", "logout"),
            ("session", SESSION_NAME),
        ];

        let response = self
            .make_api_request::<SynologyResponse<IgnoredAny>>(&auth.path, &params)
            .await
            .context("Failed to log out")?;

        if response.success {
            debug!("Logged out");
            Ok(())
        } else {
            Err(Api {
                api: AUTH_API.into(),
                code: response.error_code(),
            }
            .into())
        }
    }

    /// Lists the `BitTorrent` tasks in server order
    ///
    /// Tasks of any other type are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Session is empty
    /// - Network request fails
    /// - API returns an error response
    /// - Response cannot be parsed
    pub async fn list_tasks(&self, session: &Session) -> Result<Vec<TorrentTask>> {
        let tasks = self
            .make_task_request::<TaskList>(session, &[("method", "list"), ("additional", "transfer")])
            .await
            .context("Failed to get tasks")?
            .ok_or_else(|| InvalidResponse("No data received".into()))?;

        debug!("Server returned {} of {} tasks", tasks.tasks.len(), tasks.total);

        Ok(tasks
            .tasks
            .iter()
            .filter(|task| task.is_bittorrent())
            .map(|task| task.to_torrent_task())
            .collect())
    }

    /// Creates a new download task from a URI (torrent URL or magnet link)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - URI is empty
    /// - Session is empty
    /// - Network request fails
    /// - API returns an error response
    pub async fn create_task(&self, session: &Session, uri: &str) -> Result<()> {
        if uri.is_empty() {
            return Err(InvalidInput("URI cannot be empty".into()).into());
        }

        debug!("Creating download task. URI: {uri}");

        self.make_task_request::<IgnoredAny>(session, &[("method", "create"), ("uri", uri)])
            .await
            .context("Failed to create download task")?;

        debug!("Successfully created download task for URI: {uri}");
        Ok(())
    }

    /// Applies `action` (`pause`, `resume` or `delete`) to a single task
    ///
    /// Unsupported actions are rejected before any request is sent.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Action is not supported
    /// - Network request fails
    /// - API returns an error response
    /// - The task-level result reports an error
    pub async fn mutate_task(&self, session: &Session, id: &str, action: &str) -> Result<()> {
        let action = action.parse::<TaskAction>()?;
        self.apply_action(session, id, action).await
    }

    /// Pause a specific task
    ///
    /// # Errors
    ///
    /// See [`Self::mutate_task`].
    pub async fn pause(&self, session: &Session, id: &str) -> Result<()> {
        self.apply_action(session, id, TaskAction::Pause).await
    }

    /// Resume a specific task
    ///
    /// # Errors
    ///
    /// See [`Self::mutate_task`].
    pub async fn resume(&self, session: &Session, id: &str) -> Result<()> {
        self.apply_action(session, id, TaskAction::Resume).await
    }

    /// Delete a specific task
    ///
    /// # Errors
    ///
    /// See [`Self::mutate_task`].
    pub async fn delete_task(&self, session: &Session, id: &str) -> Result<()> {
        self.apply_action(session, id, TaskAction::Delete).await
    }

    async fn apply_action(&self, session: &Session, id: &str, action: TaskAction) -> Result<()> {
        if id.is_empty() {
            return Err(InvalidInput("Task ID cannot be empty".into()).into());
        }

        let results = self
            .make_task_request::<Vec<TaskResult>>(session, &[("method", action.method()), ("id", id)])
            .await
            .with_context(|| format!("Failed to {} download task", action.method()))?
            .unwrap_or_default();

        let Some(result) = results.first() else {
            return Err(InvalidResponse(format!("No result received for task {id}")).into());
        };

        if result.error != 0 {
            return Err(TaskOperation {
                code: result.error,
                task_id: id.to_string(),
            }
            .into());
        }

        debug!("Task {id}: {} succeeded", action.method());
        Ok(())
    }

    /// Checks that an HTTP(S) URI answers with `200 OK`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not `200`.
    pub async fn probe_uri(&self, uri: &str) -> Result<()> {
        let response = self.client.get(uri).send().await.map_err(Network)?;
        let status = response.status();
        debug!("Probe of {uri} returned {status}");

        if status == StatusCode::OK {
            Ok(())
        } else {
            Err(UriUnreachable {
                status: status.as_u16(),
                uri: uri.to_string(),
            }
            .into())
        }
    }

    /// Resolves the Task API, sends an authenticated request and unwraps the envelope
    async fn make_task_request<D>(
        &self,
        session: &Session,
        params: &[(&str, &str)],
    ) -> Result<Option<D>>
    where
        D: for<'de> serde::Deserialize<'de>,
    {
        // Check if we have a session ID
        if session.sid.is_empty() {
            return Err(Auth("No session ID available. Make sure to log in first".into()).into());
        }

        let task_api = self.resolve_api(TASK_API).await?;
        let version = task_api.max_version.to_string();

        let mut all_params = vec![("api", TASK_API), ("version", version.as_str())];
        all_params.extend_from_slice(params);
        all_params.push(("_sid", session.sid.as_str()));

        let response = self
            .make_api_request::<SynologyResponse<D>>(&task_api.path, &all_params)
            .await?;

        if response.success {
            Ok(response.data)
        } else {
            Err(Api {
                api: TASK_API.into(),
                code: response.error_code(),
            }
            .into())
        }
    }

    /// Makes a GET API request with query parameters
    async fn make_api_request<R>(&self, path: &str, params: &[(&str, &str)]) -> Result<R>
    where
        R: for<'de> serde::Deserialize<'de>,
    {
        let url = format!("{}/webapi/{}", self.host, path.trim_start_matches('/'));
        debug!("Making API request to: {} with {} parameters", url, params.len());

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(Network)?;

        let status = response.status();
        debug!("API request status: {status}");

        if !status.is_success() {
            return Err(HttpStatus {
                status: status.as_u16(),
            }
            .into());
        }

        let body = response.bytes().await.map_err(Network)?;

        serde_json::from_slice::<R>(&body).map_err(|e| InvalidResponse(e.to_string()).into())
    }
}

/// Checks the host URL and strips a trailing slash
///
/// # Errors
///
/// Returns [`SynoError::Configuration`] if the host is empty or is not an HTTP(S) URL.
pub fn validate_host(host: &str) -> Result<String, SynoError> {
    if host.is_empty() {
        return Err(Configuration("Host URL cannot be empty".into()));
    }

    if !host.starts_with("http://") && !host.starts_with("https://") {
        return Err(Configuration(format!(
            "Host URL must start with http:// or https://, got: {host}"
        )));
    }

    Ok(host.trim_end_matches('/').to_string())
}

/// Builder for [`SynoDS`] client
#[derive(Default)]
pub struct SynoDSBuilder {
    host: Option<String>,
    timeout: Option<u64>,
}

impl SynoDSBuilder {
    /// Sets the host URL
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the request timeout in milliseconds
    #[must_use]
    pub fn timeout(mut self, timeout_millis: u64) -> Self {
        self.timeout = Some(timeout_millis);
        self
    }

    /// Builds the [`SynoDS`] client
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Host is not provided
    /// - Host URL doesn't start with "http://" or "https://"
    pub fn build(self) -> Result<SynoDS> {
        let host = self
            .host
            .ok_or_else(|| Configuration("Host URL is required".into()))?;

        SynoDS::new(&host, self.timeout.unwrap_or(DEFAULT_TIMEOUT_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_host() {
        assert_eq!(validate_host("http://nas:5000/").unwrap(), "http://nas:5000");
        assert!(matches!(validate_host(""), Err(Configuration(_))));
        assert!(matches!(validate_host("nas:5000"), Err(Configuration(_))));
    }

    #[test]
    fn test_builder_requires_host() {
        let error = SynoDS::builder().timeout(100).build().err().unwrap();
        assert!(matches!(
            error.downcast_ref::<SynoError>(),
            Some(Configuration(_))
        ));
    }

    #[test]
    fn test_remote_error_message_names_api() {
        let error = Api {
            api: AUTH_API.into(),
            code: 400,
        };
        assert_eq!(error.to_string(), "SYNO.API.Auth Error 400");
    }
}
