#![allow(dead_code)]

use std::fs;
use synodsm::client::SynoError;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

/// # Panics
///
/// Will panic if a file can't be read or missing
#[must_use = "This function returns the body of the file as a string"]
pub fn body_from_file(path: &str) -> String {
    fs::read_to_string(path).expect("Failed to read file")
}

/// # Panics
///
/// Will panic if the error does not wrap a [`SynoError`]
pub fn syno_error(error: &anyhow::Error) -> &SynoError {
    error
        .downcast_ref::<SynoError>()
        .unwrap_or_else(|| panic!("expected SynoError, got: {error:#}"))
}

/// Matches requests that do not carry the given query parameter
pub struct QueryParamMissingMatcher(String);

/// Shorthand for [`QueryParamMissingMatcher`].
pub fn query_param_missing<K: Into<String>>(key: K) -> QueryParamMissingMatcher {
    QueryParamMissingMatcher(key.into())
}

impl Match for QueryParamMissingMatcher {
    fn matches(&self, request: &Request) -> bool {
        !request.url.query_pairs().any(|(key, _)| key == self.0.as_str())
    }
}

pub fn json_response(response_file: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .append_header("content-type", "application/json")
        .set_body_string(body_from_file(response_file))
}

// Discovery of the Auth and Task APIs, answered as often as asked
pub async fn create_discovery_mocks(server: &MockServer) {
    for (api, response_file) in [
        ("SYNO.API.Auth", "test-files/info_auth.json"),
        ("SYNO.DownloadStation.Task", "test-files/info_task.json"),
    ] {
        Mock::given(method("GET"))
            .and(path("/webapi/query.cgi"))
            .and(query_param("api", "SYNO.API.Info"))
            .and(query_param("version", "1"))
            .and(query_param("method", "query"))
            .and(query_param("query", api))
            .respond_with(json_response(response_file))
            .mount(server)
            .await;
    }
}

pub async fn create_login_mock(server: &MockServer, response_file: &str) {
    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("api", "SYNO.API.Auth"))
        .and(query_param("version", "6"))
        .and(query_param("method", "login"))
        .and(query_param("account", "alice"))
        .and(query_param("passwd", "secret"))
        .and(query_param("session", "DownloadStation"))
        .and(query_param("format", "sid"))
        .respond_with(json_response(response_file))
        .expect(1)
        .mount(server)
        .await;
}

pub async fn create_logout_mock(server: &MockServer, response_file: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("api", "SYNO.API.Auth"))
        .and(query_param("version", "6"))
        .and(query_param("method", "logout"))
        .and(query_param("session", "DownloadStation"))
        .and(query_param_missing("_sid"))
        .respond_with(json_response(response_file))
        .expect(times)
        .mount(server)
        .await;
}

// Authenticated call against the Task API
pub async fn create_task_mock(server: &MockServer, params: Vec<(&str, &str)>, response_file: &str) {
    let mut builder = Mock::given(method("GET"))
        .and(path("/webapi/DownloadStation/task.cgi"))
        .and(query_param("api", "SYNO.DownloadStation.Task"))
        .and(query_param("version", "3"))
        .and(query_param("_sid", "ABC123"));
    for (key, value) in params {
        builder = builder.and(query_param(key, value));
    }
    builder
        .respond_with(json_response(response_file))
        .expect(1)
        .mount(server)
        .await;
}

// Fails the test if anything at all reaches the server
pub async fn forbid_requests(server: &MockServer) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}
