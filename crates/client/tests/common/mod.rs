#![allow(dead_code)]

use std::time::Duration;

use reportrun_client::{PollConfig, RunnerConfig};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ITEM_ID: &str = "mock-portal-item-id";
pub const PORTAL_TOKEN: &str = "mock-portal-token";
pub const REPORTING_TOKEN: &str = "mock-reporting-token";
pub const TICKET: &str = "mock-report-ticket";
pub const TAG: &str = "mock-report-tag";

pub const ITEM_PATH: &str = "/sharing/rest/content/items/mock-portal-item-id";
pub const RUN_PATH: &str = "/reporting/service/job/run";
pub const ARTIFACTS_PATH: &str = "/reporting/service/job/artifacts";
pub const TOKEN_PATH: &str = "/reporting/service/auth/token/run";

/// Reporting root registered on the mock portal item.
pub fn reporting_url(server: &MockServer) -> String {
    format!("{}/reporting", server.uri())
}

/// Service base URL the client derives from [`reporting_url`].
pub fn service_url(server: &MockServer) -> String {
    format!("{}/service", reporting_url(server))
}

pub fn artifact_url(server: &MockServer) -> String {
    format!("{}/job/result?ticket={TICKET}&tag={TAG}", service_url(server))
}

pub fn logs_url(server: &MockServer) -> String {
    format!("{}/job/logs?ticket={TICKET}", service_url(server))
}

/// Runner configuration pointing at the mock portal, with a short poll
/// interval and a bounded attempt count so a broken test cannot hang.
pub fn test_config(server: &MockServer) -> RunnerConfig {
    RunnerConfig {
        portal_url: server.uri(),
        poll: PollConfig {
            interval: Duration::from_millis(10),
            max_attempts: Some(50),
            deadline: None,
        },
        ..Default::default()
    }
}

pub fn finished_snapshot() -> serde_json::Value {
    json!({
        "results": [
            {"$type": "JobResult", "contentType": "application/pdf", "tag": TAG, "length": 24003},
            {"$type": "JobQuit", "kind": "Run"},
        ],
    })
}

pub fn running_snapshot() -> serde_json::Value {
    json!({"results": []})
}

pub async fn mount_item(server: &MockServer, access: &str) {
    Mock::given(method("GET"))
        .and(path(ITEM_PATH))
        .and(query_param("f", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": access,
            "url": format!("{}/", reporting_url(server)),
        })))
        .mount(server)
        .await;
}

pub async fn mount_run(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(RUN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {"$type": "TokenResponse", "ticket": TICKET},
        })))
        .mount(server)
        .await;
}

pub async fn mount_status(server: &MockServer, snapshot: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(ARTIFACTS_PATH))
        .and(query_param("ticket", TICKET))
        .respond_with(ResponseTemplate::new(200).set_body_json(snapshot))
        .mount(server)
        .await;
}

/// Public item, successful submission, and a finished job on first poll.
pub async fn mount_defaults(server: &MockServer) {
    mount_item(server, "public").await;
    mount_run(server).await;
    mount_status(server, finished_snapshot()).await;
}

/// Body of the single `POST /job/run` request the server received.
pub async fn run_request(server: &MockServer) -> wiremock::Request {
    let requests = server.received_requests().await.unwrap_or_default();
    let mut runs: Vec<_> = requests
        .into_iter()
        .filter(|r| r.url.path() == RUN_PATH)
        .collect();
    assert_eq!(runs.len(), 1, "expected exactly one job run request");
    runs.remove(0)
}
