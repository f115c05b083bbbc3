//! Shared helpers for replication pipeline tests: an in-process mock of
//! the environment-manager console plus document and config builders.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use mimeo_cli::config::RunConfig;
use mimeo_cli::output::OutputFormat;
use mimeo_common::ObjectType;

/// How the mock console answers one object's version history request.
pub enum VersionsReply {
    Items(Vec<Value>),
    Status(u16),
}

/// Scripted state for the mock console. Fields with interior mutability
/// record what the pipeline actually sent.
#[derive(Default)]
pub struct MockConsole {
    pub objects: Vec<Value>,
    pub versions: HashMap<String, VersionsReply>,
    pub fail_publish: Vec<String>,
    pub published: Mutex<Vec<Value>>,
    pub list_queries: Mutex<Vec<HashMap<String, String>>>,
    pub version_requests: Mutex<Vec<String>>,
    pub seen_api_keys: Mutex<Vec<String>>,
}

fn record_api_key(console: &MockConsole, headers: &HeaderMap) {
    if let Some(key) = headers.get("x-api-key").and_then(|v| v.to_str().ok()) {
        console.seen_api_keys.lock().unwrap().push(key.to_string());
    }
}

async fn handle_list(
    State(console): State<Arc<MockConsole>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Json<Value> {
    record_api_key(&console, &headers);
    console.list_queries.lock().unwrap().push(params);
    Json(json!({ "items": console.objects }))
}

async fn handle_versions(
    State(console): State<Arc<MockConsole>>,
    Path((_group, _project, _object_type, name)): Path<(String, String, String, String)>,
    headers: HeaderMap,
) -> Response {
    record_api_key(&console, &headers);
    console.version_requests.lock().unwrap().push(name.clone());

    match console.versions.get(&name) {
        Some(VersionsReply::Items(items)) => Json(json!({ "items": items })).into_response(),
        Some(VersionsReply::Status(code)) => (
            StatusCode::from_u16(*code).unwrap(),
            "version backend unavailable",
        )
            .into_response(),
        None => Json(json!({ "items": [] })).into_response(),
    }
}

async fn handle_publish(
    State(console): State<Arc<MockConsole>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record_api_key(&console, &headers);

    let name = body["metadata"]["name"].as_str().unwrap_or_default();
    if console.fail_publish.iter().any(|n| n == name) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "backend exploded").into_response();
    }

    console.published.lock().unwrap().push(body);
    StatusCode::CREATED.into_response()
}

/// Serve the mock console on an ephemeral port and return its base URL.
pub async fn spawn_console(console: Arc<MockConsole>) -> String {
    let app = Router::new()
        .route(
            "/apis/:group/v1/projects/:project/:object_type",
            get(handle_list).post(handle_publish),
        )
        .route(
            "/apis/:group/v1/projects/:project/:object_type/:name/versions",
            get(handle_versions),
        )
        .with_state(console);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

/// A realistic catalog object as the source console would serve it, full
/// of fields the cleaner must strip.
pub fn sample_object(name: &str, version: Option<&str>) -> Value {
    let mut spec = json!({
        "sharing": {"enabled": true},
        "agents": [{"name": "agent-src"}],
        "hooks": {
            "onInit": [{"agents": [{"name": "agent-src"}], "cmd": "init.sh"}]
        },
        "resources": [{"kind": "vm", "count": 1}]
    });
    if let Some(version) = version {
        spec["version"] = json!(version);
    }

    json!({
        "apiVersion": "eaas.envmgmt.io/v1",
        "kind": "EnvironmentTemplate",
        "metadata": {
            "name": name,
            "project": "defaultproject",
            "id": format!("id-{name}"),
            "projectID": "p-1",
            "createdAt": "2024-05-01T08:00:00Z",
            "modifiedAt": "2024-05-02T08:00:00Z",
            "createdBy": "alice",
            "modifiedBy": "bob",
            "labels": {"origin": "test"}
        },
        "spec": spec,
        "status": {"phase": "ready"}
    })
}

pub fn run_config(source: &str, target: &str, object_type: ObjectType) -> RunConfig {
    RunConfig {
        source: source.to_string(),
        target: target.to_string(),
        object_type,
        project: "system-catalog".to_string(),
        verify_ssl: false,
        debug: false,
        output: OutputFormat::Table,
        source_api_key: None,
        target_api_key: None,
    }
}
