//! In-process stand-in for the tool backend.
//!
//! Speaks the same four endpoints and error shape (`{"detail": ...}`) as the
//! real service and records every request it sees.

#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tooldesk::client::HttpToolClient;
use tooldesk::types::ClientConfig;

#[derive(Debug, Default)]
pub struct BackendState {
    pub tools: Vec<Value>,
    pub list_calls: usize,
    /// (method path, body) in arrival order, list calls excluded.
    pub requests: Vec<(String, Value)>,
    /// Replaces the tool echo of both add endpoints when set.
    pub add_echo: Option<Value>,
    /// Delay applied to list calls after the first one.
    pub slow_list: Option<Duration>,
}

pub type SharedBackend = Arc<Mutex<BackendState>>;

pub fn sample_tool(name: &str) -> Value {
    json!({
        "name": name,
        "description": format!("Function: {}", name),
        "parameters": {
            "type": "object",
            "properties": {
                "location": {"type": "string", "description": "city"}
            },
            "required": ["location"]
        }
    })
}

fn detail(status: StatusCode, msg: impl Into<String>) -> Response {
    (status, Json(json!({ "detail": msg.into() }))).into_response()
}

fn upsert(state: &mut BackendState, tool: Value) {
    let name = tool["name"].clone();
    match state.tools.iter_mut().find(|t| t["name"] == name) {
        Some(existing) => *existing = tool,
        None => state.tools.push(tool),
    }
}

async fn list_tools(State(state): State<SharedBackend>) -> Json<Value> {
    let delay = {
        let mut s = state.lock().unwrap();
        s.list_calls += 1;
        s.slow_list.filter(|_| s.list_calls > 1)
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    let s = state.lock().unwrap();
    Json(json!({ "tools": s.tools }))
}

fn echo(state: &BackendState, tool: Value) -> Response {
    Json(state.add_echo.clone().unwrap_or(tool)).into_response()
}

async fn add_python(State(state): State<SharedBackend>, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    s.requests
        .push(("POST /tools/python-function".to_string(), body.clone()));

    let code = body["function_code"].as_str().unwrap_or_default();
    if !code.contains("def ") {
        return detail(
            StatusCode::BAD_REQUEST,
            "Failed to parse Python function: No function found in the provided code",
        );
    }
    let name = body["function_name"].as_str().unwrap_or("unnamed").to_string();
    let tool = json!({
        "name": name,
        "description": format!("Function: {}", name),
        "parameters": {"type": "object", "properties": {}, "required": []}
    });
    upsert(&mut s, tool.clone());
    echo(&s, tool)
}

fn first_operation_id(spec: &Value) -> Option<String> {
    spec.get("paths")?
        .as_object()?
        .values()
        .filter_map(Value::as_object)
        .flat_map(|item| item.values())
        .find_map(|op| op.get("operationId").and_then(Value::as_str))
        .map(str::to_string)
}

async fn add_openapi(State(state): State<SharedBackend>, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    s.requests
        .push(("POST /tools/openapi-spec".to_string(), body.clone()));

    let spec = &body["spec"];
    if spec.get("openapi").is_none() {
        return detail(
            StatusCode::BAD_REQUEST,
            "Failed to parse OpenAPI specification: Invalid OpenAPI specification: missing 'openapi' field",
        );
    }
    let name = body["operation_id"]
        .as_str()
        .map(str::to_string)
        .or_else(|| first_operation_id(spec))
        .unwrap_or_else(|| "GET__example".to_string());
    let tool = json!({
        "name": name,
        "description": "Get example data",
        "parameters": {"type": "object", "properties": {}}
    });
    upsert(&mut s, tool.clone());
    echo(&s, tool)
}

async fn delete_tool(State(state): State<SharedBackend>, Path(name): Path<String>) -> Response {
    let mut s = state.lock().unwrap();
    s.requests
        .push((format!("DELETE /tools/{}", name), Value::Null));

    let before = s.tools.len();
    s.tools.retain(|t| t["name"] != name.as_str());
    if s.tools.len() == before {
        return detail(StatusCode::NOT_FOUND, format!("Tool '{}' not found", name));
    }
    Json(json!({"message": "Tool deleted successfully", "deleted_tool": name})).into_response()
}

pub fn router(state: SharedBackend) -> Router {
    Router::new()
        .route("/tools/", get(list_tools))
        .route("/tools/python-function", post(add_python))
        .route("/tools/openapi-spec", post(add_openapi))
        .route("/tools/{name}", delete(delete_tool))
        .with_state(state)
}

/// Serve `app` on a random local port and return its base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{}", addr)
}

/// Start the mock backend pre-loaded with `tools`.
pub async fn start_backend(tools: Vec<Value>) -> (String, SharedBackend) {
    start_backend_with(BackendState {
        tools,
        ..Default::default()
    })
    .await
}

/// Start the mock backend from a prepared state.
pub async fn start_backend_with(state: BackendState) -> (String, SharedBackend) {
    let state: SharedBackend = Arc::new(Mutex::new(state));
    let url = serve(router(state.clone())).await;
    (url, state)
}

pub fn client_for(url: &str) -> HttpToolClient {
    HttpToolClient::new(&ClientConfig {
        api_url: url.to_string(),
        request_timeout: None,
    })
    .unwrap()
}
