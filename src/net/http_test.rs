use super::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

use crate::layout::test_helpers::sample_layout;

type Captured = Arc<Mutex<Vec<Value>>>;

const TIMEOUTS: HttpTimeouts = HttpTimeouts { request_secs: 5, connect_secs: 5 };

async fn load_handler(Query(params): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    match params.get("user_id").map(String::as_str) {
        Some("u1") => (
            StatusCode::OK,
            Json(json!({"widgets": [
                {"id": "tenant-usage", "position": {"x": 0, "y": 0, "w": 12, "h": 4}},
                {"id": "system-health", "position": {"x": 0, "y": 4, "w": 6, "h": 4}}
            ]})),
        ),
        Some("boom") => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "database offline"}))),
        _ => (StatusCode::NOT_FOUND, Json(Value::Null)),
    }
}

async fn save_handler(State(captured): State<Captured>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["user_id"] == "rejected" {
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"error": "Layout too large"})));
    }
    if body["user_id"] == "silent" {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(Value::Null));
    }
    captured.lock().unwrap().push(body);
    (StatusCode::OK, Json(json!({"ok": true})))
}

async fn catalog_handler() -> Json<Value> {
    Json(json!([{"id": "system-health", "name": "System health"}, {"name": "missing id"}]))
}

async fn data_handler() -> Json<Value> {
    Json(json!({"system-health": {"cpu": 0.4}, "recent-activity": ["deploy"]}))
}

async fn spawn_mock() -> (String, Captured) {
    let captured: Captured = Arc::default();
    let app = Router::new()
        .route("/api/dashboard/layouts", get(load_handler).post(save_handler))
        .route("/api/dashboard/widgets", get(catalog_handler))
        .route("/api/dashboard/data", get(data_handler))
        .with_state(Arc::clone(&captured));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api/"), captured)
}

// =============================================================================
// load
// =============================================================================

#[tokio::test]
async fn load_returns_saved_layout() {
    let (base, _) = spawn_mock().await;
    let store = HttpLayoutStore::new(&base, TIMEOUTS).unwrap();
    assert!(!store.base_url().ends_with('/'));

    let layout = store.load_layout("u1").await.unwrap().unwrap();
    assert_eq!(layout.ids(), vec!["tenant-usage", "system-health"]);
    assert_eq!(layout.widgets[0].position.w, 12);
}

#[tokio::test]
async fn load_not_found_is_none() {
    let (base, _) = spawn_mock().await;
    let store = HttpLayoutStore::new(&base, TIMEOUTS).unwrap();
    assert!(store.load_layout("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn load_server_error_carries_message() {
    let (base, _) = spawn_mock().await;
    let store = HttpLayoutStore::new(&base, TIMEOUTS).unwrap();
    let err = store.load_layout("boom").await.unwrap_err();
    assert!(matches!(err, PersistenceError::Response { status: 500, .. }));
    assert_eq!(err.user_message(), "database offline");
}

// =============================================================================
// save
// =============================================================================

#[tokio::test]
async fn save_posts_wire_body() {
    let (base, captured) = spawn_mock().await;
    let store = HttpLayoutStore::new(&base, TIMEOUTS).unwrap();
    store.save_layout("u1", &sample_layout(2)).await.unwrap();

    let bodies = captured.lock().unwrap().clone();
    assert_eq!(bodies.len(), 1);
    assert_eq!(
        bodies[0],
        json!({"user_id": "u1", "layout": {"widgets": [
            {"id": "w0", "position": {"x": 0, "y": 0, "w": 6, "h": 4}},
            {"id": "w1", "position": {"x": 0, "y": 4, "w": 6, "h": 4}}
        ]}})
    );
}

#[tokio::test]
async fn save_rejection_uses_server_message() {
    let (base, _) = spawn_mock().await;
    let store = HttpLayoutStore::new(&base, TIMEOUTS).unwrap();
    let err = store.save_layout("rejected", &sample_layout(1)).await.unwrap_err();
    assert!(matches!(err, PersistenceError::Response { status: 422, .. }));
    assert_eq!(err.user_message(), "Layout too large");
    assert!(!err.retryable());
}

#[tokio::test]
async fn save_failure_without_message_uses_fallback() {
    let (base, _) = spawn_mock().await;
    let store = HttpLayoutStore::new(&base, TIMEOUTS).unwrap();
    let err = store.save_layout("silent", &sample_layout(1)).await.unwrap_err();
    assert_eq!(err.user_message(), crate::net::GENERIC_SAVE_FAILURE);
    assert!(err.retryable());
}

#[tokio::test]
async fn unreachable_server_is_request_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = HttpLayoutStore::new(&format!("http://{addr}"), TIMEOUTS).unwrap();
    let err = store.save_layout("u1", &sample_layout(1)).await.unwrap_err();
    assert_eq!(err.error_code(), "E_REQUEST");
}

// =============================================================================
// catalog + data
// =============================================================================

#[tokio::test]
async fn catalog_and_data_are_fetched() {
    let (base, _) = spawn_mock().await;
    let store = HttpLayoutStore::new(&base, TIMEOUTS).unwrap();

    let catalog = store.widget_catalog().await.unwrap();
    assert_eq!(catalog, vec![WidgetDefinition { id: "system-health".into(), name: "System health".into() }]);

    let data = store.dashboard_data().await.unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data["system-health"]["cpu"], 0.4);
}
