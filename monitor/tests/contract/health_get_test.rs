//! Contract Test: GET /health

use crate::support::{build_app, get, send};
use axum::http::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn health_returns_fixed_body() {
    let test_app = build_app().await;

    let (status, body) = send(&test_app.app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        value,
        json!({"status": "ok", "service": "health-monitor", "health": "good"})
    );
}

#[tokio::test]
async fn health_does_not_touch_the_store() {
    let test_app = build_app().await;
    test_app.pool.close().await;

    let (status, _) = send(&test_app.app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
}
