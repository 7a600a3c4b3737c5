//! Contract Test: GET /feeds

use crate::support::{build_app, get, post_json, send};
use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use health_monitor::common::types::FeedStatus;
use health_monitor::db::FeedRepository;
use serde_json::{json, Value};

#[tokio::test]
async fn list_feeds_empty_is_empty_array() {
    let test_app = build_app().await;

    let (status, body) = send(&test_app.app, get("/feeds")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}

#[tokio::test]
async fn registered_feed_is_listed_as_unknown() {
    let test_app = build_app().await;
    send(
        &test_app.app,
        post_json("/feeds/add", r#"{"url":"http://a.test"}"#),
    )
    .await;

    let (status, body) = send(&test_app.app, get("/feeds")).await;

    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        value,
        json!([{"url": "http://a.test", "status": "unknown", "latency_ms": 0}])
    );
}

#[tokio::test]
async fn checked_feed_includes_last_checked() {
    let test_app = build_app().await;
    test_app.pool.register("http://a.test").await.unwrap();
    test_app.pool.register("http://b.test").await.unwrap();
    let id = test_app.pool.list_feeds().await.unwrap()[0].id;

    let checked_at = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
    test_app
        .pool
        .record_check(id, FeedStatus::Yellow, checked_at, 1500)
        .await
        .unwrap();

    let (_, body) = send(&test_app.app, get("/feeds")).await;
    let value: Value = serde_json::from_str(&body).unwrap();

    assert_eq!(
        value,
        json!([
            {
                "url": "http://a.test",
                "status": "yellow",
                "latency_ms": 1500,
                "last_checked": "2024-05-06T07:08:09Z"
            },
            {"url": "http://b.test", "status": "unknown", "latency_ms": 0}
        ])
    );
}

#[tokio::test]
async fn list_feeds_store_failure_is_500() {
    let test_app = build_app().await;
    test_app.pool.close().await;

    let (status, _) = send(&test_app.app, get("/feeds")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
