//! Contract Test: GET /metrics

use crate::support::{build_app, get, send};
use axum::http::StatusCode;
use chrono::Utc;
use health_monitor::common::types::FeedStatus;
use health_monitor::db::FeedRepository;
use serde_json::{json, Value};

#[tokio::test]
async fn metrics_empty_registry_is_empty_object() {
    let test_app = build_app().await;

    let (status, body) = send(&test_app.app, get("/metrics")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "{}");
}

#[tokio::test]
async fn metrics_groups_by_status_and_excludes_unknown() {
    let test_app = build_app().await;
    for url in ["http://a.test", "http://b.test", "http://c.test", "http://d.test"] {
        test_app.pool.register(url).await.unwrap();
    }
    let ids: Vec<_> = test_app
        .pool
        .list_feeds()
        .await
        .unwrap()
        .into_iter()
        .map(|f| f.id)
        .collect();

    let now = Utc::now();
    test_app
        .pool
        .record_check(ids[0], FeedStatus::Green, now, 100)
        .await
        .unwrap();
    test_app
        .pool
        .record_check(ids[1], FeedStatus::Green, now, 300)
        .await
        .unwrap();
    test_app
        .pool
        .record_check(ids[2], FeedStatus::Red, now, 0)
        .await
        .unwrap();

    let (status, body) = send(&test_app.app, get("/metrics")).await;

    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        value,
        json!({
            "green": {"count": 2, "avg_latency": 200.0},
            "red": {"count": 1, "avg_latency": 0.0}
        })
    );
}

#[tokio::test]
async fn metrics_store_failure_is_500() {
    let test_app = build_app().await;
    test_app.pool.close().await;

    let (status, _) = send(&test_app.app, get("/metrics")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
