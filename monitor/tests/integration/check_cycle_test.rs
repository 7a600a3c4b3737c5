//! Integration Test: 登録 → プローブ → API反映
//!
//! 実際のスケジューラとプローバーを動かし、結果が /feeds と /metrics に現れることを確認する。

use crate::support::{get, memory_pool, post_json, send};
use axum::http::StatusCode;
use health_monitor::common::config::MonitorConfig;
use health_monitor::common::types::FeedStatus;
use health_monitor::db::FeedRepository;
use health_monitor::health::{FeedHealthChecker, FeedProber};
use health_monitor::{api, bootstrap, AppState};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn wait_for_status(app: &axum::Router, expected: usize) -> Vec<Value> {
    for _ in 0..250 {
        let (_, body) = send(app, get("/feeds")).await;
        let feeds: Vec<Value> = serde_json::from_str(&body).unwrap();
        let checked = feeds.iter().filter(|f| f["status"] != "unknown").count();
        if checked >= expected {
            return feeds;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("feeds were not checked in time");
}

#[tokio::test]
async fn registered_feeds_are_classified_by_the_next_cycle() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock)
        .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(1100)))
        .mount(&mock)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock)
        .await;

    let pool = memory_pool().await;
    let config = MonitorConfig {
        check_interval: Duration::from_millis(300),
        check_timeout: Duration::from_secs(5),
        ..MonitorConfig::default()
    };
    let state = bootstrap::start_with_store(Arc::new(pool.clone()), &config)
        .await
        .unwrap();
    let app = api::create_app(state.clone());

    for suffix in ["/ok", "/slow", "/broken"] {
        let body = format!(r#"{{"url":"{}{}"}}"#, mock.uri(), suffix);
        let (status, _) = send(&app, post_json("/feeds/add", &body)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let feeds = wait_for_status(&app, 3).await;
    state.shutdown.request_shutdown();

    let statuses: Vec<&str> = feeds.iter().map(|f| f["status"].as_str().unwrap()).collect();
    assert_eq!(statuses, vec!["green", "yellow", "red"]);
    for feed in &feeds {
        assert!(feed["last_checked"].as_str().unwrap().ends_with('Z'));
    }

    let (_, body) = send(&app, get("/metrics")).await;
    let metrics: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(metrics["green"]["count"], 1);
    assert_eq!(metrics["yellow"]["count"], 1);
    assert_eq!(metrics["red"]["count"], 1);
    assert!(metrics.get("unknown").is_none());
}

#[tokio::test]
async fn unreachable_feed_is_red() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let pool = memory_pool().await;
    pool.register(&format!("http://{}/", addr)).await.unwrap();

    let store: Arc<dyn FeedRepository> = Arc::new(pool.clone());
    let prober = FeedProber::new(store.clone(), Duration::from_secs(2)).unwrap();
    let checker = FeedHealthChecker::new(store, prober);

    let summary = checker.check_all_feeds().await.unwrap();
    assert_eq!(summary.dispatched, 1);

    let app = api::create_app(AppState::new(Arc::new(pool.clone())));
    let feeds = wait_for_status(&app, 1).await;
    assert_eq!(feeds[0]["status"], "red");
    assert_eq!(
        pool.list_with_status().await.unwrap()[0].status,
        FeedStatus::Red
    );
}

#[tokio::test]
async fn shutdown_stops_further_cycles() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock)
        .await;

    let pool = memory_pool().await;
    pool.register(&mock.uri()).await.unwrap();

    let config = MonitorConfig {
        check_interval: Duration::from_millis(100),
        ..MonitorConfig::default()
    };
    let state = bootstrap::start_with_store(Arc::new(pool.clone()), &config)
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(250)).await;
    state.shutdown.request_shutdown();
    tokio::time::sleep(Duration::from_millis(100)).await;
    let seen = mock.received_requests().await.unwrap().len();

    tokio::time::sleep(Duration::from_millis(400)).await;
    let after = mock.received_requests().await.unwrap().len();

    assert!(seen >= 1);
    assert_eq!(seen, after);
}
