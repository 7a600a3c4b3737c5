//! テスト共通ヘルパー

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use health_monitor::{api, db::FeedRepository, AppState};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::ServiceExt;

/// テスト用アプリケーション
pub struct TestApp {
    pub app: Router,
    pub pool: SqlitePool,
}

/// インメモリSQLiteプールを作成（接続1本でDBを共有）
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    pool.ensure_schema()
        .await
        .expect("Failed to create feeds table");
    pool
}

/// スケジューラなしでAPIだけを組み立てる
pub async fn build_app() -> TestApp {
    let pool = memory_pool().await;
    let state = AppState::new(Arc::new(pool.clone()));
    let app = api::create_app(state);
    TestApp { app, pool }
}

/// リクエストを送り、ステータスとボディ文字列を返す
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

/// GETリクエスト
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// JSONボディ付きPOSTリクエスト
pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
