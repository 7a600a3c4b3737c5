//! REST APIハンドラー
//!
//! フィード登録・一覧、メトリクス、生存確認API

pub mod error;
pub mod feeds;
pub mod metrics;
pub mod system;

use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// APIルーターを作成
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/feeds", get(feeds::list_feeds))
        .route(
            "/feeds/add",
            post(feeds::add_feed).fallback(feeds::method_not_allowed),
        )
        .route("/metrics", get(metrics::metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
