//! サーバー初期化
//!
//! ストア接続、スキーマ作成、プローバー生成、スケジューラ起動を行う。

use health_monitor_common::config::MonitorConfig;
use health_monitor_common::error::MonitorError;
use std::sync::Arc;
use tracing::info;

use crate::db::{self, FeedRepository};
use crate::health::{FeedHealthChecker, FeedProber};
use crate::AppState;

/// 設定からアプリケーション状態を構築し、スケジューラを起動する
///
/// ここで返るエラーはすべて起動失敗として扱う。
pub async fn initialize(config: &MonitorConfig) -> Result<AppState, MonitorError> {
    let store = db::create_store(&config.database)
        .await
        .map_err(|e| MonitorError::Database(format!("Failed to connect to database: {}", e)))?;
    info!(
        host = %config.database.host,
        database = %config.database.name,
        url_override = config.database.url.is_some(),
        "Database connected"
    );

    start_with_store(store, config).await
}

/// 任意のストアでスキーマを用意し、スケジューラを起動する
pub async fn start_with_store(
    store: Arc<dyn FeedRepository>,
    config: &MonitorConfig,
) -> Result<AppState, MonitorError> {
    store
        .ensure_schema()
        .await
        .map_err(|e| MonitorError::Database(format!("Failed to create feeds table: {}", e)))?;

    let prober = FeedProber::new(store.clone(), config.check_timeout)?;
    let state = AppState::new(store.clone());

    FeedHealthChecker::new(store, prober)
        .with_interval(config.check_interval)
        .with_concurrency(config.check_concurrency)
        .start(state.shutdown.clone());

    Ok(state)
}
