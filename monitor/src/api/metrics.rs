//! メトリクスAPI
//!
//! GET /metrics

use axum::{extract::State, Json};
use health_monitor_common::protocol::MetricsResponse;

use super::error::AppError;
use crate::AppState;

/// GET /metrics - ステータス別の件数と平均レイテンシ
///
/// 未チェック（unknown）のフィードは集計に含めない。
pub async fn metrics(State(state): State<AppState>) -> Result<Json<MetricsResponse>, AppError> {
    let metrics = state.store.aggregate_by_status().await?;
    Ok(Json(metrics))
}
