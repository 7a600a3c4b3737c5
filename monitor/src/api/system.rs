//! システム情報API
//!
//! GET /health

use axum::Json;
use health_monitor_common::protocol::HealthResponse;

/// GET /health - 生存確認
///
/// ストアには触れず、常に 200 を返す。
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}
