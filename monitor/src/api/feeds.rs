//! フィード管理API
//!
//! GET /feeds, POST /feeds/add

use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
use health_monitor_common::error::CommonError;
use health_monitor_common::protocol::{FeedView, RegisterFeedRequest, RegisterFeedResponse};
use health_monitor_common::types::RegisterOutcome;
use tracing::info;

use super::error::AppError;
use crate::AppState;

/// GET /feeds - 登録済みフィードの一覧（登録順）
pub async fn list_feeds(State(state): State<AppState>) -> Result<Json<Vec<FeedView>>, AppError> {
    let feeds = state.store.list_with_status().await?;
    Ok(Json(feeds.iter().map(FeedView::from).collect()))
}

/// POST /feeds/add - フィード登録
///
/// ボディは Content-Type に関係なく、先頭のJSON値だけを読む（後続のバイトは無視）。
/// URLの形式は検証しない。`url` がなければ空文字として登録する。
/// 既に登録済みのURLでも同じレスポンスを返す。
pub async fn add_feed(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RegisterFeedResponse>, AppError> {
    let request = decode_request(&body)?;
    let url = request.url;

    let outcome = state.store.register(&url).await?;
    match outcome {
        RegisterOutcome::Created => info!(url = %url, "Feed registered"),
        RegisterOutcome::AlreadyExists => info!(url = %url, "Feed already registered"),
    }

    Ok(Json(RegisterFeedResponse::created(url)))
}

fn decode_request(body: &[u8]) -> Result<RegisterFeedRequest, CommonError> {
    match serde_json::Deserializer::from_slice(body)
        .into_iter::<RegisterFeedRequest>()
        .next()
    {
        Some(result) => Ok(result?),
        None => Err(CommonError::Validation("request body is empty".to_string())),
    }
}

/// POST以外で /feeds/add にアクセスされた場合
pub async fn method_not_allowed() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}
