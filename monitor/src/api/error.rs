//! APIエラーレスポンス型
//!
//! axum用の共通エラーハンドリング。ボディは生のエラーテキスト（text/plain）。

use axum::{http::StatusCode, response::IntoResponse};
use health_monitor_common::error::{CommonError, MonitorError};
use tracing::error;

/// Axum用のエラーレスポンス型
#[derive(Debug)]
pub struct AppError(pub MonitorError);

impl From<MonitorError> for AppError {
    fn from(err: MonitorError) -> Self {
        AppError(err)
    }
}

impl From<CommonError> for AppError {
    fn from(err: CommonError) -> Self {
        AppError(MonitorError::Common(err))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError(MonitorError::Database(err.to_string()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }

        (status, self.0.to_string()).into_response()
    }
}
