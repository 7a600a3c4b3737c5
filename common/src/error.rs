//! エラー型定義
//!
//! 統一エラー型（thiserror使用）

use thiserror::Error;

/// Common layer error type
#[derive(Debug, Error)]
pub enum CommonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// health monitor error type
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Common layer error
    #[error(transparent)]
    Common(#[from] CommonError),

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    Http(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MonitorError {
    /// HTTPステータスコードに対応する数値を返す
    ///
    /// リクエスト内容に起因するものは 400、それ以外は 500。
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Common(CommonError::Validation(_)) | Self::Common(CommonError::Serialization(_)) => {
                400
            }
            Self::Common(CommonError::Config(_)) => 500,
            Self::Database(_) | Self::Http(_) | Self::Internal(_) => 500,
        }
    }
}

/// Common layer result type
pub type CommonResult<T> = Result<T, CommonError>;

/// health monitor result type
pub type MonitorResult<T> = Result<T, MonitorError>;
