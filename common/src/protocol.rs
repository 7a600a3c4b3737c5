//! 通信プロトコル定義
//!
//! HTTP APIのリクエスト/レスポンスメッセージ

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::types::{Feed, FeedStatus, StatusMetrics};
use std::collections::BTreeMap;

/// サービス名（`/health` で返す）
pub const SERVICE_NAME: &str = "health-monitor";

/// フィード登録リクエスト（POST /feeds/add）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterFeedRequest {
    /// 監視対象URL（省略時は空文字）
    #[serde(default)]
    pub url: String,
}

/// フィード登録レスポンス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterFeedResponse {
    /// 常に "created"（既存URLでも同じ）
    pub status: String,
    /// 登録したURL
    pub url: String,
}

impl RegisterFeedResponse {
    /// "created" レスポンスを作成
    pub fn created(url: impl Into<String>) -> Self {
        Self {
            status: "created".to_string(),
            url: url.into(),
        }
    }
}

/// フィード一覧の1要素（GET /feeds）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedView {
    /// 監視対象URL
    pub url: String,
    /// 最新ステータス
    pub status: FeedStatus,
    /// 直近チェックのレイテンシ
    pub latency_ms: u32,
    /// 最終チェック時刻（RFC 3339、未チェックなら省略）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<String>,
}

impl From<&Feed> for FeedView {
    fn from(feed: &Feed) -> Self {
        Self {
            url: feed.url.clone(),
            status: feed.status,
            latency_ms: feed.latency_ms,
            last_checked: feed
                .last_checked
                .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
        }
    }
}

/// ステータス別集計（GET /metrics）。`unknown` は含まない
pub type MetricsResponse = BTreeMap<FeedStatus, StatusMetrics>;

/// 死活監視レスポンス（GET /health）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    /// 常に "ok"
    pub status: String,
    /// サービス名
    pub service: String,
    /// 常に "good"
    pub health: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            service: SERVICE_NAME.to_string(),
            health: "good".to_string(),
        }
    }
}
