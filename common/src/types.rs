//! 共通型定義
//!
//! Feed, FeedStatus, StatusMetrics等のコアデータ型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// フィードID（ストアが採番する）
pub type FeedId = i32;

/// 200 応答でこの値未満なら green
pub const GREEN_LATENCY_THRESHOLD_MS: u64 = 1_000;

/// 200 応答でこの値未満なら yellow（以上は red）
pub const YELLOW_LATENCY_THRESHOLD_MS: u64 = 3_000;

/// フィードの稼働状態
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum FeedStatus {
    /// 未チェック
    #[default]
    Unknown,
    /// 200 かつ 1秒未満
    Green,
    /// 200 かつ 1秒以上3秒未満
    Yellow,
    /// エラー・非200・3秒以上
    Red,
}

impl FeedStatus {
    /// FeedStatusを文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }

    /// プローブ結果からステータスを判定する
    ///
    /// `http_status` が `None` の場合はリクエスト自体が失敗したことを表す。
    ///
    /// | 入力 | 結果 |
    /// |---|---|
    /// | エラー / 200以外 | `Red` |
    /// | 200, < 1000ms | `Green` |
    /// | 200, 1000ms以上 3000ms未満 | `Yellow` |
    /// | 200, 3000ms以上 | `Red` |
    pub fn classify(http_status: Option<u16>, latency_ms: u64) -> Self {
        match http_status {
            Some(200) if latency_ms < GREEN_LATENCY_THRESHOLD_MS => Self::Green,
            Some(200) if latency_ms < YELLOW_LATENCY_THRESHOLD_MS => Self::Yellow,
            _ => Self::Red,
        }
    }
}

impl FromStr for FeedStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "green" => Self::Green,
            "yellow" => Self::Yellow,
            "red" => Self::Red,
            _ => Self::Unknown,
        })
    }
}

impl std::fmt::Display for FeedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 登録済みフィード
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feed {
    /// 一意識別子
    pub id: FeedId,
    /// 監視対象URL（一意）
    pub url: String,
    /// 最新ステータス
    pub status: FeedStatus,
    /// 最終チェック完了時刻（未チェックなら None）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<DateTime<Utc>>,
    /// 直近チェックのレイテンシ（ミリ秒、未チェックなら 0）
    pub latency_ms: u32,
    /// 登録日時
    pub created_at: DateTime<Utc>,
}

/// スケジューラがプローブ対象として扱う `(id, url)` の組
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedTarget {
    /// フィードID
    pub id: FeedId,
    /// 監視対象URL
    pub url: String,
}

/// フィード登録結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// 新規作成
    Created,
    /// 同じURLが既に存在した（何もしない）
    AlreadyExists,
}

/// ステータス別の集計値
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StatusMetrics {
    /// 該当フィード数
    pub count: i64,
    /// latency_ms の算術平均
    pub avg_latency: f64,
}
