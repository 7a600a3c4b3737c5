//! フィードプローバー
//!
//! 1つのURLにGETを1回送り、到達性とレイテンシからステータスを判定して記録する。

use chrono::{DateTime, Utc};
use health_monitor_common::error::MonitorError;
use health_monitor_common::types::{FeedStatus, FeedTarget};
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::db::FeedRepository;

/// 1回のプローブ結果
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOutcome {
    /// 判定されたステータス
    pub status: FeedStatus,
    /// リクエスト開始から応答クローズまでの時間（ミリ秒）
    pub latency_ms: u32,
    /// HTTPステータスコード（リクエスト失敗時は None）
    pub http_status: Option<u16>,
    /// 完了時刻
    pub checked_at: DateTime<Utc>,
}

/// フィードプローバー
#[derive(Clone)]
pub struct FeedProber {
    store: Arc<dyn FeedRepository>,
    client: Client,
}

impl FeedProber {
    /// 新しいプローバーを作成
    ///
    /// `timeout` は接続から応答までの全体に適用される。
    pub fn new(store: Arc<dyn FeedRepository>, timeout: Duration) -> Result<Self, MonitorError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MonitorError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { store, client })
    }

    /// URLにGETを送りステータスを判定する（永続化はしない）
    pub async fn probe(&self, url: &str) -> ProbeOutcome {
        let start = Instant::now();
        let result = self.client.get(url).send().await;

        // ボディは読まずにレスポンスを破棄した時点までを計測する
        let http_status = match result {
            Ok(response) => {
                let status = response.status().as_u16();
                drop(response);
                Some(status)
            }
            Err(e) => {
                debug!(url = %url, error = %e, "Probe request failed");
                None
            }
        };
        let latency_ms = u32::try_from(start.elapsed().as_millis()).unwrap_or(u32::MAX);

        ProbeOutcome {
            status: FeedStatus::classify(http_status, u64::from(latency_ms)),
            latency_ms,
            http_status,
            checked_at: Utc::now(),
        }
    }

    /// フィードをチェックし、結果をストアへ書き戻す
    ///
    /// 書き込み失敗はログに残すだけで再試行しない。
    pub async fn check_feed(&self, target: &FeedTarget) -> ProbeOutcome {
        let outcome = self.probe(&target.url).await;

        match self
            .store
            .record_check(
                target.id,
                outcome.status,
                outcome.checked_at,
                outcome.latency_ms,
            )
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                warn!(
                    feed_id = target.id,
                    url = %target.url,
                    "Feed disappeared before its check result was recorded"
                );
            }
            Err(e) => {
                error!(
                    feed_id = target.id,
                    url = %target.url,
                    error = %e,
                    "Error updating feed status"
                );
            }
        }

        info!(
            feed_id = target.id,
            url = %target.url,
            status = %outcome.status,
            latency_ms = outcome.latency_ms,
            "Checked feed"
        );

        outcome
    }
}
