//! Repository traitパターン定義
//!
//! DB操作を抽象化し、スケジューラ・プローバー・APIへ同じハンドルを注入する。
//! 各traitメソッドは `postgres` / `sqlite` のフリー関数に対応する。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use health_monitor_common::types::{
    Feed, FeedId, FeedStatus, FeedTarget, RegisterOutcome, StatusMetrics,
};
use sqlx::{PgPool, SqlitePool};
use std::collections::BTreeMap;

use super::{postgres, sqlite};

/// フィード操作のRepository trait
#[async_trait]
pub trait FeedRepository: Send + Sync {
    /// `feeds` テーブルを（なければ）作成
    async fn ensure_schema(&self) -> Result<(), sqlx::Error>;
    /// プローブ対象の `(id, url)` 一覧を取得
    async fn list_feeds(&self) -> Result<Vec<FeedTarget>, sqlx::Error>;
    /// チェック結果を記録。該当行があれば true
    async fn record_check(
        &self,
        id: FeedId,
        status: FeedStatus,
        checked_at: DateTime<Utc>,
        latency_ms: u32,
    ) -> Result<bool, sqlx::Error>;
    /// フィードを登録（冪等）
    async fn register(&self, url: &str) -> Result<RegisterOutcome, sqlx::Error>;
    /// 全フィードを登録順に取得
    async fn list_with_status(&self) -> Result<Vec<Feed>, sqlx::Error>;
    /// ステータス別の件数と平均レイテンシ（unknownは除外）
    async fn aggregate_by_status(&self)
        -> Result<BTreeMap<FeedStatus, StatusMetrics>, sqlx::Error>;
}

// ---------------------------------------------------------------------------
// PgPool implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl FeedRepository for PgPool {
    async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        postgres::ensure_schema(self).await
    }

    async fn list_feeds(&self) -> Result<Vec<FeedTarget>, sqlx::Error> {
        postgres::list_feeds(self).await
    }

    async fn record_check(
        &self,
        id: FeedId,
        status: FeedStatus,
        checked_at: DateTime<Utc>,
        latency_ms: u32,
    ) -> Result<bool, sqlx::Error> {
        postgres::record_check(self, id, status, checked_at, latency_ms).await
    }

    async fn register(&self, url: &str) -> Result<RegisterOutcome, sqlx::Error> {
        postgres::register(self, url).await
    }

    async fn list_with_status(&self) -> Result<Vec<Feed>, sqlx::Error> {
        postgres::list_with_status(self).await
    }

    async fn aggregate_by_status(
        &self,
    ) -> Result<BTreeMap<FeedStatus, StatusMetrics>, sqlx::Error> {
        postgres::aggregate_by_status(self).await
    }
}

// ---------------------------------------------------------------------------
// SqlitePool implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl FeedRepository for SqlitePool {
    async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        sqlite::ensure_schema(self).await
    }

    async fn list_feeds(&self) -> Result<Vec<FeedTarget>, sqlx::Error> {
        sqlite::list_feeds(self).await
    }

    async fn record_check(
        &self,
        id: FeedId,
        status: FeedStatus,
        checked_at: DateTime<Utc>,
        latency_ms: u32,
    ) -> Result<bool, sqlx::Error> {
        sqlite::record_check(self, id, status, checked_at, latency_ms).await
    }

    async fn register(&self, url: &str) -> Result<RegisterOutcome, sqlx::Error> {
        sqlite::register(self, url).await
    }

    async fn list_with_status(&self) -> Result<Vec<Feed>, sqlx::Error> {
        sqlite::list_with_status(self).await
    }

    async fn aggregate_by_status(
        &self,
    ) -> Result<BTreeMap<FeedStatus, StatusMetrics>, sqlx::Error> {
        sqlite::aggregate_by_status(self).await
    }
}
