//! フィードテーブルのSQLite操作
//!
//! `DATABASE_URL=sqlite:...` での実行とテストで使う。SQLはPostgreSQL版と同じ意味になるように保つ。

use chrono::{DateTime, Utc};
use health_monitor_common::types::{
    Feed, FeedId, FeedStatus, FeedTarget, RegisterOutcome, StatusMetrics,
};
use sqlx::SqlitePool;
use std::collections::BTreeMap;

use super::{to_db_latency, to_db_timestamp, FeedRow, FeedTargetRow, StatusAggregateRow};

/// `feeds` テーブルがなければ作成する
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS feeds (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            url TEXT UNIQUE NOT NULL,
            status VARCHAR(10) NOT NULL DEFAULT 'unknown',
            last_checked TIMESTAMP,
            latency_ms INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// プローブ対象の `(id, url)` 一覧を取得
pub async fn list_feeds(pool: &SqlitePool) -> Result<Vec<FeedTarget>, sqlx::Error> {
    let rows = sqlx::query_as::<_, FeedTargetRow>("SELECT id, url FROM feeds ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// チェック結果を記録
pub async fn record_check(
    pool: &SqlitePool,
    id: FeedId,
    status: FeedStatus,
    checked_at: DateTime<Utc>,
    latency_ms: u32,
) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("UPDATE feeds SET status = ?, last_checked = ?, latency_ms = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(to_db_timestamp(checked_at))
            .bind(to_db_latency(latency_ms))
            .bind(id)
            .execute(pool)
            .await?;

    Ok(result.rows_affected() > 0)
}

/// フィードを登録（同じURLが既にあれば何もしない）
pub async fn register(pool: &SqlitePool, url: &str) -> Result<RegisterOutcome, sqlx::Error> {
    let result = sqlx::query("INSERT INTO feeds (url) VALUES (?) ON CONFLICT (url) DO NOTHING")
        .bind(url)
        .execute(pool)
        .await?;

    Ok(if result.rows_affected() > 0 {
        RegisterOutcome::Created
    } else {
        RegisterOutcome::AlreadyExists
    })
}

/// 全フィードを登録順に取得
pub async fn list_with_status(pool: &SqlitePool) -> Result<Vec<Feed>, sqlx::Error> {
    let rows = sqlx::query_as::<_, FeedRow>(
        r#"
        SELECT id, url, status, last_checked, latency_ms, created_at
        FROM feeds
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// ステータス別の件数と平均レイテンシ（unknownは除外）
pub async fn aggregate_by_status(
    pool: &SqlitePool,
) -> Result<BTreeMap<FeedStatus, StatusMetrics>, sqlx::Error> {
    let rows = sqlx::query_as::<_, StatusAggregateRow>(
        r#"
        SELECT status, COUNT(*) AS count, CAST(AVG(latency_ms) AS REAL) AS avg_latency
        FROM feeds
        WHERE status != 'unknown'
        GROUP BY status
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into_entry()).collect())
}
