//! フィードテーブルのPostgreSQL操作

use chrono::{DateTime, Utc};
use health_monitor_common::types::{
    Feed, FeedId, FeedStatus, FeedTarget, RegisterOutcome, StatusMetrics,
};
use sqlx::PgPool;
use std::collections::BTreeMap;

use super::{to_db_latency, to_db_timestamp, FeedRow, FeedTargetRow, StatusAggregateRow};

/// `feeds` テーブルがなければ作成する
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS feeds (
            id SERIAL PRIMARY KEY,
            url TEXT UNIQUE NOT NULL,
            status VARCHAR(10) NOT NULL DEFAULT 'unknown',
            last_checked TIMESTAMP,
            latency_ms INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// プローブ対象の `(id, url)` 一覧を取得
pub async fn list_feeds(pool: &PgPool) -> Result<Vec<FeedTarget>, sqlx::Error> {
    let rows = sqlx::query_as::<_, FeedTargetRow>("SELECT id, url FROM feeds ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// チェック結果を記録
///
/// status, last_checked, latency_ms は単一のUPDATEでまとめて更新する。
pub async fn record_check(
    pool: &PgPool,
    id: FeedId,
    status: FeedStatus,
    checked_at: DateTime<Utc>,
    latency_ms: u32,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE feeds SET status = $1, last_checked = $2, latency_ms = $3 WHERE id = $4",
    )
    .bind(status.as_str())
    .bind(to_db_timestamp(checked_at))
    .bind(to_db_latency(latency_ms))
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// フィードを登録（同じURLが既にあれば何もしない）
pub async fn register(pool: &PgPool, url: &str) -> Result<RegisterOutcome, sqlx::Error> {
    let result = sqlx::query("INSERT INTO feeds (url) VALUES ($1) ON CONFLICT (url) DO NOTHING")
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
pub async fn list_with_status(pool: &PgPool) -> Result<Vec<Feed>, sqlx::Error> {
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
    pool: &PgPool,
) -> Result<BTreeMap<FeedStatus, StatusMetrics>, sqlx::Error> {
    // AVG(integer) は numeric を返すため float8 にキャストする
    let rows = sqlx::query_as::<_, StatusAggregateRow>(
        r#"
        SELECT status, COUNT(*) AS count, AVG(latency_ms)::float8 AS avg_latency
        FROM feeds
        WHERE status != 'unknown'
        GROUP BY status
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into_entry()).collect())
}
