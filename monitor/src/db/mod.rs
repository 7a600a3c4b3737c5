//! データベースアクセス層
//!
//! フィードテーブルへの永続化。本番はPostgreSQL。`DATABASE_URL` が `sqlite:` で始まる場合と
//! テストではSQLiteを使う。

use chrono::{DateTime, NaiveDateTime, Utc};
use health_monitor_common::config::DatabaseConfig;
use health_monitor_common::types::{Feed, FeedStatus, FeedTarget, StatusMetrics};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{PgPool, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

/// PostgreSQL実装
pub mod postgres;

/// SQLite実装
pub mod sqlite;

/// Repository traitパターン（テスタビリティ向上）
pub mod traits;

pub use traits::FeedRepository;

/// PostgreSQLプールの最大接続数
const PG_MAX_CONNECTIONS: u32 = 10;

/// SQLiteプールの最大接続数（ファイルDB）
const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// 設定に応じたフィードストアを作成する
///
/// `url` が `sqlite:` で始まればSQLite、それ以外はPostgreSQL。
pub async fn create_store(
    config: &DatabaseConfig,
) -> Result<Arc<dyn FeedRepository>, sqlx::Error> {
    match config.url.as_deref() {
        Some(url) if is_sqlite_url(url) => Ok(Arc::new(create_sqlite_pool(url).await?)),
        _ => Ok(Arc::new(create_pg_pool(config).await?)),
    }
}

fn is_sqlite_url(url: &str) -> bool {
    url.trim_start().starts_with("sqlite:")
}

/// SQLite接続プールを作成する
///
/// ファイルがなければ作成する。インメモリDBは接続ごとに別DBになるため1接続に固定する。
pub async fn create_sqlite_pool(url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let max_connections = if url.contains(":memory:") || url.contains("mode=memory") {
        1
    } else {
        SQLITE_MAX_CONNECTIONS
    };

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

/// PostgreSQL接続プールを作成する
///
/// `url` が設定されていればそのまま使い、なければ個別設定から
/// `sslmode=disable` の接続オプションを組み立てる。
pub async fn create_pg_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let options = match config.url.as_deref() {
        Some(url) => PgConnectOptions::from_str(url)?,
        None => PgConnectOptions::new()
            .host(&config.host)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name)
            .ssl_mode(PgSslMode::Disable),
    };

    PgPoolOptions::new()
        .max_connections(PG_MAX_CONNECTIONS)
        .connect_with(options)
        .await
}

/// `feeds` テーブルの1行
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct FeedRow {
    pub id: i32,
    pub url: String,
    pub status: String,
    pub last_checked: Option<NaiveDateTime>,
    pub latency_ms: i32,
    pub created_at: NaiveDateTime,
}

impl From<FeedRow> for Feed {
    fn from(row: FeedRow) -> Self {
        Feed {
            id: row.id,
            url: row.url,
            status: FeedStatus::from_str(&row.status).unwrap_or_default(),
            last_checked: row.last_checked.map(|dt| dt.and_utc()),
            latency_ms: row.latency_ms.max(0) as u32,
            created_at: row.created_at.and_utc(),
        }
    }
}

/// `SELECT id, url` の1行
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct FeedTargetRow {
    pub id: i32,
    pub url: String,
}

impl From<FeedTargetRow> for FeedTarget {
    fn from(row: FeedTargetRow) -> Self {
        FeedTarget {
            id: row.id,
            url: row.url,
        }
    }
}

/// ステータス別集計の1行
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct StatusAggregateRow {
    pub status: String,
    pub count: i64,
    pub avg_latency: f64,
}

impl StatusAggregateRow {
    pub(crate) fn into_entry(self) -> (FeedStatus, StatusMetrics) {
        (
            FeedStatus::from_str(&self.status).unwrap_or_default(),
            StatusMetrics {
                count: self.count,
                avg_latency: self.avg_latency,
            },
        )
    }
}

/// 時刻はタイムゾーンなしのUTC壁時計として保存する
pub(crate) fn to_db_timestamp(at: DateTime<Utc>) -> NaiveDateTime {
    at.naive_utc()
}

/// レイテンシをINTEGER列に収まる値に丸める
pub(crate) fn to_db_latency(latency_ms: u32) -> i32 {
    i32::try_from(latency_ms).unwrap_or(i32::MAX)
}
