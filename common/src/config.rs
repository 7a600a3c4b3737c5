//! 設定管理
//!
//! MonitorConfig, DatabaseConfig等の設定構造体

use std::time::Duration;

use crate::error::{CommonError, CommonResult};

/// デフォルトのチェック間隔
pub const DEFAULT_CHECK_INTERVAL: &str = "30s";

/// デフォルトのプローブタイムアウト
pub const DEFAULT_CHECK_TIMEOUT: &str = "10s";

/// デフォルトの同時プローブ上限
pub const DEFAULT_CHECK_CONCURRENCY: usize = 32;

/// PostgreSQL接続設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// 接続URL。指定時は個別設定より優先する
    pub url: Option<String>,
    /// ホスト (デフォルト: "postgres")
    pub host: String,
    /// ユーザー (デフォルト: "postgres")
    pub user: String,
    /// パスワード (デフォルト: "postgres")
    pub password: String,
    /// データベース名 (デフォルト: "feeds")
    pub name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "postgres".to_string(),
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            name: "feeds".to_string(),
        }
    }
}

/// モニター設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// バインドするホスト (デフォルト: "0.0.0.0")
    pub host: String,
    /// ポート番号 (デフォルト: 8080)
    pub port: u16,
    /// ヘルスチェック間隔 (デフォルト: 30秒)
    pub check_interval: Duration,
    /// 1回のプローブのタイムアウト (デフォルト: 10秒)
    pub check_timeout: Duration,
    /// 同時に実行するプローブの上限 (デフォルト: 32)
    pub check_concurrency: usize,
    /// データベース接続設定
    pub database: DatabaseConfig,
}

impl MonitorConfig {
    /// `host:port` 形式のバインドアドレス
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            check_interval: Duration::from_secs(30),
            check_timeout: Duration::from_secs(10),
            check_concurrency: DEFAULT_CHECK_CONCURRENCY,
            database: DatabaseConfig::default(),
        }
    }
}

/// "500ms", "30s", "1m30s", "1h" 形式の期間文字列を解釈する
///
/// ゼロ長の期間はタイマーに使えないため拒否する。
pub fn parse_duration(value: &str) -> CommonResult<Duration> {
    let duration = humantime::parse_duration(value.trim())
        .map_err(|e| CommonError::Config(format!("invalid duration '{}': {}", value, e)))?;
    if duration.is_zero() {
        return Err(CommonError::Config(format!(
            "duration must be greater than zero: '{}'",
            value
        )));
    }
    Ok(duration)
}
