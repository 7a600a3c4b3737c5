//! ロギング初期化ユーティリティ
//!
//! 標準出力に加え、`LOG_DIR` が設定されていれば日次ローテーションのファイルにも出力する。

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` 未設定時のフィルタ
const DEFAULT_FILTER: &str = "info,sqlx=warn,hyper=warn";

/// ログファイル名の接頭辞
const LOG_FILE_PREFIX: &str = "health-monitor.log";

/// tracing サブスクライバを初期化する
///
/// 返された `WorkerGuard` はプロセス終了まで保持すること（破棄するとファイル出力が止まる）。
pub fn init() -> Result<Option<WorkerGuard>, Box<dyn std::error::Error + Send + Sync>> {
    let filter = build_filter(std::env::var("RUST_LOG").ok().as_deref());
    let stdout_layer = fmt::layer().with_target(true);

    match log_dir() {
        Some(dir) => {
            std::fs::create_dir_all(&dir)?;
            let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::layer().with_ansi(false).with_writer(writer);

            tracing_subscriber::registry()
                .with(filter)
                .with(stdout_layer)
                .with(file_layer)
                .try_init()?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stdout_layer)
                .try_init()?;
            Ok(None)
        }
    }
}

fn build_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

fn log_dir() -> Option<String> {
    std::env::var("LOG_DIR")
        .ok()
        .filter(|dir| !dir.trim().is_empty())
}
