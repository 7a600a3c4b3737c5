//! Feed Health Monitor Server
//!
//! 登録されたフィードを定期的にプローブし、状態をHTTP APIで公開するサーバー

#![warn(missing_docs)]

/// 共通型定義（health-monitor-commonの再公開）
pub use health_monitor_common as common;

/// REST APIハンドラー
pub mod api;

/// サーバー初期化
pub mod bootstrap;

/// コマンドライン引数・環境変数
pub mod cli;

/// データベースアクセス
pub mod db;

/// ヘルスチェック監視（プローバー・スケジューラ）
pub mod health;

/// ロギング初期化ユーティリティ
pub mod logging;

/// axumサーバー起動
pub mod server;

/// Shutdown controller
pub mod shutdown;

use std::sync::Arc;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// フィードストア（スケジューラ・プローバーと共有）
    pub store: Arc<dyn db::FeedRepository>,
    /// Cooperative shutdown controller
    pub shutdown: shutdown::ShutdownController,
}

impl AppState {
    /// ストアからアプリケーション状態を作成
    pub fn new(store: Arc<dyn db::FeedRepository>) -> Self {
        Self {
            store,
            shutdown: shutdown::ShutdownController::default(),
        }
    }
}
