//! Health Monitor 共通型定義
//!
//! モニターサービスとテストで共有するデータ型・プロトコル・設定・エラー型

#![warn(missing_docs)]

/// 設定構造体
pub mod config;

/// エラー型
pub mod error;

/// HTTP API のリクエスト/レスポンス型
pub mod protocol;

/// フィード・ステータス等のコアデータ型
pub mod types;
