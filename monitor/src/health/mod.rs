//! ヘルスチェックモニター
//!
//! 定期的にフィードの到達性とレイテンシを監視する

pub mod prober;
pub mod scheduler;

pub use prober::{FeedProber, ProbeOutcome};
pub use scheduler::{FeedHealthChecker, TickSummary};
