//! フィードヘルスチェッカー
//!
//! 一定間隔で全フィードを列挙し、フィードごとにプローブタスクを起動する。
//! タスクの完了は待たない。同時実行数はセマフォで制限し、前回のチェックが
//! 終わっていないフィードはそのティックではスキップする。

use health_monitor_common::config::DEFAULT_CHECK_CONCURRENCY;
use health_monitor_common::types::{FeedId, FeedTarget};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use super::prober::FeedProber;
use crate::db::FeedRepository;
use crate::shutdown::ShutdownController;

/// デフォルトのチェック間隔（秒）
const DEFAULT_CHECK_INTERVAL_SECS: u64 = 30;

/// 1ティック分のディスパッチ結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// 新たに起動したプローブ数
    pub dispatched: usize,
    /// 前回のチェックが実行中のためスキップした数
    pub skipped: usize,
}

/// 実行中フィードIDの集合
#[derive(Clone, Default)]
struct InFlight {
    ids: Arc<Mutex<HashSet<FeedId>>>,
}

impl InFlight {
    /// 未登録なら登録してガードを返す。実行中なら None
    fn try_acquire(&self, id: FeedId) -> Option<InFlightGuard> {
        let mut ids = self.ids.lock().unwrap_or_else(|e| e.into_inner());
        if ids.insert(id) {
            Some(InFlightGuard {
                ids: self.ids.clone(),
                id,
            })
        } else {
            None
        }
    }

    fn len(&self) -> usize {
        self.ids.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// Dropで実行中集合から外れる
struct InFlightGuard {
    ids: Arc<Mutex<HashSet<FeedId>>>,
    id: FeedId,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.ids
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.id);
    }
}

/// フィードヘルスチェッカー
#[derive(Clone)]
pub struct FeedHealthChecker {
    store: Arc<dyn FeedRepository>,
    prober: FeedProber,
    check_interval: Duration,
    max_concurrent: usize,
    limiter: Arc<Semaphore>,
    in_flight: InFlight,
}

impl FeedHealthChecker {
    /// 新しいヘルスチェッカーを作成
    pub fn new(store: Arc<dyn FeedRepository>, prober: FeedProber) -> Self {
        Self {
            store,
            prober,
            check_interval: Duration::from_secs(DEFAULT_CHECK_INTERVAL_SECS),
            max_concurrent: DEFAULT_CHECK_CONCURRENCY,
            limiter: Arc::new(Semaphore::new(DEFAULT_CHECK_CONCURRENCY)),
            in_flight: InFlight::default(),
        }
    }

    /// チェック間隔を設定
    pub fn with_interval(mut self, check_interval: Duration) -> Self {
        self.check_interval = check_interval;
        self
    }

    /// 同時プローブ数の上限を設定（0は1として扱う）
    pub fn with_concurrency(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self.limiter = Arc::new(Semaphore::new(self.max_concurrent));
        self
    }

    /// 現在実行中（または実行待ち）のチェック数
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// バックグラウンドで監視を開始
    ///
    /// 最初のチェックは起動直後に行う。`shutdown` が要求されるとループを抜ける。
    pub fn start(self, shutdown: ShutdownController) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.monitor_loop(shutdown).await;
        })
    }

    /// 監視ループ
    async fn monitor_loop(&self, shutdown: ShutdownController) {
        let mut timer = interval(self.check_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            interval_ms = self.check_interval.as_millis() as u64,
            max_concurrent = self.max_concurrent,
            "Feed health checker started"
        );

        loop {
            tokio::select! {
                biased;
                _ = shutdown.wait() => {
                    info!("Feed health checker stopping");
                    break;
                }
                _ = timer.tick() => {
                    if let Err(e) = self.check_all_feeds().await {
                        error!(error = %e, "Error querying feeds");
                    }
                }
            }
        }
    }

    /// 全フィードのチェックを起動する
    ///
    /// プローブの完了は待たずに返る。一覧取得に失敗した場合はエラーを返し、
    /// 何も起動しない。
    pub async fn check_all_feeds(&self) -> Result<TickSummary, sqlx::Error> {
        let targets = self.store.list_feeds().await?;
        let mut summary = TickSummary::default();

        for target in targets {
            match self.in_flight.try_acquire(target.id) {
                Some(guard) => {
                    self.dispatch(target, guard);
                    summary.dispatched += 1;
                }
                None => {
                    debug!(
                        feed_id = target.id,
                        url = %target.url,
                        "Previous check still in flight, skipping"
                    );
                    summary.skipped += 1;
                }
            }
        }

        debug!(
            dispatched = summary.dispatched,
            skipped = summary.skipped,
            "Dispatched feed checks"
        );

        Ok(summary)
    }

    fn dispatch(&self, target: FeedTarget, guard: InFlightGuard) {
        let prober = self.prober.clone();
        let limiter = self.limiter.clone();
        tokio::spawn(async move {
            let _guard = guard;
            let Ok(_permit) = limiter.acquire_owned().await else {
                return;
            };
            prober.check_feed(&target).await;
        });
    }
}
