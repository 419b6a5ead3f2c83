//! ヘルスモニター
//!
//! 取得・フィルタのサイクルを一定間隔で実行し、最新のスナップショットを
//! 1つだけ保持する。読み取り側はロックを取ってコピーするだけで、
//! ネットワークI/Oを待つことはない。

use super::fetcher::TransactionFetcher;
use super::sla::filter_failed_transactions;
use crate::common::{ConfigError, HealthSnapshot, LookbackWindow, MonitorError};
use crate::config::MonitorConfig;
use crate::shutdown::ShutdownController;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, Instrument};

/// 最新スナップショットの所有者
///
/// `Clone` は同じスナップショットを共有するハンドルを返す。
#[derive(Clone)]
pub struct HealthMonitor {
    inner: Arc<Inner>,
}

struct Inner {
    fetcher: TransactionFetcher,
    content_type: String,
    lookback: LookbackWindow,
    sla_window: chrono::Duration,
    check_interval: Duration,
    snapshot: RwLock<HealthSnapshot>,
    started: AtomicBool,
}

impl std::fmt::Debug for HealthMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthMonitor")
            .field("event_reader", &self.inner.fetcher.base_url())
            .field("check_interval", &self.inner.check_interval)
            .finish()
    }
}

impl HealthMonitor {
    /// 設定からモニターを作成
    ///
    /// `fetch_timeout` が設定されていればHTTPクライアントに適用する。
    pub fn new(config: &MonitorConfig) -> Result<Self, ConfigError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.fetch_timeout {
            builder = builder.timeout(timeout);
        }
        Self::with_client(builder.build()?, config)
    }

    /// 既存のHTTPクライアントでモニターを作成
    pub fn with_client(client: Client, config: &MonitorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let sla_window = config.sla_window_duration()?;

        Ok(Self {
            inner: Arc::new(Inner {
                fetcher: TransactionFetcher::new(client, config.event_reader_url.clone()),
                content_type: config.content_type.clone(),
                lookback: config.lookback.clone(),
                sla_window,
                check_interval: config.check_interval,
                snapshot: RwLock::new(HealthSnapshot::unchecked(config.lookback.describe())),
                started: AtomicBool::new(false),
            }),
        })
    }

    /// 現在のスナップショットのコピー
    pub async fn snapshot(&self) -> HealthSnapshot {
        self.inner.snapshot.read().await.clone()
    }

    /// チェック間隔
    pub fn check_interval(&self) -> Duration {
        self.inner.check_interval
    }

    /// 現在時刻を基準に1サイクル分のヘルスを判定する（公開はしない）
    pub async fn determine_health(&self) -> HealthSnapshot {
        self.determine_health_at(Utc::now()).await
    }

    /// 指定時刻を基準に1サイクル分のヘルスを判定する（公開はしない）
    ///
    /// 取得に失敗した場合は失敗リストが空の到達不能スナップショットを返す。
    pub async fn determine_health_at(&self, now: DateTime<Utc>) -> HealthSnapshot {
        let inner = &self.inner;
        let checking_period = inner.lookback.describe();

        match inner
            .fetcher
            .fetch(&inner.content_type, &inner.lookback)
            .await
        {
            Ok(txs) => {
                let received = txs.len();
                let failed = filter_failed_transactions(txs, now, inner.sla_window);
                debug!(
                    received = received,
                    failed = failed.len(),
                    "Health check succeeded"
                );
                HealthSnapshot::reachable(failed, checking_period, now)
            }
            Err(_) => HealthSnapshot::unreachable(checking_period, now),
        }
    }

    /// 1サイクル実行してスナップショットを置き換える
    ///
    /// 取得はロックの外で行い、書き込みロックは置き換えの間だけ保持する。
    pub async fn refresh(&self) -> HealthSnapshot {
        let snapshot = self.determine_health().await;
        self.publish(snapshot.clone()).await;
        snapshot
    }

    async fn publish(&self, snapshot: HealthSnapshot) {
        *self.inner.snapshot.write().await = snapshot;
    }

    /// 監視を開始する
    ///
    /// 最初のサイクルを同期的に実行して公開してから、バックグラウンドで
    /// 定期実行を開始する。停止用のハンドルを返す。
    pub async fn start(&self) -> Result<MonitorHandle, MonitorError> {
        if self.inner.started.swap(true, Ordering::SeqCst) {
            return Err(MonitorError::AlreadyStarted);
        }

        let initial = self.refresh().await;
        info!(
            event_reader = %self.inner.fetcher.base_url(),
            interval_secs = self.inner.check_interval.as_secs_f64(),
            reachable = initial.reachable,
            failures = initial.failure_count(),
            "Health monitor started"
        );

        let stop = ShutdownController::default();
        let monitor = self.clone();
        let signal = stop.clone();
        let task = tokio::spawn(
            async move {
                monitor.monitor_loop(signal).await;
            }
            .instrument(tracing::Span::current()),
        );

        Ok(MonitorHandle { stop, task })
    }

    /// 監視ループ
    async fn monitor_loop(&self, stop: ShutdownController) {
        let period = self.inner.check_interval;
        // 初回は start() で実行済みなので1周期後から
        let mut timer = interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = stop.wait() => {
                    info!("Health monitor stopped");
                    return;
                }
                _ = timer.tick() => {
                    self.refresh().await;
                }
            }
        }
    }
}

/// 定期実行の停止ハンドル
///
/// 停止しても実行中のサイクルは中断されず、その結果は公開される。
#[derive(Debug)]
pub struct MonitorHandle {
    stop: ShutdownController,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// 停止を要求する（待たない）
    pub fn stop(&self) {
        self.stop.request_shutdown();
    }

    /// 停止が要求済みか
    pub fn is_stop_requested(&self) -> bool {
        self.stop.is_shutdown_requested()
    }

    /// 停止を要求し、ループの終了を待つ
    pub async fn shutdown(self) {
        self.stop.request_shutdown();
        if let Err(e) = self.task.await {
            tracing::error!("Health monitor task join error: {}", e);
        }
    }
}
