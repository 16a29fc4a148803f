//! Ticker - due タスクを自動で drain するバックグラウンドループ

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::registry::Registry;
use crate::domain::{RosterError, UserId};

/// ホストと [`Ticker`] で共有する Registry
pub type SharedRegistry = Arc<Mutex<Registry>>;

/// Ticker が生存期間中に集計したカウンタ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickerStats {
    /// Ticks that applied at least one task.
    pub drains: u64,
    /// Tasks applied across all drains.
    pub applied: u64,
    /// Ticks rejected with `NothingToDo`.
    pub idle: u64,
    /// Ticks rejected for any other reason.
    pub failed: u64,
}

/// Ticker は一定間隔で due タスクを drain するバックグラウンドの keeper
///
/// - `shutdown_tx` を drop する（または `request_shutdown`）とループが止まる
/// - `shutdown_and_join()` で終了を待ち、カウンタを受け取る
///
/// 実行中の tick は必ず完了する。shutdown は tick と tick の間で見る。
pub struct Ticker {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<TickerStats>,
}

impl Ticker {
    /// `interval` ごとに `caller` として `tick` を呼ぶ ticker を起動
    pub fn spawn(registry: SharedRegistry, caller: UserId, interval: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        // tokio::time::interval は 0 で panic する
        let interval = interval.max(Duration::from_millis(1));
        let join = tokio::spawn(ticker_loop(registry, caller, interval, shutdown_rx));
        Self { shutdown_tx, join }
    }

    pub fn request_shutdown(&self) {
        // receiver may already be gone
        let _ = self.shutdown_tx.send(true);
    }

    pub async fn shutdown_and_join(self) -> TickerStats {
        self.request_shutdown();
        match self.join.await {
            Ok(stats) => stats,
            Err(e) => {
                warn!(error = %e, "ticker task ended abnormally");
                TickerStats::default()
            }
        }
    }
}

async fn ticker_loop(
    registry: SharedRegistry,
    caller: UserId,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) -> TickerStats {
    let mut stats = TickerStats::default();
    let mut timer = tokio::time::interval(interval);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(%caller, interval_ms = interval.as_millis() as u64, "ticker started");
    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() {
                    break; // sender dropped
                }
                continue;
            }
            _ = timer.tick() => {}
        }

        // lock is held only for the synchronous tick, never across an await
        let result = registry.lock().await.tick(&caller);
        match result {
            Ok(report) => {
                stats.drains += 1;
                stats.applied += report.applied.len() as u64;
                debug!(applied = report.applied.len(), "ticker drained tasks");
            }
            Err(RosterError::NothingToDo) => stats.idle += 1,
            Err(e) => {
                stats.failed += 1;
                warn!(error = %e, "ticker tick rejected");
            }
        }
    }
    info!(?stats, "ticker stopped");
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Credits;
    use crate::ports::ManualClock;
    use chrono::{TimeZone, Utc};

    async fn wait_for_count(registry: &SharedRegistry, user: &UserId, expected: Credits) {
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                let count = registry.lock().await.profile(user).map(|p| p.count);
                if count == Some(expected) {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("ticker did not credit in time");
    }

    #[tokio::test]
    async fn ticker_drains_due_tasks() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let registry: SharedRegistry = Arc::new(Mutex::new(
            Registry::builder().clock(clock.clone()).build().unwrap(),
        ));
        let bob = UserId::new("bob");
        registry.lock().await.schedule(&bob, &bob).unwrap();

        let ticker = Ticker::spawn(
            Arc::clone(&registry),
            UserId::new("keeper"),
            Duration::from_millis(5),
        );

        // Not due yet: the ticker only idles.
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(
            registry.lock().await.profile(&bob).unwrap().count,
            Credits::ZERO
        );

        clock.advance(chrono::Duration::seconds(10));
        wait_for_count(&registry, &bob, Credits::new(100)).await;

        let stats = ticker.shutdown_and_join().await;
        assert_eq!(stats.drains, 1);
        assert_eq!(stats.applied, 1);
        assert!(stats.idle >= 1);
        assert_eq!(stats.failed, 0);
        assert!(registry.lock().await.pending(&bob).is_none());
    }

    #[tokio::test]
    async fn shutdown_stops_an_idle_ticker() {
        let registry: SharedRegistry =
            Arc::new(Mutex::new(Registry::builder().build().unwrap()));
        let ticker = Ticker::spawn(registry, UserId::new("keeper"), Duration::from_millis(1));

        let stats = tokio::time::timeout(Duration::from_secs(1), ticker.shutdown_and_join())
            .await
            .unwrap();
        assert_eq!(stats.drains, 0);
    }
}
