//! CompletionLoop - 期限切れキャンペーンの定期完了
//!
//! # フロー
//! 1. Schedule から次の実行までの待ち時間を計算
//! 2. shutdown と sleep を select で競合させる
//! 3. 起きたら CampaignService::complete_expired() を実行
//!
//! 実行中のジョブは shutdown で中断しません。select の外で走らせるので、
//! shutdown_and_join() は進行中の一回分が終わってから戻ります。

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::app::service::CampaignService;
use crate::ports::Clock;

/// When the completion job fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Once a day at the given UTC wall-clock time.
    DailyAt(NaiveTime),
    /// Fixed period between runs.
    Every(Duration),
}

impl Default for Schedule {
    /// Daily at 00:00 UTC.
    fn default() -> Self {
        Schedule::DailyAt(NaiveTime::MIN)
    }
}

impl Schedule {
    /// Time to wait from `now` until the next run.
    ///
    /// A daily schedule always waits for the next occurrence strictly after
    /// `now`, so a run that finishes at exactly 00:00 does not fire twice.
    pub fn next_delay(&self, now: DateTime<Utc>) -> Duration {
        match *self {
            Schedule::Every(period) => period,
            Schedule::DailyAt(at) => {
                let today = now.date_naive().and_time(at).and_utc();
                let next = if today > now {
                    today
                } else {
                    today + chrono::Duration::days(1)
                };
                (next - now).to_std().unwrap_or(Duration::ZERO)
            }
        }
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schedule::DailyAt(at) => write!(f, "daily at {} UTC", at.format("%H:%M")),
            Schedule::Every(period) => write!(f, "every {}s", period.as_secs_f64()),
        }
    }
}

/// Handle for the background completion task.
pub struct CompletionLoop {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl CompletionLoop {
    pub fn spawn(service: Arc<CampaignService>, clock: Arc<dyn Clock>, schedule: Schedule) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let join = tokio::spawn(completion_loop(service, clock, schedule, shutdown_rx));
        Self { shutdown_tx, join }
    }

    /// Stop scheduling new runs. A run already in progress finishes.
    pub fn request_shutdown(&self) {
        // receiver may already be gone
        let _ = self.shutdown_tx.send(true);
    }

    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        let _ = self.join.await;
    }
}

async fn completion_loop(
    service: Arc<CampaignService>,
    clock: Arc<dyn Clock>,
    schedule: Schedule,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    info!(%schedule, "completion scheduler started");
    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        let delay = schedule.next_delay(clock.now());
        tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                continue;
            }
            _ = tokio::time::sleep(delay) => {}
        }

        let report = service.complete_expired().await;
        debug!(
            completed = report.completed.len(),
            ok = report.is_ok(),
            "completion run finished"
        );
    }
    info!("completion scheduler stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppBuilder;
    use crate::domain::{CampaignId, CampaignStatus, Category, NewCampaign, OwnerId};
    use crate::impls::{BrokerConfig, InMemoryCampaignRepository, InMemoryEventBus};
    use crate::ports::{CampaignRepository, FixedClock};
    use chrono::TimeZone;
    use rstest::rstest;
    use ulid::Ulid;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 20, h, m, s).unwrap()
    }

    #[rstest]
    #[case::just_before_midnight(at(23, 59, 0), 60)]
    #[case::exactly_midnight(at(0, 0, 0), 24 * 60 * 60)]
    #[case::morning(at(6, 0, 0), 18 * 60 * 60)]
    fn daily_schedule_waits_for_next_midnight(#[case] now: DateTime<Utc>, #[case] secs: u64) {
        assert_eq!(Schedule::default().next_delay(now), Duration::from_secs(secs));
    }

    #[test]
    fn daily_schedule_at_custom_time_fires_same_day_when_still_ahead() {
        let schedule = Schedule::DailyAt(NaiveTime::from_hms_opt(3, 30, 0).unwrap());
        assert_eq!(schedule.next_delay(at(3, 0, 0)), Duration::from_secs(30 * 60));
    }

    #[test]
    fn fixed_period_ignores_wall_clock() {
        let schedule = Schedule::Every(Duration::from_secs(5));
        assert_eq!(schedule.next_delay(at(12, 0, 0)), Duration::from_secs(5));
    }

    #[test]
    fn schedule_display() {
        assert_eq!(Schedule::default().to_string(), "daily at 00:00 UTC");
        assert_eq!(Schedule::Every(Duration::from_secs(2)).to_string(), "every 2s");
    }

    #[tokio::test]
    async fn loop_completes_expired_campaigns_then_shuts_down() {
        let clock = FixedClock::new(at(10, 0, 0));
        let shared: Arc<dyn Clock> = Arc::new(clock.clone());
        let repo = Arc::new(InMemoryCampaignRepository::new(Arc::clone(&shared)));
        let bus = Arc::new(InMemoryEventBus::connect(BrokerConfig::default()).unwrap());
        let service = Arc::new(
            AppBuilder::new()
                .repository(repo.clone())
                .publisher(bus)
                .clock(Arc::clone(&shared))
                .build()
                .unwrap(),
        );

        let stored = repo
            .create(NewCampaign {
                id: CampaignId::from_ulid(Ulid::new()),
                owner_id: OwnerId::new(5),
                title: "Flood relief".into(),
                description: String::new(),
                target_amount: 500,
                min_donation: 5,
                deadline: at(11, 0, 0),
                category: Category::DisasterRelief,
            })
            .await
            .unwrap();
        clock.advance(chrono::Duration::hours(2));

        let handle = CompletionLoop::spawn(service, shared, Schedule::Every(Duration::from_millis(10)));
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.shutdown_and_join().await;

        let after = repo.get_by_id(stored.id).await.unwrap();
        assert_eq!(after.status, CampaignStatus::Completed);
        assert_eq!(after.updated_at, at(12, 0, 0));
    }

    #[tokio::test]
    async fn shutdown_interrupts_a_long_wait() {
        let shared: Arc<dyn Clock> = Arc::new(FixedClock::new(at(0, 0, 1)));
        let repo = Arc::new(InMemoryCampaignRepository::new(Arc::clone(&shared)));
        let bus = Arc::new(InMemoryEventBus::connect(BrokerConfig::default()).unwrap());
        let service = Arc::new(
            AppBuilder::new()
                .repository(repo)
                .publisher(bus)
                .clock(Arc::clone(&shared))
                .build()
                .unwrap(),
        );

        let handle = CompletionLoop::spawn(service, shared, Schedule::default());
        tokio::time::timeout(Duration::from_secs(1), handle.shutdown_and_join())
            .await
            .expect("scheduler should stop promptly");
    }
}
