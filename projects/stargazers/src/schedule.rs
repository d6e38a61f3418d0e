use std::time::Duration;

use chrono::{DateTime, Datelike, TimeZone, Utc, Weekday};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::pipeline::{RunOutcome, StargazersJob};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Fixed interval clock with an optional weekday filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub interval: Duration,
    pub weekdays_only: bool,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            weekdays_only: true,
        }
    }
}

impl Schedule {
    /// Whether a tick at `now` should actually run the job.
    pub fn permits<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        !self.weekdays_only || !matches!(now.weekday(), Weekday::Sat | Weekday::Sun)
    }
}

/// What a bounded [`run_every`] loop did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WatchSummary {
    pub ticks: u64,
    pub off_days: u64,
    pub notified: u64,
    pub skipped: u64,
    pub failed: u64,
}

/// Runs `job` on every tick of `schedule` until `max_ticks` ticks have
/// elapsed, or forever when `max_ticks` is `None`.
///
/// `clock` supplies the timestamp of each tick. A failed run is logged and
/// the loop moves on to the next tick. Runs never overlap and missed ticks
/// are dropped. `schedule.interval` must be non-zero.
pub async fn run_every<C>(
    job: &StargazersJob,
    schedule: &Schedule,
    mut clock: C,
    max_ticks: Option<u64>,
) -> WatchSummary
where
    C: FnMut() -> DateTime<Utc>,
{
    let mut ticker = interval(schedule.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut summary = WatchSummary::default();

    while max_ticks.map_or(true, |max| summary.ticks < max) {
        ticker.tick().await;
        summary.ticks += 1;

        let now = clock();
        if !schedule.permits(&now) {
            debug!(%now, "outside scheduled days, skipping tick");
            summary.off_days += 1;
            continue;
        }

        match job.run_at(now).await {
            Ok(outcome) => {
                match outcome {
                    RunOutcome::Notified { .. } => summary.notified += 1,
                    RunOutcome::Skipped { .. } => summary.skipped += 1,
                }
                info!(repository = %job.repository, stars = outcome.stars(), ?outcome, "scheduled run finished");
            }
            Err(err) => {
                summary.failed += 1;
                error!(repository = %job.repository, error = %err, "scheduled run failed");
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    // 2026-10-12 is a Monday.
    #[rstest]
    #[case(12, true)]
    #[case(13, true)]
    #[case(14, true)]
    #[case(15, true)]
    #[case(16, true)]
    #[case(17, false)]
    #[case(18, false)]
    fn default_schedule_skips_weekends(#[case] day: u32, #[case] permitted: bool) {
        let now = Utc.with_ymd_and_hms(2026, 10, day, 9, 0, 0).unwrap();
        assert_eq!(Schedule::default().permits(&now), permitted);
    }

    #[test]
    fn weekends_allowed_when_filter_disabled() {
        let schedule = Schedule {
            weekdays_only: false,
            ..Schedule::default()
        };
        let saturday = Utc.with_ymd_and_hms(2026, 10, 17, 9, 0, 0).unwrap();
        assert!(schedule.permits(&saturday));
    }
}
