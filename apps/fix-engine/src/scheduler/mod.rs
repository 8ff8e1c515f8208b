//! Weekly job scheduling.
//!
//! Session connect/disconnect, market open/close simulation and the
//! bar-trim job all fire at fixed (day-of-week, time) pairs in UTC.
//! A timer fires once; re-arming for the next week is the handler's
//! responsibility.

use chrono::{Datelike, Duration, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::domain::shared::Timestamp;

/// A weekly wall-clock instant in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyTime {
    /// Day of week.
    pub weekday: Weekday,
    /// Time of day, UTC.
    pub time: NaiveTime,
}

impl WeeklyTime {
    /// The next occurrence strictly after `now`.
    #[must_use]
    pub fn next_after(&self, now: Timestamp) -> Timestamp {
        let now_dt = now.as_datetime();
        let days_ahead = i64::from(
            (self.weekday.num_days_from_monday() + 7 - now_dt.weekday().num_days_from_monday())
                % 7,
        );
        let candidate = (now_dt.date_naive() + Duration::days(days_ahead))
            .and_time(self.time)
            .and_utc();
        if candidate > now_dt {
            Timestamp::new(candidate)
        } else {
            Timestamp::new(candidate + Duration::days(7))
        }
    }
}

/// A cancelable one-shot timer registration.
#[derive(Debug)]
pub struct TimerHandle {
    label: String,
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Arm a timer that runs `job` once at `fire_at`, measured against
    /// the provided `now`. Firing in the past runs immediately.
    pub fn schedule<F>(label: impl Into<String>, now: Timestamp, fire_at: Timestamp, job: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let label = label.into();
        let delay = (fire_at.as_datetime() - now.as_datetime())
            .to_std()
            .unwrap_or_default();
        debug!(label, %fire_at, "arming timer");
        let task_label = label.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!(label = task_label, "timer fired");
            job();
        });
        Self { label, task }
    }

    /// The label this timer was armed with.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Cancel the registration; the job will not run.
    pub fn cancel(self) {
        debug!(label = self.label, "cancelling timer");
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    #[test]
    fn next_after_later_same_day() {
        // 2020-01-06 is a Monday.
        let weekly = WeeklyTime {
            weekday: Weekday::Mon,
            time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
        };
        let next = weekly.next_after(ts("2020-01-06T12:00:00Z"));
        assert_eq!(next, ts("2020-01-06T15:00:00Z"));
    }

    #[test]
    fn next_after_rolls_to_next_week() {
        let weekly = WeeklyTime {
            weekday: Weekday::Mon,
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        };
        let next = weekly.next_after(ts("2020-01-06T12:00:00Z"));
        assert_eq!(next, ts("2020-01-13T09:00:00Z"));
    }

    #[test]
    fn exact_occurrence_rolls_forward() {
        let weekly = WeeklyTime {
            weekday: Weekday::Sun,
            time: NaiveTime::from_hms_opt(0, 1, 0).unwrap(),
        };
        let next = weekly.next_after(ts("2020-01-12T00:01:00Z"));
        assert_eq!(next, ts("2020-01-19T00:01:00Z"));
    }

    #[test]
    fn crosses_into_following_days() {
        let weekly = WeeklyTime {
            weekday: Weekday::Fri,
            time: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
        };
        let next = weekly.next_after(ts("2020-01-06T12:00:00Z")); // Monday
        assert_eq!(next, ts("2020-01-10T22:00:00Z"));
    }

    #[tokio::test(start_paused = true)]
    async fn timer_fires_after_delay() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let now = Timestamp::now();
        let _timer = TimerHandle::schedule(
            "test",
            now,
            now.add(chrono::Duration::seconds(30)),
            move || flag.store(true, Ordering::SeqCst),
        );
        tokio::time::sleep(std::time::Duration::from_secs(31)).await;
        assert!(fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_never_fires() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let now = Timestamp::now();
        let timer = TimerHandle::schedule(
            "test",
            now,
            now.add(chrono::Duration::seconds(30)),
            move || flag.store(true, Ordering::SeqCst),
        );
        timer.cancel();
        tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }
}
