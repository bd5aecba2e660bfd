//! Passive periodic refresh scheduling.
//!
//! The refresh re-reads due dates and completion flags; it is never a write.

use chrono::{DateTime, Duration, Utc};

/// Default spacing between time-status refreshes.
pub const DEFAULT_REFRESH_INTERVAL_SECS: i64 = 60;

/// Fixed-interval refresh gate.
#[derive(Debug, Clone)]
pub struct RefreshSchedule {
    interval: Duration,
    last_run: Option<DateTime<Utc>>,
}

impl Default for RefreshSchedule {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_REFRESH_INTERVAL_SECS))
    }
}

impl RefreshSchedule {
    /// Non-positive intervals are raised to one second.
    pub fn new(interval: Duration) -> Self {
        let interval = if interval <= Duration::zero() {
            Duration::seconds(1)
        } else {
            interval
        };
        Self {
            interval,
            last_run: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns whether a refresh should run at `now`.
    ///
    /// A clock that moved backwards also triggers a refresh.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.last_run {
            None => true,
            Some(last) => now < last || now - last >= self.interval,
        }
    }

    pub fn mark_run(&mut self, now: DateTime<Utc>) {
        self.last_run = Some(now);
    }

    /// Next instant at which [`Self::is_due`] turns true; `None` before the
    /// first run or past the end of the calendar.
    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.last_run
            .and_then(|last| last.checked_add_signed(self.interval))
    }
}
