//! Due-time evaluation.
//!
//! # Responsibility
//! - Compute remaining duration and urgency for a due timestamp.
//! - Render non-negative remaining time in the compact `d/h/m` policy.
//!
//! # Invariants
//! - `Overdue` iff remaining < 0; `DueSoon` iff 0 <= remaining < 24h.
//! - Minutes truncate; nothing rounds up.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Window below which a pending due date counts as imminent.
pub const DUE_SOON_WINDOW_HOURS: i64 = 24;

/// Urgency classification for a due timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeStatus {
    Overdue,
    DueSoon,
    Normal,
}

impl TimeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::DueSoon => "due-soon",
            Self::Normal => "normal",
        }
    }
}

/// Returns `due - now`.
pub fn remaining(due: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    due - now
}

/// Classifies a remaining duration.
pub fn classify(remaining: Duration) -> TimeStatus {
    if remaining < Duration::zero() {
        TimeStatus::Overdue
    } else if remaining < Duration::hours(DUE_SOON_WINDOW_HOURS) {
        TimeStatus::DueSoon
    } else {
        TimeStatus::Normal
    }
}

/// Classifies `due` against the clock reading `now`.
pub fn time_status(due: DateTime<Utc>, now: DateTime<Utc>) -> TimeStatus {
    classify(remaining(due, now))
}

/// Remaining time split into whole units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemainingParts {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
}

impl RemainingParts {
    /// Splits a duration; `None` when it is negative.
    pub fn from_duration(remaining: Duration) -> Option<Self> {
        if remaining < Duration::zero() {
            return None;
        }
        let total_minutes = remaining.num_minutes();
        Some(Self {
            days: total_minutes / (24 * 60),
            hours: (total_minutes / 60) % 24,
            minutes: total_minutes % 60,
        })
    }
}

impl Display for RemainingParts {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.days > 0 {
            write!(f, "{}d {}h", self.days, self.hours)
        } else if self.hours > 0 {
            write!(f, "{}h {}m", self.hours, self.minutes)
        } else {
            write!(f, "{}m", self.minutes)
        }
    }
}

/// Formats a non-negative remaining duration; `None` for overdue input.
pub fn format_remaining(remaining: Duration) -> Option<String> {
    RemainingParts::from_duration(remaining).map(|parts| parts.to_string())
}
