//! Shutdown record model.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// One historical or ongoing lapse in federal appropriations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShutdownRecord {
    pub id: String,
    pub name: String,
    pub start: DateTime<FixedOffset>,
    /// `None` while the lapse is ongoing.
    pub end: Option<DateTime<FixedOffset>>,
    pub furloughed_estimate: Option<f64>,
    pub unpaid_working_estimate: Option<f64>,
    pub summary: String,
    pub sources: Vec<String>,
    pub duration_days: Option<f64>,
}

impl ShutdownRecord {
    pub fn is_ongoing(&self) -> bool {
        self.end.is_none()
    }

    /// Recorded duration, or one derived from `end - start` when the table
    /// leaves it blank. Ongoing records have no duration.
    pub fn duration_days(&self) -> Option<f64> {
        let end = self.end?;
        self.duration_days
            .or_else(|| Some(days_between(self.start.with_timezone(&Utc), end.with_timezone(&Utc))))
    }

    /// Days elapsed between `start` and `now`, clamped at zero.
    pub fn elapsed_days(&self, now: DateTime<Utc>) -> f64 {
        days_between(self.start.with_timezone(&Utc), now).max(0.0)
    }
}

fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let days = (to - from).num_seconds() as f64 / SECONDS_PER_DAY;
    (days * 100.0).round() / 100.0
}
