//! Derived status view served to the human-facing page.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

/// Snapshot of the current shutdown state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub down: bool,
    pub checked_at: DateTime<Utc>,
    pub ongoing: Vec<OngoingShutdown>,
    /// Rows that could not be read but carried no end.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unreadable_ongoing_rows: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_ended: Option<EndedShutdown>,
}

/// A lapse with no recorded end.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OngoingShutdown {
    pub id: String,
    pub name: String,
    pub start: DateTime<FixedOffset>,
    pub elapsed_days: f64,
}

/// The most recently resolved lapse.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndedShutdown {
    pub id: String,
    pub name: String,
    pub end: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<f64>,
}
