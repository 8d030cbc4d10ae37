//! Shutdown record store.
//!
//! The packaged CSV table is the single source of truth. It is compiled into
//! the binary and may be overridden by a data file read once at startup.

pub mod tabular;

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use crate::errors::AppError;
use crate::models::ShutdownRecord;
use tabular::Row;

/// The packaged shutdown table.
pub const EMBEDDED_CSV: &str = include_str!("../../data/shutdowns.csv");

// Canonical column names first, then the legacy names of the original data file.
const ID: &[&str] = &["id", "shutdown_id"];
const NAME: &[&str] = &["name"];
const START: &[&str] = &["start", "start_datetime_et"];
const END: &[&str] = &["end", "end_datetime_et"];
const FURLOUGHED: &[&str] = &["furloughedEstimate", "employees_furloughed_total_est"];
const UNPAID_WORKING: &[&str] = &[
    "unpaidWorkingEstimate",
    "employees_working_unpaid_total_est",
];
const SUMMARY: &[&str] = &["summary", "agencies_summary"];
const SOURCES: &[&str] = &["sources"];
const DURATION: &[&str] = &["durationDays", "duration_days"];

/// Immutable, ordered collection of shutdown records.
#[derive(Debug, Clone, Default)]
pub struct ShutdownStore {
    records: Vec<ShutdownRecord>,
    /// Row numbers that were rejected but carried no end.
    unreadable_ongoing: Vec<usize>,
}

impl ShutdownStore {
    pub fn new(records: Vec<ShutdownRecord>) -> Self {
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.id.as_str()) {
                tracing::warn!("Duplicate shutdown id {:?}", record.id);
            }
        }

        let ongoing: Vec<&str> = records
            .iter()
            .filter(|r| r.is_ongoing())
            .map(|r| r.id.as_str())
            .collect();
        if ongoing.len() > 1 {
            tracing::warn!("More than one ongoing shutdown recorded: {:?}", ongoing);
        }

        Self {
            records,
            unreadable_ongoing: Vec::new(),
        }
    }

    /// The store built from the packaged table.
    pub fn embedded() -> Self {
        Self::from_csv(EMBEDDED_CSV)
    }

    /// Load from `path`, or fall back to the packaged table when none is given.
    ///
    /// Files ending in `.json` are read as a structured literal; anything
    /// else is read as a table.
    pub async fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let Some(path) = path else {
            return Ok(Self::embedded());
        };

        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::Data(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&text)
        } else {
            Ok(Self::from_csv(&text))
        }
    }

    /// Build from a header-led comma-separated table.
    pub fn from_csv(text: &str) -> Self {
        Self::from_rows(tabular::parse(text))
    }

    /// Build from a JSON array of record objects.
    ///
    /// Values may be strings, numbers or null; string arrays are accepted for
    /// `sources`. Blank input is an empty store.
    pub fn from_json(text: &str) -> Result<Self, AppError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        let objects: Vec<serde_json::Map<String, Value>> = serde_json::from_str(text)?;
        let rows = objects
            .into_iter()
            .enumerate()
            .map(|(i, object)| {
                let fields = object
                    .into_iter()
                    .filter_map(|(key, value)| json_cell(value).map(|cell| (key, cell)));
                Row::new(i + 1, fields)
            })
            .collect();

        Ok(Self::from_rows(rows))
    }

    // A rejected row without an end still signals an ongoing lapse.
    fn from_rows(rows: Vec<Row>) -> Self {
        let mut records = Vec::new();
        let mut unreadable_ongoing = Vec::new();

        for row in rows.iter().filter(|row| !row.is_blank()) {
            match record_from_row(row) {
                Ok(record) => records.push(record),
                Err(e) if row.get(END).is_none() => {
                    tracing::warn!(
                        "Shutdown row {} is unreadable ({}) but has no end; counting it as ongoing",
                        row.number,
                        e
                    );
                    unreadable_ongoing.push(row.number);
                }
                Err(e) => tracing::warn!("Skipping shutdown row {}: {}", row.number, e),
            }
        }

        Self {
            unreadable_ongoing,
            ..Self::new(records)
        }
    }

    pub fn records(&self) -> &[ShutdownRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&ShutdownRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn ongoing(&self) -> impl Iterator<Item = &ShutdownRecord> {
        self.records.iter().filter(|r| r.is_ongoing())
    }

    /// Rows that could not be read but had no end.
    pub fn unreadable_ongoing(&self) -> &[usize] {
        &self.unreadable_ongoing
    }

    /// The resolved record with the latest end.
    pub fn latest(&self) -> Option<&ShutdownRecord> {
        self.records
            .iter()
            .filter_map(|r| r.end.map(|end| (end, r)))
            .max_by_key(|(end, _)| *end)
            .map(|(_, r)| r)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Why a row could not become a record.
#[derive(Debug, PartialEq)]
pub enum RowError {
    MissingId,
    MissingStart,
    InvalidStart(String),
    InvalidEnd(String),
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowError::MissingId => write!(f, "missing id"),
            RowError::MissingStart => write!(f, "missing start"),
            RowError::InvalidStart(raw) => write!(f, "unparseable start {:?}", raw),
            RowError::InvalidEnd(raw) => write!(f, "unparseable end {:?}", raw),
        }
    }
}

impl std::error::Error for RowError {}

/// Convert one row into a record.
///
/// A blank or missing `end` means ongoing. A non-blank `end` that does not
/// parse rejects the row so it is never mistaken for an ongoing lapse.
pub fn record_from_row(row: &Row) -> Result<ShutdownRecord, RowError> {
    let id = row.get(ID).ok_or(RowError::MissingId)?.to_string();

    let raw_start = row.get(START).ok_or(RowError::MissingStart)?;
    let start =
        parse_timestamp(raw_start).ok_or_else(|| RowError::InvalidStart(raw_start.to_string()))?;

    if !row.has(END) {
        tracing::debug!("Shutdown {} has no end column; treating as ongoing", id);
    }
    let end = match row.get(END) {
        Some(raw) => {
            Some(parse_timestamp(raw).ok_or_else(|| RowError::InvalidEnd(raw.to_string()))?)
        }
        None => None,
    };
    if let Some(end) = end {
        if end <= start {
            tracing::warn!("Shutdown {} ends at or before its start", id);
        }
    }

    Ok(ShutdownRecord {
        name: row.get(NAME).unwrap_or_default().to_string(),
        start,
        end,
        furloughed_estimate: parse_number(row, FURLOUGHED, &id),
        unpaid_working_estimate: parse_number(row, UNPAID_WORKING, &id),
        summary: row.get(SUMMARY).unwrap_or_default().to_string(),
        sources: row
            .get(SOURCES)
            .map(|raw| {
                raw.split(';')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default(),
        duration_days: parse_number(row, DURATION, &id),
        id,
    })
}

fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw).ok()
}

fn parse_number(row: &Row, names: &[&str], id: &str) -> Option<f64> {
    let raw = row.get(names)?;
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(n),
        _ => {
            tracing::warn!("Shutdown {}: ignoring non-numeric {} {:?}", id, names[0], raw);
            None
        }
    }
}

fn json_cell(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(json_cell)
                .collect::<Vec<_>>()
                .join(";"),
        ),
        Value::Object(_) => None,
    }
}
