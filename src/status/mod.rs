//! Shutdown status evaluation.
//!
//! Everything here is a pure function of the loaded records and the injected
//! clock; nothing is cached between requests.

use axum::{
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};

use crate::models::{EndedShutdown, OngoingShutdown, ShutdownRecord, StatusSummary};
use crate::store::ShutdownStore;

/// Headers that keep browsers, proxies and CDNs from storing a status answer.
pub const NO_STORE_HEADERS: [(HeaderName, &str); 5] = [
    (
        header::CACHE_CONTROL,
        "no-store, no-cache, must-revalidate, proxy-revalidate",
    ),
    (header::PRAGMA, "no-cache"),
    (header::EXPIRES, "0"),
    (HeaderName::from_static("surrogate-control"), "no-store"),
    (HeaderName::from_static("cdn-cache-control"), "no-store"),
];

/// True when any record lacks an end.
pub fn is_active(records: &[ShutdownRecord]) -> bool {
    records.iter().any(ShutdownRecord::is_ongoing)
}

/// True when the store holds an open record, or a row it could not read
/// that carried no end.
pub fn is_store_active(store: &ShutdownStore) -> bool {
    is_active(store.records()) || !store.unreadable_ongoing().is_empty()
}

/// Empty-bodied answer for uptime monitors: 503 while shut down, 200 otherwise.
pub fn respond(active: bool) -> Response {
    let status = if active {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    (
        status,
        [(header::CONTENT_TYPE, "text/plain")],
        NO_STORE_HEADERS,
    )
        .into_response()
}

/// Source of "now".
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl StatusSummary {
    /// Build the page-facing view of the current state.
    pub fn evaluate(store: &ShutdownStore, now: DateTime<Utc>) -> Self {
        let ongoing = store
            .ongoing()
            .map(|r| OngoingShutdown {
                id: r.id.clone(),
                name: r.name.clone(),
                start: r.start,
                elapsed_days: r.elapsed_days(now),
            })
            .collect();

        let last_ended = store.latest().and_then(|r| {
            Some(EndedShutdown {
                id: r.id.clone(),
                name: r.name.clone(),
                end: r.end?,
                duration_days: r.duration_days(),
            })
        });

        Self {
            down: is_store_active(store),
            checked_at: now,
            ongoing,
            unreadable_ongoing_rows: store.unreadable_ongoing().to_vec(),
            last_ended,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};

    fn ts(raw: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(raw).unwrap()
    }

    fn record(id: &str, end: Option<&str>) -> ShutdownRecord {
        ShutdownRecord {
            id: id.to_string(),
            name: format!("Shutdown {}", id),
            start: ts("2018-12-22T00:01:00-05:00"),
            end: end.map(ts),
            furloughed_estimate: None,
            unpaid_working_estimate: None,
            summary: String::new(),
            sources: Vec::new(),
            duration_days: None,
        }
    }

    #[test]
    fn test_no_records_is_not_active() {
        assert!(!is_active(&[]));
    }

    #[test]
    fn test_all_ended_is_not_active() {
        let records = vec![
            record("a", Some("2019-01-25T12:00:00-05:00")),
            record("b", Some("2019-02-01T00:00:00-05:00")),
        ];
        assert!(!is_active(&records));
    }

    #[test]
    fn test_any_open_record_is_active() {
        let records = vec![
            record("a", Some("2019-01-25T12:00:00-05:00")),
            record("b", None),
            record("c", Some("2019-02-01T00:00:00-05:00")),
        ];
        assert!(is_active(&records));

        let several_open = vec![record("a", None), record("b", None)];
        assert!(is_active(&several_open));
    }

    #[test]
    fn test_packaged_table_is_active() {
        assert!(is_active(ShutdownStore::embedded().records()));
    }

    #[test]
    fn test_amended_table_is_not_active() {
        let mut records = ShutdownStore::embedded().records().to_vec();
        for r in records.iter_mut().filter(|r| r.id == "2025-10") {
            r.end = Some(ts("2025-11-12T23:59:00-05:00"));
        }
        assert!(!is_active(&records));
    }

    #[test]
    fn test_respond_status_codes() {
        assert_eq!(respond(true).status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(respond(false).status(), StatusCode::OK);
    }

    #[test]
    fn test_respond_disables_caching() {
        for active in [true, false] {
            let response = respond(active);
            let headers = response.headers();
            assert_eq!(
                headers[header::CACHE_CONTROL],
                "no-store, no-cache, must-revalidate, proxy-revalidate"
            );
            assert_eq!(headers[header::PRAGMA], "no-cache");
            assert_eq!(headers[header::EXPIRES], "0");
            assert_eq!(headers["surrogate-control"], "no-store");
            assert_eq!(headers["cdn-cache-control"], "no-store");
            assert_eq!(headers[header::CONTENT_TYPE], "text/plain");
        }
    }

    #[test]
    fn test_summary_tracks_clock() {
        let store = ShutdownStore::new(vec![
            record("2018-12", Some("2019-01-25T12:00:00-05:00")),
            ShutdownRecord {
                start: ts("2025-10-01T00:00:00-04:00"),
                ..record("2025-10", None)
            },
        ]);

        let day_two = FixedClock(ts("2025-10-03T04:00:00Z").with_timezone(&Utc));
        let summary = StatusSummary::evaluate(&store, day_two.now());
        assert!(summary.down);
        assert_eq!(summary.ongoing.len(), 1);
        assert_eq!(summary.ongoing[0].id, "2025-10");
        assert_eq!(summary.ongoing[0].elapsed_days, 2.0);

        let last = summary.last_ended.unwrap();
        assert_eq!(last.id, "2018-12");
        assert_eq!(last.duration_days, Some(34.5));

        let day_ten = FixedClock(ts("2025-10-11T04:00:00Z").with_timezone(&Utc));
        let later = StatusSummary::evaluate(&store, day_ten.now());
        assert_eq!(later.ongoing[0].elapsed_days, 10.0);
        assert_eq!(later.checked_at, day_ten.now());
    }

    #[test]
    fn test_summary_of_empty_store() {
        let summary = StatusSummary::evaluate(&ShutdownStore::default(), SystemClock.now());
        assert!(!summary.down);
        assert!(summary.ongoing.is_empty());
        assert!(summary.last_ended.is_none());
    }

    #[test]
    fn test_unreadable_row_without_end_keeps_status_down() {
        let store = ShutdownStore::from_csv(
            "id,name,start,end\n2025-10,Ongoing,2025-10-01 00:01,\n",
        );
        assert!(store.is_empty());
        assert!(!is_active(store.records()));
        assert!(is_store_active(&store));
        assert_eq!(
            respond(is_store_active(&store)).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );

        let summary = StatusSummary::evaluate(&store, SystemClock.now());
        assert!(summary.down);
        assert!(summary.ongoing.is_empty());
        assert_eq!(summary.unreadable_ongoing_rows, vec![1]);
    }

    #[test]
    fn test_store_active_follows_records() {
        assert!(is_store_active(&ShutdownStore::embedded()));
        assert!(!is_store_active(&ShutdownStore::default()));
    }
}
