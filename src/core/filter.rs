// Pickup Tracker - core/filter.rs
//
// Two filters over records:
//   - `FilterRules`: the import-time business rules. Rows failing them are
//     dropped for good.
//   - `DayWindow`: the view-time "days to show" window. It hides records
//     without removing them, so changing it never needs a re-import.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::Record;
use crate::util::constants;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

/// Business rules a normalised record must satisfy to be kept.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterRules {
    /// Exact service type to keep.
    pub service_type: String,

    /// Exact last-event values to keep.
    pub allowed_events: HashSet<String>,
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            service_type: constants::DEFAULT_SERVICE_TYPE.to_string(),
            allowed_events: constants::DEFAULT_ALLOWED_EVENTS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

impl FilterRules {
    /// True iff the record has a reference and a decoded date, carries the
    /// configured service type, and its last event is allowed.
    pub fn passes(&self, record: &Record) -> bool {
        !record.reference.is_empty()
            && record.last_event_date.is_some()
            && record.service_type == self.service_type
            && self.allowed_events.contains(&record.last_event)
    }

    /// Keep only passing records, preserving order.
    pub fn apply(&self, records: Vec<Record>) -> Vec<Record> {
        records.into_iter().filter(|r| self.passes(r)).collect()
    }
}

// =============================================================================
// Day window
// =============================================================================

/// How far back from "now" records stay visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayWindow {
    #[default]
    All,
    /// Last N days (N >= 1).
    Days(u32),
}

impl DayWindow {
    /// Build from a day count; zero means no window.
    pub fn from_days(days: u32) -> Self {
        if days == 0 {
            DayWindow::All
        } else {
            DayWindow::Days(days)
        }
    }

    /// Day count, zero for `All`.
    pub fn days(&self) -> u32 {
        match self {
            DayWindow::All => 0,
            DayWindow::Days(n) => *n,
        }
    }

    /// Selector label.
    pub fn label(&self) -> String {
        match self {
            DayWindow::All => "All dates".to_string(),
            DayWindow::Days(1) => "Last day".to_string(),
            DayWindow::Days(n) => format!("Last {n} days"),
        }
    }

    /// Earliest visible instant, or `None` when everything is visible.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            DayWindow::All => None,
            DayWindow::Days(n) => {
                now.checked_sub_signed(Duration::seconds(i64::from(*n) * constants::SECONDS_PER_DAY))
            }
        }
    }

    /// True if the record is inside the window.
    ///
    /// Records without a parseable date are only visible with `All`.
    pub fn contains(&self, record: &Record, now: DateTime<Utc>) -> bool {
        match self.cutoff(now) {
            None => true,
            Some(cutoff) => matches!(record.event_instant(), Some(ts) if ts >= cutoff),
        }
    }
}

/// Indices of the records visible under `window`, in record order.
///
/// Returns indices rather than copies so the table and exporters can work
/// off the one owned record set.
pub fn visible_indices(records: &[Record], window: DayWindow, now: DateTime<Utc>) -> Vec<usize> {
    if window == DayWindow::All {
        return (0..records.len()).collect();
    }

    records
        .iter()
        .enumerate()
        .filter(|(_, record)| window.contains(record, now))
        .map(|(idx, _)| idx)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Status;
    use chrono::TimeZone;

    fn make_record(reference: &str, event: &str, service: &str, date: Option<&str>) -> Record {
        Record {
            reference: reference.to_string(),
            last_event: event.to_string(),
            last_event_date: date.map(str::to_string),
            service_type: service.to_string(),
            invoice_value: "R$\u{a0}0,00".to_string(),
            status: Status::Pending,
        }
    }

    const DATE: Option<&str> = Some("2023-03-15T03:00:00.000Z");

    #[test]
    fn test_passes_all_conditions() {
        let rules = FilterRules::default();
        for event in ["Recebido na Base", "Coletado", "Romaneio em Transferencia"] {
            assert!(rules.passes(&make_record("REF1", event, "MR Coleta", DATE)), "{event}");
        }
    }

    #[test]
    fn test_rejects_each_failing_condition() {
        let rules = FilterRules::default();
        assert!(!rules.passes(&make_record("", "Coletado", "MR Coleta", DATE)));
        assert!(!rules.passes(&make_record("REF1", "Coletado", "MR Coleta", None)));
        assert!(!rules.passes(&make_record("REF1", "Coletado", "Outro Serviço", DATE)));
        assert!(!rules.passes(&make_record("REF1", "Entregue", "MR Coleta", DATE)));
    }

    #[test]
    fn test_exact_match_is_case_sensitive() {
        let rules = FilterRules::default();
        assert!(!rules.passes(&make_record("REF1", "coletado", "MR Coleta", DATE)));
        assert!(!rules.passes(&make_record("REF1", "Coletado", "mr coleta", DATE)));
    }

    #[test]
    fn test_apply_preserves_order() {
        let rules = FilterRules::default();
        let kept = rules.apply(vec![
            make_record("A", "Coletado", "MR Coleta", DATE),
            make_record("B", "Entregue", "MR Coleta", DATE),
            make_record("C", "Recebido na Base", "MR Coleta", DATE),
        ]);
        let refs: Vec<_> = kept.iter().map(|r| r.reference.as_str()).collect();
        assert_eq!(refs, vec!["A", "C"]);
    }

    #[test]
    fn test_custom_rules() {
        let rules = FilterRules {
            service_type: "Expresso".to_string(),
            allowed_events: ["Entregue".to_string()].into_iter().collect(),
        };
        assert!(rules.passes(&make_record("X", "Entregue", "Expresso", DATE)));
        assert!(!rules.passes(&make_record("X", "Coletado", "MR Coleta", DATE)));
    }

    #[test]
    fn test_day_window_all_shows_everything() {
        let now = Utc.with_ymd_and_hms(2023, 3, 20, 12, 0, 0).unwrap();
        let records = vec![
            make_record("A", "Coletado", "MR Coleta", DATE),
            make_record("B", "Coletado", "MR Coleta", None),
        ];
        assert_eq!(visible_indices(&records, DayWindow::All, now), vec![0, 1]);
    }

    #[test]
    fn test_day_window_hides_old_records() {
        let now = Utc.with_ymd_and_hms(2023, 3, 20, 12, 0, 0).unwrap();
        let records = vec![
            make_record("old", "Coletado", "MR Coleta", Some("2023-03-01T00:00:00.000Z")),
            make_record("recent", "Coletado", "MR Coleta", Some("2023-03-18T00:00:00.000Z")),
            make_record("today", "Coletado", "MR Coleta", Some("2023-03-20T08:00:00.000Z")),
            make_record("undated", "Coletado", "MR Coleta", None),
        ];
        assert_eq!(visible_indices(&records, DayWindow::Days(1), now), vec![2]);
        assert_eq!(visible_indices(&records, DayWindow::Days(7), now), vec![1, 2]);
        assert_eq!(visible_indices(&records, DayWindow::Days(30), now), vec![0, 1, 2]);
    }

    #[test]
    fn test_day_window_from_days_and_labels() {
        assert_eq!(DayWindow::from_days(0), DayWindow::All);
        assert_eq!(DayWindow::from_days(7), DayWindow::Days(7));
        assert_eq!(DayWindow::Days(1).label(), "Last day");
        assert_eq!(DayWindow::Days(15).label(), "Last 15 days");
        assert_eq!(DayWindow::Days(15).days(), 15);
    }
}
