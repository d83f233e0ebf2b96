// Pickup Tracker - core/sort.rs
//
// Column sorting for the record table.
// The date column compares instants; every other column compares text.
// Sorting is stable, so ties keep their relative order.

use crate::core::model::Record;
use std::cmp::Ordering;
use std::str::FromStr;

/// Sortable record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Reference,
    LastEvent,
    LastEventDate,
    InvoiceValue,
    Status,
}

impl SortKey {
    /// All keys in table column order.
    pub fn all() -> &'static [SortKey] {
        &[
            SortKey::Reference,
            SortKey::LastEvent,
            SortKey::LastEventDate,
            SortKey::InvoiceValue,
            SortKey::Status,
        ]
    }

    /// Column header label.
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Reference => "Reference",
            SortKey::LastEvent => "Last Event",
            SortKey::LastEventDate => "Last Event Date",
            SortKey::InvoiceValue => "Invoice Value",
            SortKey::Status => "Status",
        }
    }

    /// Compare two records on this key, ascending.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        match self {
            SortKey::Reference => a.reference.cmp(&b.reference),
            SortKey::LastEvent => a.last_event.cmp(&b.last_event),
            SortKey::LastEventDate => event_millis(a).cmp(&event_millis(b)),
            SortKey::InvoiceValue => a.invoice_value.cmp(&b.invoice_value),
            SortKey::Status => a.status.label().cmp(b.status.label()),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reference" | "ref" => Ok(SortKey::Reference),
            "event" | "last-event" => Ok(SortKey::LastEvent),
            "date" | "last-event-date" => Ok(SortKey::LastEventDate),
            "value" | "invoice-value" => Ok(SortKey::InvoiceValue),
            "status" => Ok(SortKey::Status),
            other => Err(format!(
                "unknown sort key '{other}' (expected reference, event, date, value or status)"
            )),
        }
    }
}

/// Missing or unparseable dates sort as the epoch.
fn event_millis(record: &Record) -> i64 {
    record
        .event_instant()
        .map(|ts| ts.timestamp_millis())
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Header arrow glyph.
    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "\u{25b2}",
            SortDirection::Descending => "\u{25bc}",
        }
    }
}

/// Current sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    /// Sort state after the user clicks `key`.
    ///
    /// Clicking the ascending column flips it to descending; anything else
    /// (a different column, or the descending one) sorts ascending.
    pub fn next(current: Option<SortState>, key: SortKey) -> SortState {
        let direction = match current {
            Some(state) if state.key == key && state.direction == SortDirection::Ascending => {
                SortDirection::Descending
            }
            _ => SortDirection::Ascending,
        };
        SortState { key, direction }
    }
}

/// Stable in-place sort of `records` by `state`.
pub fn sort_records(records: &mut [Record], state: SortState) {
    records.sort_by(|a, b| {
        let ord = state.key.compare(a, b);
        match state.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Status;

    fn make_record(reference: &str, date: Option<&str>, value: &str) -> Record {
        Record {
            reference: reference.to_string(),
            last_event: "Coletado".to_string(),
            last_event_date: date.map(str::to_string),
            service_type: "MR Coleta".to_string(),
            invoice_value: value.to_string(),
            status: Status::Pending,
        }
    }

    fn refs(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.reference.as_str()).collect()
    }

    fn asc(key: SortKey) -> SortState {
        SortState {
            key,
            direction: SortDirection::Ascending,
        }
    }

    #[test]
    fn test_date_sort_is_by_instant_not_text() {
        // As text "later" sorts first; as instants "earlier" (07:00Z) does.
        let mut records = vec![
            make_record("later", Some("2023-03-15T10:00:00.000Z"), ""),
            make_record("earlier", Some("2023-03-15T12:00:00+05:00"), ""),
        ];
        sort_records(&mut records, asc(SortKey::LastEventDate));
        assert_eq!(refs(&records), vec!["earlier", "later"]);
    }

    #[test]
    fn test_missing_date_sorts_first_ascending() {
        let mut records = vec![
            make_record("b", Some("2023-03-15T10:00:00.000Z"), ""),
            make_record("none", None, ""),
            make_record("a", Some("2020-01-01T00:00:00.000Z"), ""),
            make_record("junk", Some("not a date"), ""),
        ];
        sort_records(&mut records, asc(SortKey::LastEventDate));
        assert_eq!(refs(&records), vec!["none", "junk", "a", "b"]);
    }

    #[test]
    fn test_text_sort_and_stability() {
        let mut records = vec![
            make_record("C", None, "R$\u{a0}1,00"),
            make_record("A", None, "R$\u{a0}2,00"),
            make_record("B", None, "R$\u{a0}1,00"),
        ];
        sort_records(&mut records, asc(SortKey::InvoiceValue));
        assert_eq!(refs(&records), vec!["C", "B", "A"]);

        sort_records(&mut records, asc(SortKey::Reference));
        assert_eq!(refs(&records), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_status_sort_uses_label() {
        let mut records = vec![
            make_record("p", None, ""),
            make_record("r", None, ""),
            make_record("l", None, ""),
        ];
        records[1].status = Status::Resolved;
        records[2].status = Status::Lost;
        sort_records(&mut records, asc(SortKey::Status));
        assert_eq!(refs(&records), vec!["l", "p", "r"]);
    }

    #[test]
    fn test_toggle_direction() {
        let first = SortState::next(None, SortKey::Reference);
        assert_eq!(first.direction, SortDirection::Ascending);

        let second = SortState::next(Some(first), SortKey::Reference);
        assert_eq!(second.direction, SortDirection::Descending);

        let third = SortState::next(Some(second), SortKey::Reference);
        assert_eq!(third.direction, SortDirection::Ascending);

        let other = SortState::next(Some(second), SortKey::Status);
        assert_eq!(other, asc(SortKey::Status));
    }

    #[test]
    fn test_toggle_twice_reverses_order() {
        let mut records = vec![
            make_record("B", None, ""),
            make_record("D", None, ""),
            make_record("A", None, ""),
            make_record("C", None, ""),
        ];
        let state = SortState::next(None, SortKey::Reference);
        sort_records(&mut records, state);
        let ascending: Vec<String> = records.iter().map(|r| r.reference.clone()).collect();

        let state = SortState::next(Some(state), SortKey::Reference);
        sort_records(&mut records, state);
        let mut expected = ascending.clone();
        expected.reverse();
        assert_eq!(
            records.iter().map(|r| r.reference.clone()).collect::<Vec<_>>(),
            expected
        );
    }

    #[test]
    fn test_sort_key_from_str() {
        assert_eq!("date".parse::<SortKey>(), Ok(SortKey::LastEventDate));
        assert_eq!("Reference".parse::<SortKey>(), Ok(SortKey::Reference));
        assert!("colour".parse::<SortKey>().is_err());
    }
}
