// Pickup Tracker - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

// =============================================================================
// Cell (raw spreadsheet value)
// =============================================================================

/// One raw cell of the imported sheet.
///
/// The workbook reader converts its own cell type into this immediately, so
/// nothing past `core::import` knows which spreadsheet library produced it.
/// Date-formatted cells arrive as `Number` holding their date-serial.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    /// Text form of the cell, as a spreadsheet would print it.
    ///
    /// Integral numbers print without a fractional part (`45000`, not
    /// `45000.0`). Empty cells become the empty string.
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(b) => b.to_string(),
        }
    }

    /// Returns true for `Empty` and for whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

// =============================================================================
// Status
// =============================================================================

/// User-assigned follow-up status of a pickup. The only mutable record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Status {
    #[default]
    Pending,
    Resolved,
    Lost,
}

impl Status {
    /// All variants in selector order.
    pub fn all() -> &'static [Status] {
        &[Status::Pending, Status::Resolved, Status::Lost]
    }

    /// Human-readable label for display and export.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::Resolved => "Resolved",
            Status::Lost => "Lost",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Record (normalised output of one row)
// =============================================================================

/// A single normalised tracking row.
///
/// Every field except `status` is fixed at import time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Business reference of the shipment; the dedupe key.
    pub reference: String,

    /// Most recent carrier-reported event.
    pub last_event: String,

    /// Event timestamp as an ISO-8601 UTC string with millisecond precision.
    /// `None` if the source cell could not be decoded.
    pub last_event_date: Option<String>,

    /// Carrier service classification. Only used by the row filter.
    #[serde(skip_serializing)]
    #[serde(default)]
    pub service_type: String,

    /// Invoice value, already formatted as currency display text.
    pub invoice_value: String,

    /// Follow-up status chosen by the user.
    pub status: Status,
}

impl Record {
    /// The event date as an instant, if present and parseable.
    pub fn event_instant(&self) -> Option<DateTime<Utc>> {
        self.last_event_date
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

// =============================================================================
// Import summary
// =============================================================================

/// Statistics for one completed import.
#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    /// Source file, if the import came from disk.
    pub path: Option<PathBuf>,

    /// Non-blank rows after the header.
    pub data_rows: usize,

    /// Rows whose date cell could not be decoded.
    pub undated_rows: usize,

    /// Rows dropped by the filter rules (includes undated rows).
    pub filtered_out: usize,

    /// Rows collapsed into an earlier row with the same reference.
    pub duplicates_collapsed: usize,

    /// Records in the final set.
    pub records: usize,

    /// Wall-clock processing time.
    pub duration: std::time::Duration,
}

// =============================================================================
// Import progress (background thread -> UI thread)
// =============================================================================

/// Messages sent from the import thread to the UI thread.
#[derive(Debug)]
pub enum ImportProgress {
    /// The file is being read and processed.
    Started { path: PathBuf },

    /// Import succeeded; the record set should be replaced.
    Completed {
        records: Vec<Record>,
        summary: ImportSummary,
    },

    /// Import failed. `message` is the banner text, `detail` the full error.
    Failed { message: String, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text_integral_number_has_no_fraction() {
        assert_eq!(Cell::Number(45000.0).to_text(), "45000");
        assert_eq!(Cell::Number(123.45).to_text(), "123.45");
        assert_eq!(Cell::Empty.to_text(), "");
        assert_eq!(Cell::Bool(true).to_text(), "true");
    }

    #[test]
    fn test_cell_blank() {
        assert!(Cell::Empty.is_blank());
        assert!(Cell::from("   ").is_blank());
        assert!(!Cell::Number(0.0).is_blank());
        assert!(!Cell::from("x").is_blank());
    }

    #[test]
    fn test_status_default_is_pending() {
        assert_eq!(Status::default(), Status::Pending);
        assert_eq!(Status::all().len(), 3);
    }

    #[test]
    fn test_record_json_omits_service_type() {
        let record = Record {
            reference: "REF1".to_string(),
            last_event: "Coletado".to_string(),
            last_event_date: None,
            service_type: "MR Coleta".to_string(),
            invoice_value: "R$\u{a0}0,00".to_string(),
            status: Status::Lost,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"status\":\"Lost\""));
        assert!(!json.contains("service_type"));
    }
}
