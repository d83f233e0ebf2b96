// Pickup Tracker - core/columns.rs
//
// Column resolver: locates the pipeline's columns in a header row by
// case-insensitive substring match against configurable candidate labels.
// No accent folding is done here; accent variants are separate candidates.

use crate::core::model::Cell;
use crate::util::constants;
use crate::util::error::ImportError;

/// Candidate header fragments for each column the pipeline reads.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLabels {
    pub reference: Vec<String>,
    pub last_event: Vec<String>,
    pub last_event_date: Vec<String>,
    pub service_type: Vec<String>,
    pub invoice_value: Vec<String>,
}

impl Default for ColumnLabels {
    fn default() -> Self {
        fn owned(labels: &[&str]) -> Vec<String> {
            labels.iter().map(|s| (*s).to_string()).collect()
        }
        Self {
            reference: owned(constants::REFERENCE_LABELS),
            last_event: owned(constants::LAST_EVENT_LABELS),
            last_event_date: owned(constants::LAST_EVENT_DATE_LABELS),
            service_type: owned(constants::SERVICE_TYPE_LABELS),
            invoice_value: owned(constants::INVOICE_VALUE_LABELS),
        }
    }
}

/// Resolved column indices for one sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub reference: usize,
    pub last_event: usize,
    pub last_event_date: usize,
    pub service_type: usize,
    /// Optional; rows get a zero currency value when absent.
    pub invoice_value: Option<usize>,
}

impl ColumnMap {
    /// Resolve every column against `header`.
    ///
    /// Fails with `MissingColumns` naming each required column that was not
    /// found, so the user sees the whole problem at once.
    pub fn resolve(header: &[Cell], labels: &ColumnLabels) -> Result<Self, ImportError> {
        let reference = resolve_column(header, &labels.reference);
        let last_event = resolve_column(header, &labels.last_event);
        let last_event_date = resolve_column(header, &labels.last_event_date);
        let service_type = resolve_column(header, &labels.service_type);
        let invoice_value = resolve_column(header, &labels.invoice_value);

        match (reference, last_event, last_event_date, service_type) {
            (Some(reference), Some(last_event), Some(last_event_date), Some(service_type)) => {
                let map = Self {
                    reference,
                    last_event,
                    last_event_date,
                    service_type,
                    invoice_value,
                };
                tracing::debug!(?map, "Columns resolved");
                Ok(map)
            }
            _ => {
                let missing: Vec<&'static str> = [
                    ("reference", reference),
                    ("last event", last_event),
                    ("last event date", last_event_date),
                    ("service type", service_type),
                ]
                .iter()
                .filter(|(_, idx)| idx.is_none())
                .map(|(name, _)| *name)
                .collect();
                Err(ImportError::MissingColumns { missing })
            }
        }
    }
}

/// Index of the first header cell whose lowercased text contains any
/// lowercased candidate, or `None`.
pub fn resolve_column(header: &[Cell], candidates: &[String]) -> Option<usize> {
    let lowered: Vec<String> = candidates.iter().map(|c| c.to_lowercase()).collect();
    header.iter().position(|cell| {
        let text = cell.to_text().to_lowercase();
        lowered.iter().any(|candidate| text.contains(candidate.as_str()))
    })
}
