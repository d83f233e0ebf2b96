// Pickup Tracker - core/import.rs
//
// Workbook import pipeline: bytes -> first-sheet cells -> records.
//
//   read_first_sheet   calamine workbook (xlsx/xls/xlsb/ods) to `Cell` rows
//   process_rows       resolve columns, normalise, filter, dedupe
//   import_workbook    both of the above
//
// Core layer: operates on in-memory bytes. Reading the file from disk is the
// caller's job (see platform::fs).

use crate::core::columns::{ColumnLabels, ColumnMap};
use crate::core::dedupe::dedupe;
use crate::core::filter::FilterRules;
use crate::core::model::{Cell, ImportSummary, Record};
use crate::core::normalize::normalize_row;
use crate::util::constants;
use crate::util::error::ImportError;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;
use std::time::Instant;

/// Configuration of one import: where the columns are and what to keep.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportRules {
    pub labels: ColumnLabels,
    pub filter: FilterRules,
}

/// Result of a successful import.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub records: Vec<Record>,
    pub summary: ImportSummary,
}

/// Import a workbook held in memory.
pub fn import_workbook(bytes: &[u8], rules: &ImportRules) -> Result<ImportOutcome, ImportError> {
    let rows = read_first_sheet(bytes)?;
    process_rows(rows, rules)
}

/// Read the first worksheet into rows of `Cell`, skipping blank rows.
pub fn read_first_sheet(bytes: &[u8]) -> Result<Vec<Vec<Cell>>, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|source| ImportError::Workbook { source })?;

    let sheet_names = workbook.sheet_names().to_vec();
    let first = sheet_names.first().ok_or(ImportError::NoSheets)?;
    if sheet_names.len() > 1 {
        tracing::debug!(
            sheet = %first,
            ignored = sheet_names.len() - 1,
            "Workbook has several sheets; only the first is imported"
        );
    }

    let range = workbook
        .worksheet_range(first)
        .map_err(|source| ImportError::Workbook { source })?;

    let mut rows = Vec::new();
    for row in range.rows() {
        let cells: Vec<Cell> = row.iter().map(to_cell).collect();
        if cells.iter().all(Cell::is_blank) {
            continue;
        }
        if rows.len() > constants::MAX_IMPORT_ROWS {
            tracing::warn!(
                max = constants::MAX_IMPORT_ROWS,
                "Sheet truncated at maximum row count"
            );
            break;
        }
        rows.push(cells);
    }

    tracing::debug!(sheet = %first, rows = rows.len(), "First sheet read");
    Ok(rows)
}

/// Convert a calamine cell. Date-formatted cells keep their serial so the
/// normaliser decodes every numeric date the same way.
fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

/// Run the record pipeline over raw rows. Row 0 is the header.
pub fn process_rows(rows: Vec<Vec<Cell>>, rules: &ImportRules) -> Result<ImportOutcome, ImportError> {
    let start = Instant::now();

    if rows.len() < constants::MIN_SHEET_ROWS {
        return Err(ImportError::InsufficientRows { rows: rows.len() });
    }

    let mut rows = rows.into_iter();
    let header = rows.next().unwrap_or_default();
    let columns = ColumnMap::resolve(&header, &rules.labels)?;

    let normalised: Vec<Record> = rows.map(|row| normalize_row(&row, &columns)).collect();
    let data_rows = normalised.len();
    let undated_rows = normalised
        .iter()
        .filter(|r| r.last_event_date.is_none())
        .count();

    let kept = rules.filter.apply(normalised);
    let filtered_out = data_rows - kept.len();

    let (records, duplicates_collapsed) = dedupe(kept);
    if records.is_empty() {
        tracing::info!(data_rows, undated_rows, "No rows matched the filter rules");
        return Err(ImportError::NoMatchingRows { data_rows });
    }

    let summary = ImportSummary {
        path: None,
        data_rows,
        undated_rows,
        filtered_out,
        duplicates_collapsed,
        records: records.len(),
        duration: start.elapsed(),
    };

    tracing::info!(
        data_rows,
        undated_rows,
        filtered_out,
        duplicates_collapsed,
        records = records.len(),
        "Rows processed"
    );

    Ok(ImportOutcome { records, summary })
}
