// Pickup Tracker - app/state.rs
//
// Application state management. Holds the imported records, the view
// (day window, sort, visible indices), and the banner/status text.
// Owned by the eframe::App implementation; every mutation goes through a
// named method so the whole state can be driven headlessly in tests.

use crate::core::columns::ColumnLabels;
use crate::core::export::{self, ExportFormat};
use crate::core::filter::{self, DayWindow, FilterRules};
use crate::core::import::ImportRules;
use crate::core::model::{ImportSummary, Record, Status};
use crate::core::sort::{self, SortKey, SortState};
use crate::platform::config::AppConfig;
use crate::util::error::ExportError;
use chrono::{DateTime, Utc};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Build the import rules described by a validated config.
pub fn rules_from_config(config: &AppConfig) -> ImportRules {
    ImportRules {
        labels: ColumnLabels {
            reference: config.reference_labels.clone(),
            last_event: config.last_event_labels.clone(),
            last_event_date: config.last_event_date_labels.clone(),
            service_type: config.service_type_labels.clone(),
            invoice_value: config.invoice_value_labels.clone(),
        },
        filter: FilterRules {
            service_type: config.service_type.clone(),
            allowed_events: config.allowed_events.iter().cloned().collect(),
        },
    }
}

/// Top-level application state.
#[derive(Debug)]
pub struct AppState {
    /// Current record set, in display order.
    pub records: Vec<Record>,

    /// Indices into `records` inside the current day window.
    pub visible_indices: Vec<usize>,

    /// Active day window.
    pub day_window: DayWindow,

    /// Active sort column and direction; `None` keeps import order.
    pub sort_state: Option<SortState>,

    /// Rules applied to the next import.
    pub rules: ImportRules,

    /// Workbook the current records came from.
    pub source_path: Option<PathBuf>,

    /// Summary of the most recent successful import.
    pub import_summary: Option<ImportSummary>,

    /// Whether an import is currently running.
    pub import_in_progress: bool,

    /// Workbook a panel asked to import; consumed by the app each frame.
    pub pending_import: Option<PathBuf>,

    /// Error banner text. Cleared by the next import attempt.
    pub error_message: Option<String>,

    /// Status message for the status bar.
    pub status_message: String,

    /// Non-fatal warnings (config validation).
    pub warnings: Vec<String>,

    /// Whether to show the import summary window.
    pub show_summary: bool,

    /// Whether to show the about window.
    pub show_about: bool,

    /// Dark (true) or light (false) theme.
    pub dark_mode: bool,

    /// Whether debug mode is enabled.
    pub debug_mode: bool,

    /// File name suggested by the export dialog.
    pub export_file_name: String,

    /// Directory the export dialog opens in.
    pub export_dir: Option<PathBuf>,
}

impl AppState {
    /// Create initial state from the validated config.
    pub fn new(config: &AppConfig, debug_mode: bool) -> Self {
        Self {
            records: Vec::new(),
            visible_indices: Vec::new(),
            day_window: DayWindow::from_days(config.default_days),
            sort_state: None,
            rules: rules_from_config(config),
            source_path: None,
            import_summary: None,
            import_in_progress: false,
            pending_import: None,
            error_message: None,
            status_message: "Ready. Import a carrier workbook to begin.".to_string(),
            warnings: Vec::new(),
            show_summary: false,
            show_about: false,
            dark_mode: config.dark_mode,
            debug_mode,
            export_file_name: config.export_file_name.clone(),
            export_dir: None,
        }
    }

    /// An import has been started for `path`.
    pub fn begin_import(&mut self, path: &Path) {
        self.import_in_progress = true;
        self.error_message = None;
        self.status_message = format!("Importing {}...", path.display());
    }

    /// Replace the record set with a fresh import.
    ///
    /// Every status starts at `Pending` again. An active sort is re-applied
    /// so the header arrow keeps describing the table.
    pub fn replace_records(
        &mut self,
        records: Vec<Record>,
        summary: ImportSummary,
        now: DateTime<Utc>,
    ) {
        self.records = records;
        if let Some(state) = self.sort_state {
            sort::sort_records(&mut self.records, state);
        }
        self.source_path = summary.path.clone();
        self.import_in_progress = false;
        self.error_message = None;
        self.status_message = format!("Imported {} records", summary.records);
        self.import_summary = Some(summary);
        self.show_summary = true;
        self.apply_view(now);
    }

    /// An import failed. The current records are left untouched.
    pub fn import_failed(&mut self, message: String) {
        self.import_in_progress = false;
        self.status_message = "Import failed".to_string();
        self.error_message = Some(message);
    }

    /// Set the status of the record with `reference`. Returns false if no
    /// such record exists.
    pub fn set_status(&mut self, reference: &str, status: Status) -> bool {
        match self.records.iter_mut().find(|r| r.reference == reference) {
            Some(record) => {
                if record.status != status {
                    tracing::debug!(reference, status = %status, "Status changed");
                }
                record.status = status;
                true
            }
            None => false,
        }
    }

    /// Sort by `key`, toggling direction when it is already the ascending key.
    pub fn sort_by(&mut self, key: SortKey, now: DateTime<Utc>) {
        let state = SortState::next(self.sort_state, key);
        sort::sort_records(&mut self.records, state);
        self.sort_state = Some(state);
        self.apply_view(now);
    }

    /// Change the day window and refresh the visible rows.
    pub fn set_day_window(&mut self, window: DayWindow, now: DateTime<Utc>) {
        if self.day_window != window {
            tracing::debug!(days = window.days(), "Day window changed");
        }
        self.day_window = window;
        self.apply_view(now);
    }

    /// Recompute `visible_indices` from the records and day window.
    pub fn apply_view(&mut self, now: DateTime<Utc>) {
        self.visible_indices = filter::visible_indices(&self.records, self.day_window, now);
    }

    /// Records currently visible, in display order.
    pub fn visible_records(&self) -> impl Iterator<Item = &Record> {
        self.visible_indices
            .iter()
            .filter_map(|&idx| self.records.get(idx))
    }

    /// Whether there is anything to export.
    pub fn can_export(&self) -> bool {
        !self.visible_indices.is_empty()
    }

    /// Write the visible records to `path`, format chosen by extension.
    ///
    /// Returns the number of records written. The record set is not touched.
    pub fn export_to(&self, path: &Path) -> Result<usize, ExportError> {
        if !self.can_export() {
            return Err(ExportError::NoRecords);
        }
        let format = ExportFormat::from_path(path);
        let records: Vec<Record> = self.visible_records().cloned().collect();

        let file = std::fs::File::create(path).map_err(|e| ExportError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let count = export::export(format, &records, BufWriter::new(file), path)?;

        tracing::info!(
            path = %path.display(),
            format = format.label(),
            records = count,
            "Export complete"
        );
        Ok(count)
    }

    /// Record the outcome of an export in the banner/status bar.
    pub fn report_export(&mut self, path: &Path, result: &Result<usize, ExportError>) {
        match result {
            Ok(count) => {
                self.error_message = None;
                self.status_message = format!("Exported {count} records to {}", path.display());
            }
            Err(e) => {
                tracing::warn!(error = %e, "Export failed");
                self.error_message = Some(e.user_message());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 3, 20, 12, 0, 0).unwrap()
    }

    fn make_record(reference: &str, date: &str) -> Record {
        Record {
            reference: reference.to_string(),
            last_event: "Coletado".to_string(),
            last_event_date: Some(date.to_string()),
            service_type: "MR Coleta".to_string(),
            invoice_value: "R$\u{a0}1,00".to_string(),
            status: Status::Pending,
        }
    }

    fn summary(records: usize) -> ImportSummary {
        ImportSummary {
            records,
            ..ImportSummary::default()
        }
    }

    fn loaded_state() -> AppState {
        let mut state = AppState::new(&AppConfig::default(), false);
        state.replace_records(
            vec![
                make_record("B", "2023-03-19T00:00:00.000Z"),
                make_record("A", "2023-03-01T00:00:00.000Z"),
                make_record("C", "2023-03-10T00:00:00.000Z"),
            ],
            summary(3),
            now(),
        );
        state
    }

    fn visible_refs(state: &AppState) -> Vec<&str> {
        state.visible_records().map(|r| r.reference.as_str()).collect()
    }

    #[test]
    fn test_replace_records_shows_everything() {
        let state = loaded_state();
        assert_eq!(visible_refs(&state), vec!["B", "A", "C"]);
        assert!(state.error_message.is_none());
        assert!(!state.import_in_progress);
        assert!(state.can_export());
    }

    #[test]
    fn test_set_status() {
        let mut state = loaded_state();
        assert!(state.set_status("A", Status::Lost));
        assert_eq!(state.records[1].status, Status::Lost);
        assert!(!state.set_status("missing", Status::Resolved));
    }

    #[test]
    fn test_sort_by_toggles() {
        let mut state = loaded_state();
        state.sort_by(SortKey::Reference, now());
        assert_eq!(visible_refs(&state), vec!["A", "B", "C"]);
        state.sort_by(SortKey::Reference, now());
        assert_eq!(visible_refs(&state), vec!["C", "B", "A"]);
        state.sort_by(SortKey::LastEventDate, now());
        assert_eq!(visible_refs(&state), vec!["A", "C", "B"]);
    }

    #[test]
    fn test_status_survives_sort() {
        let mut state = loaded_state();
        state.set_status("C", Status::Resolved);
        state.sort_by(SortKey::Reference, now());
        let c = state.visible_records().find(|r| r.reference == "C").unwrap();
        assert_eq!(c.status, Status::Resolved);
    }

    #[test]
    fn test_day_window_hides_without_removing() {
        let mut state = loaded_state();
        state.set_day_window(DayWindow::Days(15), now());
        assert_eq!(visible_refs(&state), vec!["B", "C"]);
        assert_eq!(state.records.len(), 3);
        state.set_day_window(DayWindow::All, now());
        assert_eq!(visible_refs(&state).len(), 3);
    }

    #[test]
    fn test_new_import_resets_status_and_keeps_sort() {
        let mut state = loaded_state();
        state.set_status("A", Status::Lost);
        state.sort_by(SortKey::Reference, now());
        state.replace_records(
            vec![
                make_record("Z", "2023-03-19T00:00:00.000Z"),
                make_record("A", "2023-03-19T00:00:00.000Z"),
            ],
            summary(2),
            now(),
        );
        assert_eq!(visible_refs(&state), vec!["A", "Z"]);
        assert!(state.records.iter().all(|r| r.status == Status::Pending));
    }

    #[test]
    fn test_import_failure_keeps_records() {
        let mut state = loaded_state();
        state.begin_import(Path::new("other.xlsx"));
        assert!(state.import_in_progress);
        state.import_failed("Error processing the file.".to_string());
        assert_eq!(state.records.len(), 3);
        assert_eq!(state.error_message.as_deref(), Some("Error processing the file."));
        assert!(!state.import_in_progress);
    }

    #[test]
    fn test_export_with_nothing_visible_is_no_records() {
        let state = AppState::new(&AppConfig::default(), false);
        let dir = tempfile::tempdir().unwrap();
        let result = state.export_to(&dir.path().join("out.xlsx"));
        assert!(matches!(result, Err(ExportError::NoRecords)));
    }

    #[test]
    fn test_export_writes_only_visible_records() {
        let mut state = loaded_state();
        state.set_day_window(DayWindow::Days(15), now());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let result = state.export_to(&path);
        assert_eq!(result.as_ref().ok(), Some(&2));
        state.report_export(&path, &result);
        assert!(state.status_message.starts_with("Exported 2 records"));

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("B,Coletado"));
        assert!(!written.contains("A,Coletado"));
    }

    #[test]
    fn test_rules_follow_config() {
        let config = AppConfig {
            service_type: "Expresso".to_string(),
            allowed_events: vec!["Entregue".to_string()],
            ..AppConfig::default()
        };
        let rules = rules_from_config(&config);
        assert_eq!(rules.filter.service_type, "Expresso");
        assert!(rules.filter.allowed_events.contains("Entregue"));
        assert_eq!(rules.labels, ColumnLabels::default());
    }
}
