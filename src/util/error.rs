// Pickup Tracker - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation. Every error that reaches the user also
// carries a short banner message via `user_message()`.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all Pickup Tracker operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum TrackerError {
    /// Workbook import failed.
    Import(ImportError),

    /// Export operation failed.
    Export(ExportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Import(e) => write!(f, "Import error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for TrackerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Import(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Import errors
// ---------------------------------------------------------------------------

/// Errors related to reading and processing a carrier workbook.
#[derive(Debug)]
pub enum ImportError {
    /// The file could not be read from disk.
    Io { path: PathBuf, source: io::Error },

    /// The file exceeds the maximum accepted size.
    FileTooLarge { path: PathBuf, size: u64, max_size: u64 },

    /// The workbook reader failed (corrupt file, unsupported format, bad sheet).
    Workbook { source: calamine::Error },

    /// The workbook contains no worksheets.
    NoSheets,

    /// The first sheet has fewer rows than a header plus one data row.
    InsufficientRows { rows: usize },

    /// One or more required columns are absent from the header row.
    MissingColumns { missing: Vec<&'static str> },

    /// Rows were read but none satisfied the filter rules.
    NoMatchingRows { data_rows: usize },

    /// The import worker stopped without producing a result (panic or
    /// thread exit before a terminal message).
    Aborted { reason: String },
}

impl ImportError {
    /// Single-line message shown to the user in the error banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io { .. } => "Could not read the file. Please try again.".to_string(),
            Self::FileTooLarge { .. } | Self::Workbook { .. } | Self::Aborted { .. } => {
                "Could not process the file. Check that it is a valid spreadsheet.".to_string()
            }
            Self::NoSheets | Self::InsufficientRows { .. } => {
                "The file is empty or does not contain enough data.".to_string()
            }
            Self::MissingColumns { missing } => format!(
                "Required columns not found in the spreadsheet: {}.",
                missing.join(", ")
            ),
            Self::NoMatchingRows { .. } => {
                "No rows matched the service type and event criteria.".to_string()
            }
        }
    }
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Cannot read workbook '{}': {source}", path.display())
            }
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "Workbook '{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::Workbook { source } => write!(f, "Failed to read workbook: {source}"),
            Self::NoSheets => write!(f, "Workbook contains no sheets"),
            Self::InsufficientRows { rows } => write!(
                f,
                "First sheet has {rows} non-blank row(s); a header and at least one data row are required"
            ),
            Self::MissingColumns { missing } => {
                write!(f, "Missing required column(s): {}", missing.join(", "))
            }
            Self::NoMatchingRows { data_rows } => {
                write!(f, "None of the {data_rows} data row(s) matched the filter rules")
            }
            Self::Aborted { reason } => write!(f, "Import stopped unexpectedly: {reason}"),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Workbook { source } => Some(source),
            _ => None,
        }
    }
}

impl From<ImportError> for TrackerError {
    fn from(e: ImportError) -> Self {
        Self::Import(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// xlsx serialisation error.
    Xlsx {
        path: PathBuf,
        source: rust_xlsxwriter::XlsxError,
    },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// There is nothing to export.
    NoRecords,

    /// Export would exceed maximum record count.
    TooManyRecords { count: usize, max: usize },
}

impl ExportError {
    /// Single-line message shown to the user in the error banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::NoRecords => "There are no records to export.".to_string(),
            _ => "Error exporting the file.".to_string(),
        }
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Xlsx { path, source } => {
                write!(f, "XLSX export error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
            Self::NoRecords => write!(f, "No records to export"),
            Self::TooManyRecords { count, max } => write!(
                f,
                "Export of {count} records exceeds maximum of {max}. \
                 Narrow the day window to reduce the result set."
            ),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Xlsx { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ExportError> for TrackerError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for TrackerError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for Pickup Tracker results.
pub type Result<T> = std::result::Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_lists_every_column() {
        let err = ImportError::MissingColumns {
            missing: vec!["reference", "service type"],
        };
        assert_eq!(
            err.user_message(),
            "Required columns not found in the spreadsheet: reference, service type."
        );
        assert!(err.to_string().contains("reference, service type"));
    }

    #[test]
    fn test_no_matching_rows_distinct_from_missing_columns() {
        let no_rows = ImportError::NoMatchingRows { data_rows: 3 }.user_message();
        let no_cols = ImportError::MissingColumns {
            missing: vec!["reference"],
        }
        .user_message();
        assert_ne!(no_rows, no_cols);
    }

    #[test]
    fn test_error_source_chain_preserved() {
        use std::error::Error;
        let err: TrackerError = ImportError::Io {
            path: PathBuf::from("in.xlsx"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        }
        .into();
        let import = err.source().expect("import error source");
        assert!(import.source().is_some(), "io error must remain in chain");
    }

    #[test]
    fn test_aborted_import_uses_generic_processing_message() {
        let aborted = ImportError::Aborted {
            reason: "worker exited".to_string(),
        };
        let workbook_msg = "Could not process the file. Check that it is a valid spreadsheet.";
        assert_eq!(aborted.user_message(), workbook_msg);
        assert!(aborted.to_string().contains("worker exited"));
    }
}
