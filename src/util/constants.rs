// Pickup Tracker - util/constants.rs
//
// Named constants for the whole application. No magic numbers elsewhere.

// =============================================================================
// Application identity
// =============================================================================

/// Human-readable application name (window title, logs).
pub const APP_NAME: &str = "Pickup Tracker";

/// Application identifier used for platform directory resolution.
pub const APP_ID: &str = "pickup-tracker";

/// Application version, taken from Cargo.toml at compile time.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Import rules (defaults, overridable in config.toml)
// =============================================================================

/// Only rows with exactly this service type are kept.
pub const DEFAULT_SERVICE_TYPE: &str = "MR Coleta";

/// Last-event values a row must carry to be kept.
pub const DEFAULT_ALLOWED_EVENTS: &[&str] =
    &["Recebido na Base", "Coletado", "Romaneio em Transferencia"];

/// Header candidates for the reference column. Accent variants are listed
/// separately because matching does no accent folding.
pub const REFERENCE_LABELS: &[&str] = &["referência", "referencia"];

/// Header candidates for the last-event column.
pub const LAST_EVENT_LABELS: &[&str] = &["última ocorrência", "ultima ocorrencia"];

/// Header candidates for the last-event date column.
pub const LAST_EVENT_DATE_LABELS: &[&str] = &["dt. últ. ocorrência", "data ultima ocorrencia"];

/// Header candidates for the service-type column.
pub const SERVICE_TYPE_LABELS: &[&str] = &["serviço", "servico"];

/// Header candidates for the optional invoice-value column.
pub const INVOICE_VALUE_LABELS: &[&str] = &["vlr mercadoria"];

/// Minimum rows in the first sheet: one header plus one data row.
pub const MIN_SHEET_ROWS: usize = 2;

// =============================================================================
// Import limits
// =============================================================================

/// Largest workbook accepted for import. Carrier exports are a few MB at most;
/// anything larger is almost certainly the wrong file.
pub const MAX_IMPORT_FILE_SIZE: u64 = 64 * 1024 * 1024; // 64 MiB

/// Maximum data rows processed from a single sheet.
pub const MAX_IMPORT_ROWS: usize = 1_000_000;

/// Accepted workbook extensions for the file picker.
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xls", "xlsb", "ods"];

// =============================================================================
// Locale formatting
// =============================================================================

/// Currency symbol for invoice values (pt-BR).
pub const CURRENCY_SYMBOL: &str = "R$";

/// Separator between currency symbol and amount. pt-BR formatting uses a
/// non-breaking space here.
pub const CURRENCY_SPACE: char = '\u{a0}';

/// Thousands grouping separator (pt-BR).
pub const THOUSANDS_SEPARATOR: char = '.';

/// Decimal separator (pt-BR).
pub const DECIMAL_SEPARATOR: char = ',';

// =============================================================================
// View defaults
// =============================================================================

/// Day-window choices offered by the selector, in days. Zero means "all".
pub const DAY_WINDOW_CHOICES: &[u32] = &[0, 1, 7, 15, 30];

/// Largest day window accepted from config or the command line.
pub const MAX_DAY_WINDOW_DAYS: u32 = 3650;

/// Seconds in one day, for the day-window cut-off.
pub const SECONDS_PER_DAY: i64 = 86_400;

// =============================================================================
// Export
// =============================================================================

/// Default file name offered by the save dialog.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "processed_data.xlsx";

/// Name of the single worksheet in exported workbooks.
pub const EXPORT_SHEET_NAME: &str = "Processed Data";

/// Header labels of exported files, in column order.
pub const EXPORT_HEADERS: [&str; 5] = [
    "Reference",
    "Last Event",
    "Last Event Date",
    "Invoice Value",
    "Status",
];

/// Maximum number of records written in a single export.
/// Matches the xlsx row limit minus the header row.
pub const MAX_EXPORT_RECORDS: usize = 1_048_575;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Maximum number of allowed-event strings accepted from config.
pub const MAX_ALLOWED_EVENTS: usize = 64;

/// Maximum number of candidate labels per column accepted from config.
pub const MAX_LABEL_CANDIDATES: usize = 16;
