// Pickup Tracker - platform/config.rs
//
// Platform-specific directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::{ProjectDirs, UserDirs};
use std::path::{Path, PathBuf};

/// Resolved platform paths for Pickup Tracker.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/pickup-tracker/ or %APPDATA%\pickup-tracker\config\)
    pub config_dir: PathBuf,

    /// Directory the save dialog opens in (the user's documents folder).
    pub export_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to the current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        let export_dir = UserDirs::new()
            .and_then(|u| {
                u.document_dir()
                    .map(Path::to_path_buf)
                    .or_else(|| Some(u.home_dir().to_path_buf()))
            })
            .unwrap_or_else(|| PathBuf::from("."));

        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(
                config = %config_dir.display(),
                export = %export_dir.display(),
                "Platform paths resolved"
            );
            Self {
                config_dir,
                export_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
                export_dir,
            }
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[import]` section.
    pub import: ImportSection,
    /// `[view]` section.
    pub view: ViewSection,
    /// `[export]` section.
    pub export: ExportSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[import]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ImportSection {
    /// Service type rows must carry to be kept.
    pub service_type: Option<String>,
    /// Last-event values rows must carry to be kept.
    pub allowed_events: Option<Vec<String>>,
    /// Header candidates for the reference column.
    pub reference_labels: Option<Vec<String>>,
    /// Header candidates for the last-event column.
    pub last_event_labels: Option<Vec<String>>,
    /// Header candidates for the last-event date column.
    pub last_event_date_labels: Option<Vec<String>>,
    /// Header candidates for the service-type column.
    pub service_type_labels: Option<Vec<String>>,
    /// Header candidates for the invoice-value column.
    pub invoice_value_labels: Option<Vec<String>>,
}

/// `[view]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ViewSection {
    /// Initial day window (0 = all dates).
    pub default_days: Option<u32>,
    /// Dark (true) or light (false) theme.
    pub dark_mode: Option<bool>,
}

/// `[export]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExportSection {
    /// File name suggested by the save dialog.
    pub default_file_name: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- Import --
    pub service_type: String,
    pub allowed_events: Vec<String>,
    pub reference_labels: Vec<String>,
    pub last_event_labels: Vec<String>,
    pub last_event_date_labels: Vec<String>,
    pub service_type_labels: Vec<String>,
    pub invoice_value_labels: Vec<String>,

    // -- View --
    /// Initial day window in days (0 = all dates).
    pub default_days: u32,
    /// Dark mode (true) or light mode (false).
    pub dark_mode: bool,

    // -- Export --
    pub export_file_name: String,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

fn owned(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|s| (*s).to_string()).collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_type: constants::DEFAULT_SERVICE_TYPE.to_string(),
            allowed_events: owned(constants::DEFAULT_ALLOWED_EVENTS),
            reference_labels: owned(constants::REFERENCE_LABELS),
            last_event_labels: owned(constants::LAST_EVENT_LABELS),
            last_event_date_labels: owned(constants::LAST_EVENT_DATE_LABELS),
            service_type_labels: owned(constants::SERVICE_TYPE_LABELS),
            invoice_value_labels: owned(constants::INVOICE_VALUE_LABELS),
            default_days: 0,
            dark_mode: true,
            export_file_name: constants::DEFAULT_EXPORT_FILE_NAME.to_string(),
            log_level: None,
        }
    }
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first run).
/// If the file is unreadable or unparseable, returns defaults with a warning.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(source) => {
            let err = ConfigError::Io {
                path: config_path,
                source,
            };
            tracing::warn!(error = %err, "Using default configuration");
            return (AppConfig::default(), vec![format!("{err}. Using defaults.")]);
        }
    };

    match parse_config(&content, &config_path) {
        Ok((config, warnings)) => {
            tracing::info!(path = %config_path.display(), "Loaded config.toml");
            (config, warnings)
        }
        Err(err) => {
            tracing::warn!(error = %err, "Using default configuration");
            (AppConfig::default(), vec![format!("{err}. Using defaults.")])
        }
    }
}

/// Parse and validate config text. `path` is only used in messages.
///
/// A syntax error is fatal for the file; individual bad values are reported
/// as warnings and replaced by their defaults.
pub fn parse_config(content: &str, path: &Path) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let raw: RawConfig = toml::from_str(content).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(validate(raw))
}

/// Validate each field, accumulating every problem rather than stopping at
/// the first.
fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings: Vec<String> = Vec::new();

    let mut out_of_range = |field: &str, value: String, expected: String| {
        warnings.push(
            ConfigError::ValueOutOfRange {
                field: field.to_string(),
                value,
                expected,
            }
            .to_string()
                + ". Using default.",
        );
    };

    // -- Import: service_type --
    if let Some(service) = raw.import.service_type {
        let service = service.trim().to_string();
        if service.is_empty() {
            out_of_range(
                "import.service_type",
                String::new(),
                "a non-empty string".to_string(),
            );
        } else {
            config.service_type = service;
        }
    }

    // -- Import: allowed_events --
    if let Some(events) = raw.import.allowed_events {
        match clean_list(events, constants::MAX_ALLOWED_EVENTS) {
            Some(events) => config.allowed_events = events,
            None => out_of_range(
                "import.allowed_events",
                "[...]".to_string(),
                format!("1-{} non-empty strings", constants::MAX_ALLOWED_EVENTS),
            ),
        }
    }

    // -- Import: header label candidates --
    let label_fields: [(&str, Option<Vec<String>>, &mut Vec<String>); 5] = [
        (
            "import.reference_labels",
            raw.import.reference_labels,
            &mut config.reference_labels,
        ),
        (
            "import.last_event_labels",
            raw.import.last_event_labels,
            &mut config.last_event_labels,
        ),
        (
            "import.last_event_date_labels",
            raw.import.last_event_date_labels,
            &mut config.last_event_date_labels,
        ),
        (
            "import.service_type_labels",
            raw.import.service_type_labels,
            &mut config.service_type_labels,
        ),
        (
            "import.invoice_value_labels",
            raw.import.invoice_value_labels,
            &mut config.invoice_value_labels,
        ),
    ];
    for (field, value, target) in label_fields {
        if let Some(labels) = value {
            match clean_list(labels, constants::MAX_LABEL_CANDIDATES) {
                Some(labels) => *target = labels,
                None => out_of_range(
                    field,
                    "[...]".to_string(),
                    format!("1-{} non-empty strings", constants::MAX_LABEL_CANDIDATES),
                ),
            }
        }
    }

    // -- View: default_days --
    if let Some(days) = raw.view.default_days {
        if days <= constants::MAX_DAY_WINDOW_DAYS {
            config.default_days = days;
        } else {
            out_of_range(
                "view.default_days",
                days.to_string(),
                format!("0-{}", constants::MAX_DAY_WINDOW_DAYS),
            );
        }
    }

    if let Some(dark_mode) = raw.view.dark_mode {
        config.dark_mode = dark_mode;
    }

    // -- Export: default_file_name --
    if let Some(name) = raw.export.default_file_name {
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed.contains(['/', '\\']) {
            out_of_range(
                "export.default_file_name",
                name.clone(),
                "a plain file name without directories".to_string(),
            );
        } else {
            config.export_file_name = trimmed.to_string();
        }
    }

    // -- Logging: level --
    if let Some(level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level);
        } else {
            out_of_range(
                "logging.level",
                level,
                "error, warn, info, debug or trace".to_string(),
            );
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }

    (config, warnings)
}

/// Trim entries and drop empty ones. `None` if nothing is left or the list
/// is longer than `max`.
fn clean_list(values: Vec<String>, max: usize) -> Option<Vec<String>> {
    let cleaned: Vec<String> = values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();
    if cleaned.is_empty() || cleaned.len() > max {
        None
    } else {
        Some(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> (AppConfig, Vec<String>) {
        parse_config(content, Path::new("config.toml")).unwrap()
    }

    #[test]
    fn test_empty_config_is_default() {
        let (config, warnings) = parse("");
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_full_config() {
        let (config, warnings) = parse(
            r#"
[import]
service_type = "Expresso"
allowed_events = ["Entregue", " Coletado "]
reference_labels = ["pedido"]

[view]
default_days = 7
dark_mode = false

[export]
default_file_name = "saida.xlsx"

[logging]
level = "debug"
"#,
        );
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.service_type, "Expresso");
        assert_eq!(config.allowed_events, vec!["Entregue", "Coletado"]);
        assert_eq!(config.reference_labels, vec!["pedido"]);
        assert_eq!(config.last_event_labels, AppConfig::default().last_event_labels);
        assert_eq!(config.default_days, 7);
        assert!(!config.dark_mode);
        assert_eq!(config.export_file_name, "saida.xlsx");
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_invalid_values_fall_back_with_warnings() {
        let (config, warnings) = parse(
            r#"
[import]
service_type = "  "
allowed_events = []

[view]
default_days = 9999

[export]
default_file_name = "../escape.xlsx"

[logging]
level = "loud"
"#,
        );
        assert_eq!(config, AppConfig::default());
        assert_eq!(warnings.len(), 5, "{warnings:?}");
        assert!(warnings.iter().any(|w| w.contains("view.default_days")));
    }

    #[test]
    fn test_syntax_error_is_err() {
        let result = parse_config("[import\nservice_type = ", Path::new("config.toml"));
        assert!(matches!(result, Err(ConfigError::TomlParse { .. })));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let (config, warnings) = parse("[future]\nflag = true\n");
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_load_config_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(dir.path());
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_load_config_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(constants::CONFIG_FILE_NAME),
            "[view]\ndefault_days = 15\n",
        )
        .unwrap();
        let (config, warnings) = load_config(dir.path());
        assert_eq!(config.default_days, 15);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_load_config_unparseable_file_warns() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(constants::CONFIG_FILE_NAME), "not = [toml").unwrap();
        let (config, warnings) = load_config(dir.path());
        assert_eq!(config, AppConfig::default());
        assert_eq!(warnings.len(), 1);
    }
}
