// Pickup Tracker - platform/fs.rs
//
// Filesystem helpers: bounded workbook reads and revealing exported files.

use crate::util::constants;
use crate::util::error::ImportError;
use std::path::Path;

/// Read a workbook from disk into memory.
///
/// The size is checked against `MAX_IMPORT_FILE_SIZE` before any bytes are
/// read, so picking a huge file by mistake fails fast.
pub fn read_workbook(path: &Path) -> Result<Vec<u8>, ImportError> {
    let io_err = |source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let size = std::fs::metadata(path).map_err(io_err)?.len();
    if size > constants::MAX_IMPORT_FILE_SIZE {
        return Err(ImportError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            max_size: constants::MAX_IMPORT_FILE_SIZE,
        });
    }

    let bytes = std::fs::read(path).map_err(io_err)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Workbook read");
    Ok(bytes)
}

/// True if `path` has one of the accepted workbook extensions.
pub fn is_workbook_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            constants::WORKBOOK_EXTENSIONS
                .iter()
                .any(|ext| ext.eq_ignore_ascii_case(e))
        })
        .unwrap_or(false)
}

/// Open the system file manager and highlight `path` within it.
///
/// Platform behaviour:
/// - **Windows**: `explorer.exe /select,"<path>"`
/// - **macOS**: `open -R "<path>"`
/// - **Linux**: `xdg-open "<parent>"` (no standard per-file selection)
///
/// Launch failures are logged at WARN level and never propagated.
pub fn reveal_in_file_manager(path: &Path) {
    #[cfg(target_os = "windows")]
    {
        // `/select,<path>` must be a single argument, no space after the comma.
        let arg = format!("/select,{}", path.display());
        if let Err(e) = std::process::Command::new("explorer").arg(arg).spawn() {
            tracing::warn!(path = %path.display(), error = %e, "Failed to reveal export in Explorer");
        }
    }
    #[cfg(target_os = "macos")]
    {
        if let Err(e) = std::process::Command::new("open").arg("-R").arg(path).spawn() {
            tracing::warn!(path = %path.display(), error = %e, "Failed to reveal export in Finder");
        }
    }
    #[cfg(target_os = "linux")]
    {
        let parent = path.parent().unwrap_or(path);
        if let Err(e) = std::process::Command::new("xdg-open").arg(parent).spawn() {
            tracing::warn!(path = %path.display(), error = %e, "Failed to open export folder");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_workbook(&dir.path().join("missing.xlsx"));
        assert!(matches!(result, Err(ImportError::Io { .. })));
    }

    #[test]
    fn test_read_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        std::fs::write(&path, b"PK\x03\x04").unwrap();
        assert_eq!(read_workbook(&path).unwrap(), b"PK\x03\x04");
    }

    #[test]
    fn test_workbook_extensions() {
        assert!(is_workbook_path(Path::new("a.xlsx")));
        assert!(is_workbook_path(Path::new("a.XLS")));
        assert!(is_workbook_path(Path::new("a.ods")));
        assert!(!is_workbook_path(Path::new("a.csv")));
        assert!(!is_workbook_path(Path::new("noext")));
    }
}
