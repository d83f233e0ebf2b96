// Pickup Tracker - app/import.rs
//
// Import lifecycle management. Reads and processes a workbook on a
// background thread, sending progress messages to the UI thread via an
// mpsc channel.
//
// Architecture:
//   - `ImportManager` lives on the UI thread; `run_import` runs on a background thread.
//   - Starting a new import replaces the receiver. The superseded thread's
//     sends then fail and it exits, so only the latest import is applied.
//   - An `Arc<AtomicBool>` cancel flag lets the superseded thread stop before
//     the processing phase instead of finishing work nobody will read.
//   - A worker that dies without a terminal message (release builds abort on
//     panic) shows up as a disconnected channel and is reported as `Failed`.

use crate::core::import::{self, ImportOutcome, ImportRules};
use crate::core::model::ImportProgress;
use crate::platform::fs;
use crate::util::error::ImportError;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

// =============================================================================
// ImportManager
// =============================================================================

/// Manages a workbook import on a background thread.
pub struct ImportManager {
    /// Channel receiver for the UI to poll progress messages.
    progress_rx: Option<mpsc::Receiver<ImportProgress>>,

    /// Cancel flag shared with the background thread.
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl ImportManager {
    pub fn new() -> Self {
        Self {
            progress_rx: None,
            cancel_flag: None,
        }
    }

    /// Start importing `path` with `rules`.
    ///
    /// Spawns a background thread immediately. Any import still running is
    /// superseded and its result discarded.
    pub fn start_import(&mut self, path: PathBuf, rules: ImportRules) {
        self.cancel_import();

        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));

        self.progress_rx = Some(rx);
        self.cancel_flag = Some(Arc::clone(&cancel));

        tracing::info!(path = %path.display(), "Import started");
        std::thread::spawn(move || {
            run_import(path, rules, tx, cancel);
        });
    }

    /// Request cancellation of the running import and stop listening to it.
    pub fn cancel_import(&mut self) {
        if let Some(flag) = &self.cancel_flag {
            flag.store(true, Ordering::SeqCst);
        }
        self.cancel_flag = None;
        self.progress_rx = None;
    }

    /// True while an import thread may still report back.
    pub fn is_running(&self) -> bool {
        self.progress_rx.is_some()
    }

    /// Poll for progress messages without blocking. Returns all pending messages.
    ///
    /// The receiver is released once a terminal message has been seen. If the
    /// worker thread is gone without sending one, a `Failed` message is
    /// synthesised so the UI never waits on a dead import.
    pub fn poll_progress(&mut self) -> Vec<ImportProgress> {
        let Some(rx) = &self.progress_rx else {
            return Vec::new();
        };
        let mut messages = Vec::new();
        let mut disconnected = false;
        loop {
            match rx.try_recv() {
                Ok(msg) => messages.push(msg),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }

        let finished = messages.iter().any(|m| {
            matches!(
                m,
                ImportProgress::Completed { .. } | ImportProgress::Failed { .. }
            )
        });
        if disconnected && !finished {
            let err = ImportError::Aborted {
                reason: "import worker exited without reporting a result".to_string(),
            };
            tracing::warn!(error = %err, "Import thread disconnected");
            messages.push(failure_message(&err));
        }
        if finished || disconnected {
            self.progress_rx = None;
            self.cancel_flag = None;
        }
        messages
    }
}

impl Default for ImportManager {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Import pipeline
// =============================================================================

/// Read `path` from disk and run the record pipeline over it.
///
/// Blocking. Used by the background thread and by headless mode.
pub fn load_workbook(path: &Path, rules: &ImportRules) -> Result<ImportOutcome, ImportError> {
    let bytes = fs::read_workbook(path)?;
    let mut outcome = import::import_workbook(&bytes, rules)?;
    outcome.summary.path = Some(path.to_path_buf());
    Ok(outcome)
}

/// Background import: read, process, report.
fn run_import(
    path: PathBuf,
    rules: ImportRules,
    tx: mpsc::Sender<ImportProgress>,
    cancel: Arc<AtomicBool>,
) {
    // A failed send means the receiver was dropped (superseded or UI closed).
    if tx
        .send(ImportProgress::Started { path: path.clone() })
        .is_err()
    {
        return;
    }

    let bytes = match fs::read_workbook(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            report_failure(&tx, &e);
            return;
        }
    };

    if cancel.load(Ordering::SeqCst) {
        tracing::debug!(path = %path.display(), "Import superseded before processing");
        return;
    }

    let processed = panic::catch_unwind(AssertUnwindSafe(|| {
        import::import_workbook(&bytes, &rules)
    }));
    let result = match processed {
        Ok(result) => result,
        Err(payload) => Err(ImportError::Aborted {
            reason: panic_text(payload.as_ref()),
        }),
    };

    let message = match result {
        Ok(mut outcome) => {
            outcome.summary.path = Some(path.clone());
            tracing::info!(
                path = %path.display(),
                records = outcome.records.len(),
                duration_ms = outcome.summary.duration.as_millis() as u64,
                "Import complete"
            );
            ImportProgress::Completed {
                records: outcome.records,
                summary: outcome.summary,
            }
        }
        Err(e) => {
            report_failure(&tx, &e);
            return;
        }
    };

    let _ = tx.send(message);
}

fn report_failure(tx: &mpsc::Sender<ImportProgress>, err: &ImportError) {
    tracing::warn!(error = %err, "Import failed");
    let _ = tx.send(failure_message(err));
}

fn failure_message(err: &ImportError) -> ImportProgress {
    ImportProgress::Failed {
        message: err.user_message(),
        detail: err.to_string(),
    }
}

/// Text of a panic payload (`&str` or `String`), if it carries one.
fn panic_text(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic while processing workbook".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    /// Poll until a terminal message arrives or the deadline passes.
    fn wait_for_terminal(manager: &mut ImportManager) -> Vec<ImportProgress> {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut all = Vec::new();
        while manager.is_running() && Instant::now() < deadline {
            all.extend(manager.poll_progress());
            std::thread::sleep(Duration::from_millis(10));
        }
        all
    }

    #[test]
    fn test_missing_file_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = ImportManager::new();
        manager.start_import(dir.path().join("missing.xlsx"), ImportRules::default());

        let messages = wait_for_terminal(&mut manager);
        assert!(matches!(messages.first(), Some(ImportProgress::Started { .. })));
        assert!(matches!(messages.last(), Some(ImportProgress::Failed { .. })));
        assert!(!manager.is_running());
    }

    #[test]
    fn test_garbage_file_reports_failure_with_message() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.xlsx");
        std::fs::write(&path, b"not a workbook").unwrap();

        let mut manager = ImportManager::new();
        manager.start_import(path, ImportRules::default());
        let messages = wait_for_terminal(&mut manager);
        match messages.last() {
            Some(ImportProgress::Failed { message, .. }) => assert!(!message.is_empty()),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn test_cancel_stops_listening() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = ImportManager::new();
        manager.start_import(dir.path().join("missing.xlsx"), ImportRules::default());
        manager.cancel_import();
        assert!(!manager.is_running());
        assert!(manager.poll_progress().is_empty());
    }

    #[test]
    fn test_dead_worker_is_reported_as_failure() {
        let mut manager = ImportManager::new();
        let (tx, rx) = mpsc::channel::<ImportProgress>();
        manager.progress_rx = Some(rx);
        manager.cancel_flag = Some(Arc::new(AtomicBool::new(false)));

        let worker = std::thread::spawn(move || {
            let _ = tx.send(ImportProgress::Started {
                path: PathBuf::from("in.xlsx"),
            });
            panic!("reader blew up");
        });
        assert!(worker.join().is_err());

        let messages = manager.poll_progress();
        assert_eq!(messages.len(), 2);
        assert!(matches!(messages[0], ImportProgress::Started { .. }));
        match &messages[1] {
            ImportProgress::Failed { message, detail } => {
                assert_eq!(
                    message,
                    "Could not process the file. Check that it is a valid spreadsheet."
                );
                assert!(detail.contains("without reporting a result"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
        assert!(!manager.is_running());
        assert!(manager.poll_progress().is_empty());
    }

    #[test]
    fn test_panic_text_reads_str_and_string_payloads() {
        let caught = panic::catch_unwind(|| panic!("static message")).unwrap_err();
        assert_eq!(panic_text(caught.as_ref()), "static message");
        let caught = panic::catch_unwind(|| panic!("row {}", 7)).unwrap_err();
        assert_eq!(panic_text(caught.as_ref()), "row 7");
    }

    #[test]
    fn test_load_workbook_missing_file() {
        let result = load_workbook(Path::new("/definitely/not/here.xlsx"), &ImportRules::default());
        assert!(matches!(result, Err(ImportError::Io { .. })));
    }
}
