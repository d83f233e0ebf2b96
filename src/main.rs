// Pickup Tracker - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation
// 3. Headless export (--export) or eframe GUI launch

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` can use
// `crate::app::...`, `crate::core::...` etc.
pub use pickup_tracker::app;
pub use pickup_tracker::core;
pub use pickup_tracker::platform;
pub use pickup_tracker::ui;
pub use pickup_tracker::util;

use crate::core::filter::DayWindow;
use crate::core::sort::SortKey;
use crate::util::constants;
use clap::Parser;
use std::path::{Path, PathBuf};

/// Pickup Tracker - follow up on carrier pickups.
///
/// Imports a carrier tracking workbook, keeps the pickup rows still in the
/// collection stage, and lets you mark each one before exporting the list.
#[derive(Parser, Debug)]
#[command(name = "pickup-tracker", version, about)]
struct Cli {
    /// Workbook to import on start (xlsx, xls, xlsb or ods).
    path: Option<PathBuf>,

    /// Export the processed records to this file and exit without a window.
    /// The format follows the extension: .xlsx, .csv or .json.
    #[arg(short = 'e', long = "export", requires = "path")]
    export: Option<PathBuf>,

    /// Only keep records from the last N days (0 = all dates).
    #[arg(
        short = 'n',
        long = "days",
        value_parser = clap::value_parser!(u32).range(0..=i64::from(constants::MAX_DAY_WINDOW_DAYS))
    )]
    days: Option<u32>,

    /// Sort by column: reference, event, date, value or status.
    #[arg(short = 's', long = "sort")]
    sort: Option<SortKey>,

    /// Sort descending instead of ascending.
    #[arg(long = "desc", requires = "sort")]
    desc: bool,

    /// Directory holding config.toml (overrides the platform default).
    #[arg(short = 'c', long = "config-dir")]
    config_dir: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    // Config is read before logging so its [logging] level can apply.
    let platform_paths = platform::config::PlatformPaths::resolve();
    let config_dir = cli
        .config_dir
        .clone()
        .unwrap_or_else(|| platform_paths.config_dir.clone());
    let (config, config_warnings) = platform::config::load_config(&config_dir);

    util::logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        config_dir = %config_dir.display(),
        "Pickup Tracker starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    let mut state = app::state::AppState::new(&config, cli.debug);
    state.warnings = config_warnings;
    state.export_dir = Some(platform_paths.export_dir);
    if let Some(days) = cli.days {
        state.day_window = DayWindow::from_days(days);
    }

    if let (Some(input), Some(output)) = (&cli.path, &cli.export) {
        match run_headless(&mut state, input, output, cli.sort, cli.desc) {
            Ok(count) => {
                println!("Exported {count} records to {}", output.display());
            }
            Err(e) => {
                tracing::error!(error = %e, "Headless export failed");
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    if let Some(path) = cli.path {
        state.pending_import = Some(path);
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!("{} v{}", constants::APP_NAME, constants::APP_VERSION))
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([720.0, 420.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    let dark_mode = state.dark_mode;
    let result = eframe::run_native(
        constants::APP_NAME,
        native_options,
        Box::new(move |cc| {
            ui::theme::apply(&cc.egui_ctx, dark_mode);
            Ok(Box::new(gui::TrackerApp::new(state)))
        }),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch Pickup Tracker GUI: {e}");
        std::process::exit(1);
    }
}

/// Import `input`, apply the day window and sort, and write `output`.
fn run_headless(
    state: &mut app::state::AppState,
    input: &Path,
    output: &Path,
    sort: Option<SortKey>,
    descending: bool,
) -> util::error::Result<usize> {
    let outcome = app::import::load_workbook(input, &state.rules)?;
    let now = chrono::Utc::now();
    state.replace_records(outcome.records, outcome.summary, now);

    if let Some(key) = sort {
        state.sort_by(key, now);
        if descending {
            // A second click on the same column flips it to descending.
            state.sort_by(key, now);
        }
    }

    let count = state.export_to(output)?;
    Ok(count)
}
