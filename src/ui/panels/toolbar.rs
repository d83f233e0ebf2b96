// Pickup Tracker - ui/panels/toolbar.rs
//
// Toolbar: import button, day-window selector, export button, and the error
// banner underneath. The file dialogs live here so the menu bar can reuse them.

use crate::app::state::AppState;
use crate::core::export::ExportFormat;
use crate::core::filter::DayWindow;
use crate::ui::theme;
use crate::util::constants;
use std::path::{Path, PathBuf};

/// Render the toolbar row.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        let import_button = egui::Button::new("\u{1f4c2} Import workbook\u{2026}");
        if ui
            .add_enabled(!state.import_in_progress, import_button)
            .on_hover_text("Load a carrier tracking workbook")
            .clicked()
        {
            if let Some(path) = pick_workbook() {
                state.pending_import = Some(path);
            }
        }
        if state.import_in_progress {
            ui.spinner();
        }

        ui.separator();

        ui.label("Show:");
        let mut selected = state.day_window;
        egui::ComboBox::from_id_salt("day_window")
            .selected_text(selected.label())
            .show_ui(ui, |ui| {
                for window in day_window_choices(state.day_window) {
                    ui.selectable_value(&mut selected, window, window.label());
                }
            });
        if selected != state.day_window {
            state.set_day_window(selected, chrono::Utc::now());
        }

        ui.separator();

        ui.add_enabled_ui(state.can_export(), |ui| {
            if ui
                .button("\u{1f4be} Export XLSX\u{2026}")
                .on_disabled_hover_text("Nothing to export")
                .clicked()
            {
                export_with_dialog(state, ExportFormat::Xlsx);
            }
        });
    });

    render_banner(ui, state);
}

/// Error banner, shown until dismissed or the next import starts.
fn render_banner(ui: &mut egui::Ui, state: &mut AppState) {
    let Some(message) = state.error_message.clone() else {
        return;
    };
    ui.add_space(4.0);
    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new(format!(" \u{26a0} {message} "))
                .strong()
                .color(theme::BANNER_TEXT)
                .background_color(theme::BANNER_BG),
        );
        if ui.small_button("\u{2715}").on_hover_text("Dismiss").clicked() {
            state.error_message = None;
        }
    });
}

/// Selector entries. A configured window that is not one of the standard
/// choices is offered too, so the selector can show it.
fn day_window_choices(current: DayWindow) -> Vec<DayWindow> {
    let mut choices: Vec<DayWindow> = constants::DAY_WINDOW_CHOICES
        .iter()
        .map(|&days| DayWindow::from_days(days))
        .collect();
    if !choices.contains(&current) {
        choices.push(current);
        choices.sort_by_key(DayWindow::days);
    }
    choices
}

/// Ask the user for a workbook to import.
pub fn pick_workbook() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Workbooks", constants::WORKBOOK_EXTENSIONS)
        .pick_file()
}

/// Ask for a destination and export the visible records there.
pub fn export_with_dialog(state: &mut AppState, format: ExportFormat) {
    let file_name = Path::new(&state.export_file_name)
        .with_extension(format.extension())
        .to_string_lossy()
        .into_owned();

    let mut dialog = rfd::FileDialog::new()
        .add_filter(format.label(), &[format.extension()])
        .set_file_name(file_name);
    if let Some(dir) = &state.export_dir {
        dialog = dialog.set_directory(dir);
    }

    if let Some(dest) = dialog.save_file() {
        let result = state.export_to(&dest);
        state.report_export(&dest, &result);
    }
}
