// Pickup Tracker - ui/panels/summary.rs
//
// Import summary window: what happened to the rows of the last workbook.
// Config warnings are listed underneath.

use crate::app::state::AppState;
use crate::ui::theme;

/// Render the import summary dialog (if state.show_summary is true).
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    if !state.show_summary {
        return;
    }

    let mut open = true;
    egui::Window::new("Import Summary")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .min_width(360.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            if let Some(ref summary) = state.import_summary {
                if let Some(path) = &summary.path {
                    ui.label(egui::RichText::new(path.display().to_string()).monospace());
                    ui.add_space(4.0);
                }

                egui::Grid::new("import_summary")
                    .num_columns(2)
                    .spacing([16.0, 4.0])
                    .show(ui, |ui| {
                        ui.label("Data rows:");
                        ui.label(summary.data_rows.to_string());
                        ui.end_row();

                        ui.label("Rows without a readable date:");
                        let colour = if summary.undated_rows > 0 {
                            theme::WARNING_TEXT
                        } else {
                            ui.style().visuals.text_color()
                        };
                        ui.colored_label(colour, summary.undated_rows.to_string());
                        ui.end_row();

                        ui.label("Rows filtered out:");
                        ui.label(summary.filtered_out.to_string());
                        ui.end_row();

                        ui.label("Duplicates collapsed:");
                        ui.label(summary.duplicates_collapsed.to_string());
                        ui.end_row();

                        ui.label("Records loaded:");
                        ui.strong(summary.records.to_string());
                        ui.end_row();

                        ui.label("Duration:");
                        ui.label(format!("{:.2}s", summary.duration.as_secs_f64()));
                        ui.end_row();
                    });
            } else {
                ui.label("No workbook has been imported yet.");
            }

            if !state.warnings.is_empty() {
                ui.add_space(8.0);
                ui.separator();
                ui.strong(format!("Configuration warnings ({})", state.warnings.len()));
                egui::ScrollArea::vertical()
                    .id_salt("summary_warnings")
                    .max_height(120.0)
                    .show(ui, |ui| {
                        for warn in &state.warnings {
                            ui.label(egui::RichText::new(warn).color(theme::WARNING_TEXT).size(11.5));
                        }
                    });
            }

            ui.add_space(8.0);
            ui.separator();
            if ui.button("Close").clicked() {
                state.show_summary = false;
            }
        });

    if !open {
        state.show_summary = false;
    }
}
