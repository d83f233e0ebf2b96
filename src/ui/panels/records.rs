// Pickup Tracker - ui/panels/records.rs
//
// Record table (central area).
//
// Uses `ScrollArea::show_rows` so only rows inside the viewport are laid out.
// Header buttons sort the table; the arrow marks the active column and
// direction. The status column is the only editable cell.

use crate::app::state::AppState;
use crate::core::model::Status;
use crate::core::sort::SortKey;
use crate::ui::theme;

/// Render the record table.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    let visible = state.visible_indices.len();

    if visible == 0 {
        ui.centered_and_justified(|ui| {
            if state.records.is_empty() {
                ui.label("No records loaded.\nImport a workbook via File \u{2192} Import.");
            } else {
                ui.label("No records fall inside the selected day window.");
            }
        });
        return;
    }

    render_header(ui, state);
    ui.separator();

    // Status edits are collected and applied after show_rows so `state` is
    // not mutably borrowed while rows still reference its records.
    let mut status_change: Option<(String, Status)> = None;
    let row_height = theme::ROW_HEIGHT;

    egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .show_rows(ui, row_height, visible, |ui, row_range| {
            for display_idx in row_range {
                let Some(&record_idx) = state.visible_indices.get(display_idx) else {
                    continue;
                };
                let Some(record) = state.records.get(record_idx) else {
                    continue;
                };

                ui.horizontal(|ui| {
                    let date = record.last_event_date.as_deref().unwrap_or("--");
                    let cells = [
                        record.reference.as_str(),
                        record.last_event.as_str(),
                        date,
                        record.invoice_value.as_str(),
                    ];
                    for (text, width) in cells.iter().zip(theme::COLUMN_WIDTHS) {
                        ui.add_sized(
                            [width, row_height],
                            egui::Label::new(egui::RichText::new(*text).monospace()).truncate(),
                        );
                    }

                    let mut selected = record.status;
                    egui::ComboBox::from_id_salt(status_combo_id(&record.reference))
                        .width(theme::COLUMN_WIDTHS[4])
                        .selected_text(
                            egui::RichText::new(selected.label())
                                .color(theme::status_colour(selected, state.dark_mode)),
                        )
                        .show_ui(ui, |ui| {
                            for status in Status::all() {
                                ui.selectable_value(&mut selected, *status, status.label());
                            }
                        });
                    if selected != record.status {
                        status_change = Some((record.reference.clone(), selected));
                    }
                });
            }
        });

    if let Some((reference, status)) = status_change {
        state.set_status(&reference, status);
    }
}

/// Id of a row's status selector. Keyed by reference so popup state stays
/// with its record when the table is re-sorted.
fn status_combo_id(reference: &str) -> egui::Id {
    egui::Id::new(("status", reference))
}

/// Clickable column headers.
fn render_header(ui: &mut egui::Ui, state: &mut AppState) {
    let mut clicked: Option<SortKey> = None;

    ui.horizontal(|ui| {
        for (key, width) in SortKey::all().iter().zip(theme::COLUMN_WIDTHS) {
            let text = match state.sort_state {
                Some(sort) if sort.key == *key => {
                    format!("{} {}", key.label(), sort.direction.arrow())
                }
                _ => key.label().to_string(),
            };
            let button = egui::Button::new(egui::RichText::new(text).strong()).frame(false);
            if ui
                .add_sized([width, theme::ROW_HEIGHT], button)
                .on_hover_text("Click to sort")
                .clicked()
            {
                clicked = Some(*key);
            }
        }
    });

    if let Some(key) = clicked {
        state.sort_by(key, chrono::Utc::now());
    }
}
