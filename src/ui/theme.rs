// Pickup Tracker - ui/theme.rs
//
// Colour scheme, status colour mapping, and layout constants.
// No dependencies on app state or business logic.

use crate::core::model::Status;
use egui::Color32;

/// Text colour for a follow-up status.
pub fn status_colour(status: Status, dark_mode: bool) -> Color32 {
    match (status, dark_mode) {
        (Status::Pending, true) => Color32::from_rgb(252, 211, 77), // Amber 300
        (Status::Pending, false) => Color32::from_rgb(180, 83, 9),  // Amber 700
        (Status::Resolved, true) => Color32::from_rgb(74, 222, 128), // Green 400
        (Status::Resolved, false) => Color32::from_rgb(21, 128, 61), // Green 700
        (Status::Lost, true) => Color32::from_rgb(248, 113, 113),   // Red 400
        (Status::Lost, false) => Color32::from_rgb(185, 28, 28),    // Red 700
    }
}

/// Apply the dark or light egui visuals.
pub fn apply(ctx: &egui::Context, dark_mode: bool) {
    ctx.set_visuals(if dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    });
}

/// Error banner colours.
pub const BANNER_BG: Color32 = Color32::from_rgb(127, 29, 29); // Red 900
pub const BANNER_TEXT: Color32 = Color32::from_rgb(254, 226, 226); // Red 100

/// Warning text (config warnings, undated rows).
pub const WARNING_TEXT: Color32 = Color32::from_rgb(253, 186, 116); // Orange 300

/// Layout constants.
pub const ROW_HEIGHT: f32 = 24.0;
pub const STATUS_BAR_HEIGHT: f32 = 28.0;

/// Record table column widths, in table column order.
pub const COLUMN_WIDTHS: [f32; 5] = [160.0, 220.0, 200.0, 130.0, 120.0];
