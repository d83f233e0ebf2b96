// Pickup Tracker - gui.rs
//
// Top-level eframe::App implementation.
// Wires together all UI panels and manages the import lifecycle.

use crate::app::import::ImportManager;
use crate::app::state::AppState;
use crate::core::export::ExportFormat;
use crate::core::model::ImportProgress;
use crate::platform::fs;
use crate::ui;

/// The Pickup Tracker application.
pub struct TrackerApp {
    pub state: AppState,
    pub import_manager: ImportManager,
}

impl TrackerApp {
    /// Create a new application instance with the given state.
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            import_manager: ImportManager::new(),
        }
    }

    fn poll_import(&mut self, ctx: &egui::Context) {
        let messages = self.import_manager.poll_progress();
        let had_messages = !messages.is_empty();
        for msg in messages {
            match msg {
                ImportProgress::Started { path } => {
                    self.state.status_message = format!("Reading {}...", path.display());
                }
                ImportProgress::Completed { records, summary } => {
                    self.state
                        .replace_records(records, summary, chrono::Utc::now());
                }
                ImportProgress::Failed { message, detail } => {
                    tracing::debug!(detail = %detail, "Import failure reported to UI");
                    self.state.import_failed(message);
                }
            }
        }
        // Repaint while an import is active so completion appears promptly.
        if had_messages || self.state.import_in_progress {
            ctx.request_repaint();
        }
    }

    fn start_pending_import(&mut self) {
        if let Some(path) = self.state.pending_import.take() {
            self.state.begin_import(&path);
            self.import_manager
                .start_import(path, self.state.rules.clone());
        }
    }

    fn render_menu(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Import Workbook\u{2026}").clicked() {
                    if let Some(path) = ui::panels::toolbar::pick_workbook() {
                        self.state.pending_import = Some(path);
                    }
                    ui.close_menu();
                }
                ui.separator();
                // Export entries are enabled only when there are visible records.
                ui.add_enabled_ui(self.state.can_export(), |ui| {
                    for format in [ExportFormat::Xlsx, ExportFormat::Csv, ExportFormat::Json] {
                        if ui.button(format!("Export {}\u{2026}", format.label())).clicked() {
                            ui::panels::toolbar::export_with_dialog(&mut self.state, format);
                            ui.close_menu();
                        }
                    }
                });
                ui.separator();
                if ui.button("Exit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });
            ui.menu_button("View", |ui| {
                if ui.button("Import Summary").clicked() {
                    self.state.show_summary = true;
                    ui.close_menu();
                }
                let theme_label = if self.state.dark_mode {
                    "Light Theme"
                } else {
                    "Dark Theme"
                };
                if ui.button(theme_label).clicked() {
                    self.state.dark_mode = !self.state.dark_mode;
                    ui::theme::apply(ctx, self.state.dark_mode);
                    ui.close_menu();
                }
                ui.add_enabled_ui(self.state.source_path.is_some(), |ui| {
                    if ui.button("Show Source Workbook").clicked() {
                        if let Some(path) = &self.state.source_path {
                            fs::reveal_in_file_manager(path);
                        }
                        ui.close_menu();
                    }
                });
            });
            ui.menu_button("Help", |ui| {
                if ui.button("About").clicked() {
                    self.state.show_about = true;
                    ui.close_menu();
                }
            });
        });
    }
}

impl eframe::App for TrackerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_import(ctx);

        // Files dropped on the window import like the picker.
        let dropped: Vec<_> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if let Some(path) = dropped.into_iter().find(|p| fs::is_workbook_path(p)) {
            self.state.pending_import = Some(path);
        }

        self.start_pending_import();

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            self.render_menu(ctx, ui);
        });

        // Toolbar with error banner
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui::panels::toolbar::render(ui, &mut self.state);
            ui.add_space(4.0);
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(&self.state.status_message);
                    if self.state.import_in_progress && ui.small_button("Cancel").clicked() {
                        self.import_manager.cancel_import();
                        self.state.import_in_progress = false;
                        self.state.status_message = "Import cancelled.".to_string();
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let total = self.state.records.len();
                        let visible = self.state.visible_indices.len();
                        if total > 0 {
                            ui.label(format!("{visible}/{total} records"));
                        }
                        if !self.state.warnings.is_empty() {
                            ui.colored_label(
                                ui::theme::WARNING_TEXT,
                                format!("{} config warning(s)", self.state.warnings.len()),
                            );
                        }
                    });
                });
            });

        // Central panel (record table)
        egui::CentralPanel::default().show(ctx, |ui| {
            ui::panels::records::render(ui, &mut self.state);
        });

        // Dialogs
        ui::panels::summary::render(ctx, &mut self.state);
        ui::panels::about::render(ctx, &mut self.state);
    }
}
