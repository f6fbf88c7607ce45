// WolPanel - gui.rs
//
// Top-level eframe::App implementation.
// Wires together all UI panels and drives the controller once per frame.

use crate::app::controller::Controller;
use crate::app::state::AppState;
use crate::core::model::LogEntry;
use crate::ui;
use std::path::Path;
use std::time::{Duration, Instant};

/// How often to wake up while nothing else requests a repaint, so polled
/// log records and request replies show up without user input.
const IDLE_REPAINT: Duration = Duration::from_millis(250);

/// The WolPanel application.
pub struct WolPanelApp {
    pub controller: Controller,
    /// Theme settings last pushed to the egui context.
    applied_theme: Option<(bool, f32)>,
}

impl WolPanelApp {
    /// Create the application and start the initial load and log polling.
    pub fn new(mut controller: Controller) -> Self {
        controller.start();
        Self {
            controller,
            applied_theme: None,
        }
    }

    fn apply_theme(&mut self, ctx: &egui::Context) {
        let wanted = (
            self.controller.state.dark_mode,
            self.controller.state.font_size,
        );
        if self.applied_theme != Some(wanted) {
            ui::theme::apply(ctx, wanted.0, wanted.1);
            self.applied_theme = Some(wanted);
        }
    }
}

impl eframe::App for WolPanelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.controller.tick(now);
        self.apply_theme(ctx);

        let state = &mut self.controller.state;

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Reload Clients").clicked() {
                        state.request_reload = true;
                        ui.close_menu();
                    }
                    ui.separator();
                    let has_entries = state.logs.visible_count() > 0;
                    ui.add_enabled_ui(has_entries, |ui| {
                        ui.menu_button("Export Logs", |ui| {
                            if ui.button("Export CSV...").clicked() {
                                export_visible(state, ExportFormat::Csv);
                                ui.close_menu();
                            }
                            if ui.button("Export JSON...").clicked() {
                                export_visible(state, ExportFormat::Json);
                                ui.close_menu();
                            }
                        });
                    });
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("View", |ui| {
                    if ui.checkbox(&mut state.dark_mode, "Dark mode").changed() {
                        ui.close_menu();
                    }
                });
                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        state.show_about = true;
                        ui.close_menu();
                    }
                });
            });
        });

        // Banner (load failure, logs cleared, ...)
        if state.banner.is_some() {
            let mut dismiss = false;
            egui::TopBottomPanel::top("banner").show(ctx, |ui| {
                if let Some(ref banner) = state.banner {
                    egui::Frame::new()
                        .fill(ui::theme::notice_bg_colour(banner.kind))
                        .inner_margin(6.0)
                        .show(ui, |ui| {
                            ui.horizontal(|ui| {
                                ui.label(
                                    egui::RichText::new(&banner.text).color(
                                        ui::theme::notice_colour(banner.kind, state.dark_mode),
                                    ),
                                );
                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Center),
                                    |ui| {
                                        if ui.small_button("\u{2715}").clicked() {
                                            dismiss = true;
                                        }
                                    },
                                );
                            });
                        });
                }
            });
            if dismiss {
                state.banner = None;
            }
        }

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(ref busy) = state.busy_message {
                    ui.spinner();
                    ui.label(busy);
                    ui.separator();
                }
                ui.label(&state.status_message);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if state.debug_mode {
                        ui.label(egui::RichText::new("DEBUG").small().strong());
                    }
                    ui.label(egui::RichText::new(&state.server_url).monospace().weak());
                    ui.label(format!("{} client(s)", state.clients.len()));
                });
            });
        });

        // Client list (left)
        egui::SidePanel::left("clients_panel")
            .default_width(ui::theme::CLIENTS_PANEL_WIDTH)
            .resizable(true)
            .show(ctx, |ui| {
                ui::panels::clients::render(ui, state);
            });

        // Activity log (central)
        egui::CentralPanel::default().show(ctx, |ui| {
            ui::panels::logs::render(ui, state);
        });

        // Dialogs
        ui::panels::confirm::render(ctx, state);
        ui::panels::about::render(ctx, state);

        // Apply what the panels requested this frame without waiting for the
        // next tick.
        self.controller.dispatch_requests();

        let mut wake = IDLE_REPAINT;
        if let Some(expiry) = self.controller.state.next_notice_expiry() {
            wake = wake.min(expiry.saturating_duration_since(now));
        }
        ctx.request_repaint_after(wake);
    }

    /// Called by eframe when the application window is about to close.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.controller.shutdown();
    }
}

#[derive(Debug, Clone, Copy)]
enum ExportFormat {
    Csv,
    Json,
}

/// Ask for a destination and write the visible log entries to it.
fn export_visible(state: &mut AppState, format: ExportFormat) {
    let (label, ext) = match format {
        ExportFormat::Csv => ("CSV", "csv"),
        ExportFormat::Json => ("JSON", "json"),
    };
    let Some(dest) = rfd::FileDialog::new()
        .add_filter(label, &[ext])
        .set_file_name(format!("wol_logs.{ext}"))
        .save_file()
    else {
        return;
    };

    let entries: Vec<&LogEntry> = state.logs.visible_entries().collect();
    state.status_message = match write_export(&entries, &dest, format) {
        Ok(n) => format!("Exported {n} entries to {label}."),
        Err(e) => {
            tracing::warn!(error = %e, "Log export failed");
            format!("{label} export failed: {e}")
        }
    };
}

fn write_export(
    entries: &[&LogEntry],
    dest: &Path,
    format: ExportFormat,
) -> crate::util::error::Result<usize> {
    let file = std::fs::File::create(dest).map_err(|e| crate::util::error::ExportError::Io {
        path: dest.to_path_buf(),
        source: e,
    })?;
    let n = match format {
        ExportFormat::Csv => crate::core::export::export_csv(entries, file, dest)?,
        ExportFormat::Json => crate::core::export::export_json(entries, file, dest)?,
    };
    Ok(n)
}
