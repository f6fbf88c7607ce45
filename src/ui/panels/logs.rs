// WolPanel - ui/panels/logs.rs
//
// Activity log view: search box and type filter above a virtual-scrolling
// list of entries.
//
// Uses egui's `ScrollArea::show_rows` which renders only the rows currently
// visible in the viewport, so the cost of a frame does not grow with the
// number of stored entries. Each row is a LayoutJob: the type badge carries
// its type colour, the rest of the line uses `theme::row_text_colour`.

use crate::app::state::AppState;
use crate::core::filter::FilterState;
use crate::core::model::LogKind;
use crate::ui::theme;
use egui::text::{LayoutJob, TextFormat};

/// Render the activity log (central area).
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        ui.heading("Activity log");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let has_entries = !state.logs.entries().is_empty();
            if ui
                .add_enabled(has_entries, egui::Button::new("Clear logs"))
                .on_hover_text("Erase the locally stored history")
                .clicked()
            {
                state.request_clear_logs();
            }
        });
    });
    ui.separator();

    render_filter_bar(ui, state);
    ui.add_space(4.0);

    let visible = state.logs.visible_count();
    if visible == 0 {
        ui.centered_and_justified(|ui| {
            if state.logs.entries().is_empty() {
                ui.label("No log entries yet.");
            } else {
                ui.label("No entries match the current filters.");
            }
        });
        return;
    }

    let row_height = theme::ROW_HEIGHT;
    let jump = std::mem::take(&mut state.logs.scroll_to_latest);
    let dark_mode = state.dark_mode;

    let mut area = egui::ScrollArea::vertical()
        .id_salt("log_rows")
        .auto_shrink([false; 2])
        .stick_to_bottom(true);
    if jump {
        let spacing = ui.spacing().item_spacing.y;
        area = area.vertical_scroll_offset(visible as f32 * (row_height + spacing));
    }

    area.show_rows(ui, row_height, visible, |ui, row_range| {
        for row in row_range {
            let Some(entry) = state.logs.visible_entry(row) else {
                continue;
            };

            let font = egui::FontId::monospace(theme::LOG_FONT_SIZE);
            let body_colour = theme::row_text_colour(dark_mode);
            let ts = entry
                .timestamp
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S");

            let mut job = LayoutJob::default();
            job.append(
                &format!("{ts}  "),
                0.0,
                TextFormat {
                    font_id: font.clone(),
                    color: body_colour,
                    ..Default::default()
                },
            );
            job.append(
                &format!("[{:<7}] ", entry.kind.as_str()),
                0.0,
                TextFormat {
                    font_id: font.clone(),
                    color: theme::log_kind_colour(&entry.kind, dark_mode),
                    ..Default::default()
                },
            );
            if !entry.source.is_empty() {
                job.append(
                    &format!("{}: ", entry.source),
                    0.0,
                    TextFormat {
                        font_id: font.clone(),
                        color: ui.style().visuals.weak_text_color(),
                        ..Default::default()
                    },
                );
            }
            job.append(
                &entry.message,
                0.0,
                TextFormat {
                    font_id: font,
                    color: body_colour,
                    ..Default::default()
                },
            );

            ui.label(job);
        }
    });
}

fn render_filter_bar(ui: &mut egui::Ui, state: &mut AppState) {
    let mut changed = false;
    let mut reset = false;

    ui.horizontal(|ui| {
        ui.label("Search:");
        changed |= ui
            .add(
                egui::TextEdit::singleline(&mut state.logs.filter_mut().text_search)
                    .hint_text("message text")
                    .desired_width(200.0),
            )
            .changed();

        ui.label("Type:");
        let selected = state
            .logs
            .filter()
            .kind
            .as_ref()
            .map_or_else(|| "All".to_string(), |k| k.label().to_string());
        egui::ComboBox::from_id_salt("log_type_filter")
            .selected_text(selected)
            .show_ui(ui, |ui| {
                let filter = state.logs.filter_mut();
                changed |= ui.selectable_value(&mut filter.kind, None, "All").changed();
                for kind in LogKind::KNOWN {
                    changed |= ui
                        .selectable_value(&mut filter.kind, Some(kind.clone()), kind.label())
                        .changed();
                }
            });

        if !state.logs.filter().is_empty() && ui.small_button("Reset").clicked() {
            reset = true;
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(
                egui::RichText::new(format!(
                    "{}/{} entries",
                    state.logs.visible_count(),
                    state.logs.entries().len()
                ))
                .weak(),
            );
        });
    });

    if reset {
        state.logs.set_filter(FilterState::default());
    } else if changed {
        state.logs.apply_filter();
    }
}
