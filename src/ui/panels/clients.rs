// WolPanel - ui/panels/clients.rs
//
// Client configuration list: one collapsible panel per client, each holding
// an editable form with inline validation errors and save feedback.
//
// Buttons only record what was clicked; the actions are applied to
// `AppState` after the scroll area releases its borrows of the panels.

use crate::app::state::{AppState, PanelState};
use crate::core::model::ClientId;
use crate::core::validate::Field;
use crate::ui::theme;
use egui::RichText;

enum PanelAction {
    Toggle(ClientId),
    TogglePassword(ClientId),
    Submit(ClientId),
    Cancel(ClientId),
    Delete(ClientId),
}

/// Render the client list.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        ui.heading("Clients");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .button("\u{2795} Add client")
                .on_hover_text("Add a blank client. It is sent to the relay when saved.")
                .clicked()
            {
                state.add_new_client(chrono::Utc::now().timestamp_millis());
            }
        });
    });
    ui.separator();

    if state.clients.is_empty() {
        ui.add_space(8.0);
        let hint = if state.busy_message.is_some() {
            "Loading clients..."
        } else {
            "No clients configured. Use \u{201c}Add client\u{201d} to create one."
        };
        ui.label(RichText::new(hint).weak());
        return;
    }

    let ids: Vec<ClientId> = state.clients.ids().collect();
    let focus = state.focus_client;
    let dark_mode = state.dark_mode;
    let mut actions = Vec::new();

    egui::ScrollArea::vertical()
        .id_salt("clients_scroll")
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            for id in ids {
                let Some(title) = state.clients.get(id).map(|c| c.topic.clone()) else {
                    continue;
                };
                let Some(panel) = state.panels.get_mut(&id) else {
                    continue;
                };
                render_panel(
                    ui,
                    id,
                    &title,
                    panel,
                    focus == Some(id),
                    dark_mode,
                    &mut actions,
                );
                ui.add_space(6.0);
            }
        });

    if focus.is_some() {
        state.focus_client = None;
    }

    for action in actions {
        match action {
            PanelAction::Toggle(id) => state.toggle_expanded(id),
            PanelAction::TogglePassword(id) => state.toggle_password(id),
            PanelAction::Submit(id) => {
                state.submit_client(id);
            }
            PanelAction::Cancel(id) => state.cancel_edit(id),
            PanelAction::Delete(id) => state.request_delete(id),
        }
    }
}

fn render_panel(
    ui: &mut egui::Ui,
    id: ClientId,
    title: &str,
    panel: &mut PanelState,
    focus: bool,
    dark_mode: bool,
    actions: &mut Vec<PanelAction>,
) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());

        let arrow = if panel.expanded { "\u{25be}" } else { "\u{25b8}" };
        let header = ui
            .add(egui::Button::new(RichText::new(format!("{arrow}  {title}")).strong()).frame(false))
            .on_hover_text(if panel.expanded {
                "Collapse"
            } else {
                "Expand to edit"
            });
        if header.clicked() {
            actions.push(PanelAction::Toggle(id));
        }

        if !panel.expanded {
            return;
        }

        ui.add_space(4.0);
        egui::Grid::new(("client_form", id.0))
            .num_columns(2)
            .spacing([8.0, 6.0])
            .min_col_width(theme::FORM_LABEL_WIDTH)
            .show(ui, |ui| {
                for &field in Field::all() {
                    ui.label(field.label());
                    let error = panel.errors.get(field);
                    ui.vertical(|ui| {
                        ui.horizontal(|ui| {
                            let mut edit = egui::TextEdit::singleline(
                                field.value_mut(&mut panel.draft),
                            )
                            .desired_width(220.0)
                            .hint_text(hint_for(field));
                            if field == Field::Password {
                                edit = edit.password(!panel.show_password);
                            }
                            let response = ui.add(edit);

                            if error.is_some() {
                                ui.painter().rect_stroke(
                                    response.rect.expand(1.0),
                                    2.0,
                                    egui::Stroke::new(1.5, theme::INVALID_FIELD_STROKE),
                                    egui::StrokeKind::Outside,
                                );
                            }
                            if focus && field == Field::Topic {
                                response.request_focus();
                                response.scroll_to_me(Some(egui::Align::Center));
                            }

                            if field == Field::Password {
                                let label = if panel.show_password { "Hide" } else { "Show" };
                                if ui.small_button(label).clicked() {
                                    actions.push(PanelAction::TogglePassword(id));
                                }
                            }
                        });
                        if let Some(msg) = error {
                            ui.label(
                                RichText::new(msg)
                                    .small()
                                    .color(theme::INVALID_FIELD_STROKE),
                            );
                        }
                    });
                    ui.end_row();
                }
            });

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            if ui.button("Save").clicked() {
                actions.push(PanelAction::Submit(id));
            }
            if ui
                .button("Cancel")
                .on_hover_text("Discard edits and reload the list from the relay")
                .clicked()
            {
                actions.push(PanelAction::Cancel(id));
            }
            if ui
                .button(RichText::new("Delete").color(theme::INVALID_FIELD_STROKE))
                .clicked()
            {
                actions.push(PanelAction::Delete(id));
            }

            if let Some(ref notice) = panel.notice {
                ui.add_space(8.0);
                ui.label(RichText::new(&notice.text).color(theme::notice_colour(notice.kind, dark_mode)));
            }
        });
    });
}

fn hint_for(field: Field) -> &'static str {
    match field {
        Field::Topic => "MQTT topic",
        Field::TargetMac => "AA:BB:CC:DD:EE:FF",
        Field::BroadcastIp => "192.168.1.255",
        Field::Ip => "192.168.1.10",
        Field::Username => "",
        Field::Password => "",
    }
}
