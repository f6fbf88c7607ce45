// WolPanel - ui/panels/confirm.rs
//
// Confirmation dialog for destructive actions (deleting a client, clearing
// the activity log). Closing the window counts as declining.

use crate::app::state::{AppState, PendingConfirm};
use std::time::Instant;

/// Render the confirmation dialog (if `state.confirm` is set).
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    let Some(pending) = state.confirm else {
        return;
    };

    let (title, text, accept_label) = match pending {
        PendingConfirm::DeleteClient(id) => {
            let topic = state
                .clients
                .get(id)
                .map_or("this client", |c| c.topic.as_str());
            (
                "Delete client",
                format!(
                    "Delete client \u{201c}{topic}\u{201d}?\n\
                     The remaining list is saved to the relay immediately."
                ),
                "Delete",
            )
        }
        PendingConfirm::ClearLogs => (
            "Clear logs",
            "Clear all locally stored log entries?\n\
             Logs held by the relay are not affected."
                .to_string(),
            "Clear",
        ),
    };

    let mut answer: Option<bool> = None;
    let mut open = true;
    egui::Window::new(title)
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .min_width(320.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(4.0);
            ui.label(text);
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if ui.button(accept_label).clicked() {
                    answer = Some(true);
                }
                if ui.button("Cancel").clicked() {
                    answer = Some(false);
                }
            });
        });

    if !open {
        answer = Some(false);
    }
    if let Some(accepted) = answer {
        state.answer_confirm(accepted, Instant::now());
    }
}
