// WolPanel - ui/theme.rs
//
// Colour scheme, log type colour mapping, and layout constants.
// No dependencies on app state or business logic.

use crate::app::state::NoticeKind;
use crate::core::model::LogKind;
use egui::Color32;

/// Colour for a log type badge.
pub fn log_kind_colour(kind: &LogKind, dark_mode: bool) -> Color32 {
    match (kind, dark_mode) {
        (LogKind::Error, true) => Color32::from_rgb(248, 113, 113), // Red 400
        (LogKind::Error, false) => Color32::from_rgb(185, 28, 28),  // Red 700
        (LogKind::Warning, true) => Color32::from_rgb(251, 191, 36), // Amber 400
        (LogKind::Warning, false) => Color32::from_rgb(180, 83, 9), // Amber 700
        (LogKind::Success, true) => Color32::from_rgb(74, 222, 128), // Green 400
        (LogKind::Success, false) => Color32::from_rgb(21, 128, 61), // Green 700
        (LogKind::Info, true) => Color32::from_rgb(96, 165, 250),   // Blue 400
        (LogKind::Info, false) => Color32::from_rgb(29, 78, 216),   // Blue 700
        (LogKind::Other(_), true) => Color32::from_rgb(156, 163, 175), // Gray 400
        (LogKind::Other(_), false) => Color32::from_rgb(75, 85, 99), // Gray 600
    }
}

/// Foreground colour for log row text.
pub fn row_text_colour(dark_mode: bool) -> Color32 {
    if dark_mode {
        Color32::from_rgb(229, 231, 235) // Gray 200
    } else {
        Color32::from_rgb(17, 24, 39) // Gray 900
    }
}

/// Text colour for a banner or inline notice.
pub fn notice_colour(kind: NoticeKind, dark_mode: bool) -> Color32 {
    match kind {
        NoticeKind::Error => log_kind_colour(&LogKind::Error, dark_mode),
        NoticeKind::Success => log_kind_colour(&LogKind::Success, dark_mode),
        NoticeKind::Info => log_kind_colour(&LogKind::Info, dark_mode),
    }
}

/// Subtle background for a banner.
pub fn notice_bg_colour(kind: NoticeKind) -> Color32 {
    match kind {
        NoticeKind::Error => Color32::from_rgba_premultiplied(185, 28, 28, 30),
        NoticeKind::Success => Color32::from_rgba_premultiplied(21, 128, 61, 30),
        NoticeKind::Info => Color32::from_rgba_premultiplied(29, 78, 216, 30),
    }
}

/// Stroke colour around a form field that failed validation.
pub const INVALID_FIELD_STROKE: Color32 = Color32::from_rgb(220, 38, 38); // Red 600

/// Layout constants.
pub const CLIENTS_PANEL_WIDTH: f32 = 460.0;
pub const FORM_LABEL_WIDTH: f32 = 120.0;
pub const ROW_HEIGHT: f32 = 20.0;
pub const LOG_FONT_SIZE: f32 = 12.0;

/// Apply the dark/light theme and scale every text style to `font_size`.
pub fn apply(ctx: &egui::Context, dark_mode: bool, font_size: f32) {
    ctx.set_theme(if dark_mode {
        egui::Theme::Dark
    } else {
        egui::Theme::Light
    });

    let scale = font_size / crate::util::constants::DEFAULT_FONT_SIZE;
    let mut style = (*ctx.style()).clone();
    style.text_styles = egui::Style::default()
        .text_styles
        .into_iter()
        .map(|(text_style, mut font)| {
            font.size *= scale;
            (text_style, font)
        })
        .collect();
    ctx.set_style(style);
}
