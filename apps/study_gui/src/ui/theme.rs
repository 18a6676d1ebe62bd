use eframe::egui;
use egui::{Color32, Stroke};

pub const BACKDROP: Color32 = Color32::from_rgb(0xe9, 0xdc, 0xfb);
pub const SHEET: Color32 = Color32::from_rgb(0xfd, 0xfc, 0xff);
pub const ACCENT: Color32 = Color32::from_rgb(0x5e, 0x35, 0xb1);
pub const SUMMARY_FILL: Color32 = Color32::from_rgb(0xf3, 0xe5, 0xf5);
pub const SCORE_FILL: Color32 = Color32::from_rgb(0xe8, 0xf5, 0xe9);
pub const QUESTION_FILL: Color32 = Color32::WHITE;
pub const CORRECT: Color32 = Color32::from_rgb(0x2e, 0x7d, 0x32);
pub const INCORRECT: Color32 = Color32::from_rgb(0xc6, 0x28, 0x28);
pub const MUTED_TEXT: Color32 = Color32::from_rgb(0x61, 0x61, 0x61);

pub fn visuals() -> egui::Visuals {
    let mut visuals = egui::Visuals::light();
    visuals.panel_fill = BACKDROP;
    visuals.window_fill = SHEET;
    visuals.selection.bg_fill = ACCENT;
    visuals.selection.stroke = Stroke::new(1.0, Color32::WHITE);
    visuals.hyperlink_color = ACCENT;
    visuals.widgets.active.bg_fill = ACCENT;
    visuals
}

pub fn card(fill: Color32) -> egui::Frame {
    egui::Frame::NONE
        .fill(fill)
        .stroke(Stroke::new(1.0, Color32::from_rgb(0xd6, 0xc8, 0xea)))
        .corner_radius(10.0)
        .inner_margin(egui::Margin::symmetric(16, 12))
}

pub fn sheet() -> egui::Frame {
    egui::Frame::NONE
        .fill(SHEET)
        .corner_radius(16.0)
        .inner_margin(egui::Margin::same(24))
}
