use egui::{Color32, FontId, Rounding, Stroke, Visuals};

use crate::model::TaskState;
use crate::state::NoticeLevel;

// ── Palette ──────────────────────────────────────────────────────────────────

pub const BG_DARK: Color32 = Color32::from_rgb(24, 24, 32);
pub const BG_PANEL: Color32 = Color32::from_rgb(30, 30, 40);
pub const BG_HEADER: Color32 = Color32::from_rgb(73, 80, 87);
pub const BG_FIELD: Color32 = Color32::from_rgb(20, 20, 28);
pub const BG_ROW_EVEN: Color32 = Color32::from_rgba_premultiplied(255, 255, 255, 6);
pub const BG_SELECTED: Color32 = Color32::from_rgba_premultiplied(80, 140, 220, 45);
pub const BG_STATUS_BAR: Color32 = Color32::from_rgb(22, 22, 30);
pub const BG_BADGE: Color32 = Color32::from_rgb(52, 58, 64);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(50, 52, 64);
pub const BORDER_HEADER: Color32 = Color32::BLACK;

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(230, 232, 240);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(155, 160, 178);
pub const TEXT_DIM: Color32 = Color32::from_rgb(100, 105, 120);
pub const TEXT_HEADER: Color32 = Color32::from_rgb(167, 167, 167);
pub const TEXT_WEEKEND: Color32 = Color32::from_rgb(218, 165, 32);
pub const TEXT_ON_BAR: Color32 = Color32::WHITE;

pub const ACCENT: Color32 = Color32::from_rgb(80, 140, 220);
pub const GRID_LINE: Color32 = Color32::from_rgb(184, 185, 187);

pub const NOTICE_INFO: Color32 = TEXT_SECONDARY;
pub const NOTICE_WARNING: Color32 = Color32::from_rgb(251, 140, 0);
pub const NOTICE_ERROR: Color32 = Color32::from_rgb(229, 57, 53);

// ── Sizes ────────────────────────────────────────────────────────────────────

pub const STATUS_BAR_HEIGHT: f32 = 24.0;
pub const FILTER_BAR_HEIGHT: f32 = 34.0;
pub const ABOUT_DIALOG_WIDTH: f32 = 320.0;
pub const TABLE_ROW_HEIGHT: f32 = 24.0;

// ── Fonts ────────────────────────────────────────────────────────────────────

pub fn font_menu() -> FontId {
    FontId::proportional(13.0)
}

pub fn font_header() -> FontId {
    FontId::proportional(12.0)
}

pub fn font_cell() -> FontId {
    FontId::proportional(11.5)
}

pub fn font_bar() -> FontId {
    FontId::proportional(10.5)
}

pub fn font_status() -> FontId {
    FontId::proportional(11.0)
}

// ── State colors ─────────────────────────────────────────────────────────────

/// Fill of a task bar and its summary badge.
pub fn state_color(state: TaskState) -> Color32 {
    match state {
        TaskState::Created => Color32::from_rgb(108, 117, 125),
        TaskState::Underway => Color32::from_rgb(0, 123, 255),
        TaskState::Testing => Color32::from_rgb(253, 126, 20),
        TaskState::Finished => Color32::from_rgb(40, 167, 69),
        TaskState::Unknown(_) => TEXT_DIM,
    }
}

pub fn notice_color(level: NoticeLevel) -> Color32 {
    match level {
        NoticeLevel::Info => NOTICE_INFO,
        NoticeLevel::Warning => NOTICE_WARNING,
        NoticeLevel::Error => NOTICE_ERROR,
    }
}

// ── Apply custom visuals ─────────────────────────────────────────────────────

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();

    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.extreme_bg_color = BG_FIELD;
    visuals.faint_bg_color = BG_ROW_EVEN;

    let rounding = Rounding::same(4.0);
    visuals.widgets.noninteractive.bg_fill = BG_PANEL;
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, TEXT_SECONDARY);
    visuals.widgets.noninteractive.rounding = rounding;

    visuals.widgets.inactive.bg_fill = Color32::from_rgb(42, 44, 56);
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    visuals.widgets.inactive.rounding = rounding;

    visuals.widgets.hovered.bg_fill = Color32::from_rgb(52, 54, 68);
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, ACCENT);
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    visuals.widgets.hovered.rounding = rounding;

    visuals.widgets.active.bg_fill = Color32::from_rgb(60, 62, 76);
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, ACCENT);
    visuals.widgets.active.fg_stroke = Stroke::new(2.0, Color32::WHITE);
    visuals.widgets.active.rounding = rounding;

    visuals.selection.bg_fill = BG_SELECTED;
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    visuals.window_rounding = Rounding::same(8.0);
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.striped = true;

    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    ctx.set_style(style);
}
