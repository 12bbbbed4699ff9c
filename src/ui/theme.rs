use egui::{Color32, FontId, Rounding, Stroke, Visuals};

use crate::model::{Task, TaskStatus};

// ── Palette ──────────────────────────────────────────────────────────────────

pub const BG_CANVAS: Color32 = Color32::from_rgb(255, 255, 255);
pub const BG_PANEL: Color32 = Color32::from_rgb(248, 249, 251);
pub const BG_HEADER: Color32 = Color32::from_rgb(243, 244, 246);
pub const BG_ROW_ALT: Color32 = Color32::from_rgb(250, 250, 252);

pub const BORDER: Color32 = Color32::from_rgb(209, 213, 219);
pub const GRID_LINE: Color32 = Color32::from_rgb(229, 231, 235);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(17, 24, 39);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(75, 85, 99);
pub const TEXT_DIM: Color32 = Color32::from_rgb(107, 114, 128);
pub const TEXT_ON_BAR: Color32 = Color32::from_rgb(31, 41, 55);

pub const ACCENT: Color32 = Color32::from_rgb(37, 99, 235);
pub const TODAY_LINE: Color32 = Color32::from_rgb(239, 68, 68);
pub const HANDLE_COLOR: Color32 = Color32::from_rgb(75, 85, 99);
pub const CONFLICT: Color32 = Color32::from_rgb(185, 28, 28);

// Bar track behind the progress fill.
pub const TRACK: Color32 = Color32::from_rgb(229, 231, 235);
pub const TRACK_BORDER: Color32 = Color32::from_rgb(209, 213, 219);
pub const TRACK_EXTRAORDINARY: Color32 = Color32::from_rgb(255, 237, 213);
pub const TRACK_EXTRAORDINARY_BORDER: Color32 = Color32::from_rgb(253, 186, 116);

pub const STATUS_NOT_STARTED: Color32 = Color32::from_rgb(156, 163, 175);
pub const STATUS_IN_PROGRESS: Color32 = Color32::from_rgb(59, 130, 246);
pub const STATUS_COMPLETED: Color32 = Color32::from_rgb(34, 197, 94);
pub const STATUS_DELAYED: Color32 = Color32::from_rgb(239, 68, 68);
pub const EXTRAORDINARY: Color32 = Color32::from_rgb(249, 115, 22);

// ── Sizes ────────────────────────────────────────────────────────────────────

pub const LABEL_WIDTH: f32 = 150.0;
pub const ROW_HEIGHT: f32 = 40.0;
pub const HEADER_HEIGHT: f32 = 36.0;
pub const HANDLE_WIDTH: f32 = 8.0;
pub const BAR_ROUNDING: f32 = 6.0;
pub const BAR_INSET: f32 = 6.0; // vertical inset so bars don't touch row edges
pub const STATUS_BAR_HEIGHT: f32 = 24.0;

// ── Fonts ────────────────────────────────────────────────────────────────────

pub fn font_header() -> FontId {
    FontId::proportional(11.0)
}

pub fn font_label() -> FontId {
    FontId::proportional(13.0)
}

pub fn font_bar() -> FontId {
    FontId::proportional(11.5)
}

pub fn font_small() -> FontId {
    FontId::proportional(9.5)
}

// ── Task colours ─────────────────────────────────────────────────────────────

pub fn status_color(status: TaskStatus) -> Color32 {
    match status {
        TaskStatus::NotStarted => STATUS_NOT_STARTED,
        TaskStatus::InProgress => STATUS_IN_PROGRESS,
        TaskStatus::Completed => STATUS_COMPLETED,
        TaskStatus::Delayed => STATUS_DELAYED,
    }
}

/// Progress fill colour; unfinished extraordinary work stands out in orange.
pub fn fill_color(task: &Task) -> Color32 {
    if task.is_extraordinary && task.status != TaskStatus::Completed {
        EXTRAORDINARY
    } else {
        status_color(task.status)
    }
}

/// Track fill and border for a bar.
pub fn track_colors(task: &Task) -> (Color32, Color32) {
    if task.is_extraordinary {
        (TRACK_EXTRAORDINARY, TRACK_EXTRAORDINARY_BORDER)
    } else {
        (TRACK, TRACK_BORDER)
    }
}

// ── Apply custom visuals ─────────────────────────────────────────────────────

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::light();

    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_CANVAS;
    visuals.window_stroke = Stroke::new(1.0, BORDER);
    visuals.window_rounding = Rounding::same(8.0);

    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, BORDER);
    visuals.widgets.inactive.rounding = Rounding::same(6.0);
    visuals.widgets.hovered.rounding = Rounding::same(6.0);
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, ACCENT);
    visuals.widgets.active.rounding = Rounding::same(6.0);
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, ACCENT);

    visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.spacing.button_padding = egui::vec2(10.0, 4.0);
    ctx.set_style(style);
}
