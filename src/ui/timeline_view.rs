use crate::error::StoreError;
use crate::io::TaskStore;
use crate::model::{TaskId, TimeGrid};
use crate::scheduling::{
    BarLayout, DependencyConflict, DragAction, DragPreview, ReleaseOutcome, ScheduleChange,
    TimelineEngine,
};
use crate::ui::theme;
use egui::{Color32, CursorIcon, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};

const ROW_HEIGHT: f32 = theme::ROW_HEIGHT;
const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;
const LABEL_WIDTH: f32 = theme::LABEL_WIDTH;
const HANDLE_WIDTH: f32 = theme::HANDLE_WIDTH;

/// Something the surrounding app should react to.
#[derive(Debug)]
pub enum TimelineEvent {
    Committed(ScheduleChange),
    Conflict(DependencyConflict),
    CommitFailed(StoreError),
    Cancelled,
}

/// Result details from interactions in the timeline.
#[derive(Debug, Default)]
pub struct TimelineInteraction {
    pub event: Option<TimelineEvent>,
}

/// Render the timeline and drive the drag controller from pointer input.
///
/// Bars only sense drags when the engine is editable. While a gesture is
/// active the pointer is followed globally, so releasing or moving outside
/// the bar still reaches the controller.
pub fn show_timeline(
    engine: &mut TimelineEngine,
    store: &mut dyn TaskStore,
    ui: &mut Ui,
) -> TimelineInteraction {
    let mut interaction = TimelineInteraction::default();
    let available = ui.available_size();
    let chart_width = LABEL_WIDTH + engine.grid().total_width();
    let chart_height = HEADER_HEIGHT + engine.tasks().len() as f32 * ROW_HEIGHT + 40.0;

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let (response, painter) = ui.allocate_painter(
                Vec2::new(chart_width.max(available.x), chart_height.max(available.y)),
                Sense::hover(),
            );
            let origin = response.rect.min;
            let grid_x = origin.x + LABEL_WIDTH;

            // Hit areas come from the geometry at the start of the frame.
            let hits: Vec<(TaskId, Rect)> = engine
                .bars()
                .iter()
                .map(|bar| (bar.task.id.clone(), bar_rect(bar, grid_x, origin.y)))
                .collect();

            let mut hovered: Option<TaskId> = None;
            for (id, rect) in &hits {
                if engine.is_editable() {
                    if let Some(hover) = sense_bar_gestures(engine, id, *rect, ui) {
                        hovered = Some(hover);
                    }
                } else {
                    let response = ui.interact(
                        *rect,
                        ui.make_persistent_id(("timeline-bar", id.as_str())),
                        Sense::hover(),
                    );
                    if response.hovered() {
                        hovered = Some(id.clone());
                    }
                }
            }

            let mut preview = None;
            if engine.is_dragging() {
                match follow_pointer(engine, store, ui) {
                    PointerStep::Preview(p) => preview = p,
                    PointerStep::Finished(event) => interaction.event = event,
                }
            }

            painter.rect_filled(response.rect, 0.0, theme::BG_CANVAS);
            draw_rows(&painter, origin, engine, chart_width.max(available.x));
            draw_grid(&painter, origin, engine.grid(), chart_height.max(available.y));
            if engine.grid().shows_today(engine.today()) {
                let x = grid_x + engine.mapper().date_to_pixel(engine.today());
                draw_today_line(&painter, origin, x, chart_height.max(available.y));
            }

            for bar in engine.bars() {
                let rect = bar_rect(&bar, grid_x, origin.y);
                let show_handles =
                    engine.is_editable() && (bar.is_preview || hovered.as_ref() == Some(&bar.task.id));
                draw_bar(&painter, &bar, rect, show_handles);
            }

            if let Some(preview) = preview {
                egui::show_tooltip_at_pointer(
                    ui.ctx(),
                    ui.layer_id(),
                    egui::Id::new("timeline-drag-tip"),
                    |ui| {
                        ui.label(preview.tooltip());
                    },
                );
            } else if let Some(id) = hovered.filter(|_| !engine.is_dragging()) {
                if let Some(task) = engine.project().task(&id) {
                    egui::show_tooltip_at_pointer(
                        ui.ctx(),
                        ui.layer_id(),
                        egui::Id::new(("timeline-task-tip", id.as_str())),
                        |ui| {
                            ui.strong(&task.name);
                            ui.label(format!(
                                "{} → {}",
                                task.start.format("%d/%m/%Y"),
                                task.end.format("%d/%m/%Y"),
                            ));
                            ui.label(format!(
                                "{} · {}%",
                                task.status.label(),
                                (task.progress() * 100.0).round() as i32
                            ));
                        },
                    );
                }
            }
        });

    interaction
}

/// Register body and handle hit areas for one bar; start a drag if grabbed.
///
/// Returns the task id when any part of the bar is hovered.
fn sense_bar_gestures(engine: &mut TimelineEngine, id: &TaskId, rect: Rect, ui: &mut Ui) -> Option<TaskId> {
    let body = ui.interact(
        rect,
        ui.make_persistent_id(("timeline-bar", id.as_str())),
        Sense::click_and_drag(),
    );
    let left = ui.interact(
        Rect::from_min_max(
            Pos2::new(rect.left() - HANDLE_WIDTH * 0.5, rect.top()),
            Pos2::new(rect.left() + HANDLE_WIDTH * 0.5, rect.bottom()),
        ),
        ui.make_persistent_id(("timeline-resize-start", id.as_str())),
        Sense::drag(),
    );
    let right = ui.interact(
        Rect::from_min_max(
            Pos2::new(rect.right() - HANDLE_WIDTH * 0.5, rect.top()),
            Pos2::new(rect.right() + HANDLE_WIDTH * 0.5, rect.bottom()),
        ),
        ui.make_persistent_id(("timeline-resize-end", id.as_str())),
        Sense::drag(),
    );

    let grabbed = [
        (&left, DragAction::ResizeStart),
        (&right, DragAction::ResizeEnd),
        (&body, DragAction::Move),
    ]
    .into_iter()
    .find(|(response, _)| response.drag_started());

    if let Some((response, action)) = grabbed {
        // drag_started fires past the drag threshold; anchor at the press itself.
        let anchor = ui
            .input(|i| i.pointer.press_origin())
            .or_else(|| response.interact_pointer_pos());
        if let Some(pos) = anchor {
            engine.begin_drag(id, action, pos.x);
        }
    }

    if left.hovered() || right.hovered() {
        ui.ctx().set_cursor_icon(CursorIcon::ResizeHorizontal);
    } else if body.hovered() {
        ui.ctx().set_cursor_icon(CursorIcon::Grab);
    }

    (body.hovered() || left.hovered() || right.hovered()).then(|| id.clone())
}

enum PointerStep {
    Preview(Option<DragPreview>),
    Finished(Option<TimelineEvent>),
}

/// Global pointer handling, consulted only while a gesture is active.
fn follow_pointer(engine: &mut TimelineEngine, store: &mut dyn TaskStore, ui: &Ui) -> PointerStep {
    let (pos, released, down, escape) = ui.input(|i| {
        (
            i.pointer.latest_pos(),
            i.pointer.primary_released(),
            i.pointer.primary_down(),
            i.key_pressed(egui::Key::Escape),
        )
    });

    if escape || (!released && !down) {
        engine.cancel_drag();
        return PointerStep::Finished(Some(TimelineEvent::Cancelled));
    }

    let Some(pos) = pos else {
        engine.cancel_drag();
        return PointerStep::Finished(Some(TimelineEvent::Cancelled));
    };

    if released {
        let event = match engine.release(pos.x, store) {
            Ok(ReleaseOutcome::Committed(change)) => Some(TimelineEvent::Committed(change)),
            Ok(ReleaseOutcome::Rejected(conflict)) => Some(TimelineEvent::Conflict(conflict)),
            Ok(ReleaseOutcome::NoChange | ReleaseOutcome::NotDragging) => None,
            Err(err) => Some(TimelineEvent::CommitFailed(err)),
        };
        return PointerStep::Finished(event);
    }

    let action = engine.controller().session().map(|s| s.action);
    ui.ctx().set_cursor_icon(match action {
        Some(DragAction::Move) => CursorIcon::Grabbing,
        _ => CursorIcon::ResizeHorizontal,
    });
    PointerStep::Preview(engine.drag_to(pos.x))
}

fn bar_rect(bar: &BarLayout<'_>, grid_x: f32, top: f32) -> Rect {
    let y = top + HEADER_HEIGHT + bar.row as f32 * ROW_HEIGHT + theme::BAR_INSET;
    Rect::from_min_size(
        Pos2::new(grid_x + bar.left, y),
        Vec2::new(bar.width.max(2.0), ROW_HEIGHT - theme::BAR_INSET * 2.0),
    )
}

fn draw_rows(painter: &egui::Painter, origin: Pos2, engine: &TimelineEngine, width: f32) {
    for (i, task) in engine.tasks().iter().enumerate() {
        let y = origin.y + HEADER_HEIGHT + i as f32 * ROW_HEIGHT;
        if i % 2 == 1 {
            painter.rect_filled(
                Rect::from_min_size(Pos2::new(origin.x, y), Vec2::new(width, ROW_HEIGHT)),
                0.0,
                theme::BG_ROW_ALT,
            );
        }
        painter.line_segment(
            [
                Pos2::new(origin.x, y + ROW_HEIGHT),
                Pos2::new(origin.x + width, y + ROW_HEIGHT),
            ],
            Stroke::new(0.5, theme::GRID_LINE),
        );

        // Task label column
        let label_rect = Rect::from_min_size(Pos2::new(origin.x, y), Vec2::new(LABEL_WIDTH, ROW_HEIGHT));
        let clipped = painter.with_clip_rect(label_rect.shrink(2.0));
        let mut text_x = origin.x + 8.0;
        if task.is_extraordinary {
            clipped.circle_filled(Pos2::new(text_x + 3.0, y + ROW_HEIGHT / 2.0), 3.5, theme::EXTRAORDINARY);
            text_x += 12.0;
        }
        clipped.text(
            Pos2::new(text_x, y + ROW_HEIGHT / 2.0),
            egui::Align2::LEFT_CENTER,
            &task.name,
            theme::font_label(),
            theme::TEXT_PRIMARY,
        );
    }

    painter.line_segment(
        [
            Pos2::new(origin.x + LABEL_WIDTH, origin.y),
            Pos2::new(origin.x + LABEL_WIDTH, origin.y + HEADER_HEIGHT + engine.tasks().len() as f32 * ROW_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER),
    );
}

fn draw_grid(painter: &egui::Painter, origin: Pos2, grid: &TimeGrid, height: f32) {
    let column_width = grid.scale.column_width();
    let grid_x = origin.x + LABEL_WIDTH;

    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(LABEL_WIDTH + grid.total_width(), HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );
    painter.text(
        Pos2::new(origin.x + 8.0, origin.y + HEADER_HEIGHT / 2.0),
        egui::Align2::LEFT_CENTER,
        "Task",
        theme::font_label(),
        theme::TEXT_PRIMARY,
    );

    for (i, column) in grid.columns.iter().enumerate() {
        let x = grid_x + i as f32 * column_width;
        painter.line_segment(
            [Pos2::new(x, origin.y), Pos2::new(x, origin.y + height)],
            Stroke::new(0.5, theme::GRID_LINE),
        );
        painter.text(
            Pos2::new(x + column_width / 2.0, origin.y + HEADER_HEIGHT / 2.0),
            egui::Align2::CENTER_CENTER,
            grid.header_label(*column),
            theme::font_header(),
            theme::TEXT_SECONDARY,
        );
    }

    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + HEADER_HEIGHT),
            Pos2::new(grid_x + grid.total_width(), origin.y + HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER),
    );
}

fn draw_today_line(painter: &egui::Painter, origin: Pos2, x: f32, height: f32) {
    painter.line_segment(
        [Pos2::new(x, origin.y + HEADER_HEIGHT), Pos2::new(x, origin.y + height)],
        Stroke::new(2.0, theme::TODAY_LINE),
    );

    let badge_rect = Rect::from_center_size(
        Pos2::new(x, origin.y + HEADER_HEIGHT - 6.0),
        Vec2::new(38.0, 12.0),
    );
    painter.rect_filled(badge_rect, Rounding::same(2.0), theme::TODAY_LINE);
    painter.text(
        badge_rect.center(),
        egui::Align2::CENTER_CENTER,
        "Today",
        theme::font_small(),
        Color32::WHITE,
    );
}

fn draw_bar(painter: &egui::Painter, bar: &BarLayout<'_>, rect: Rect, show_handles: bool) {
    let task = bar.task;
    let rounding = Rounding::same(theme::BAR_ROUNDING);
    let (track, border) = theme::track_colors(task);

    painter.rect_filled(rect, rounding, track);
    painter.rect_stroke(rect, rounding, Stroke::new(1.0, border));

    if bar.progress > 0.0 {
        let fill = Rect::from_min_size(rect.min, Vec2::new(rect.width() * bar.progress, rect.height()));
        painter.rect_filled(fill, rounding, theme::fill_color(task));
    }

    if bar.is_preview {
        painter.rect_stroke(
            rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::ACCENT),
        );
    }

    if rect.width() > 24.0 {
        let label = format!("{} ({}%)", task.name, (bar.progress * 100.0).round() as i32);
        let clipped = painter.with_clip_rect(rect.shrink(1.0));
        clipped.text(
            Pos2::new(rect.left() + 8.0, rect.center().y),
            egui::Align2::LEFT_CENTER,
            label,
            theme::font_bar(),
            theme::TEXT_ON_BAR,
        );
    }

    if show_handles {
        let handle_h = rect.height() * 0.55;
        let handle_y = rect.center().y - handle_h / 2.0;
        for x in [rect.left() + 2.0, rect.right() - 5.0] {
            painter.rect_filled(
                Rect::from_min_size(Pos2::new(x, handle_y), Vec2::new(3.0, handle_h)),
                Rounding::same(1.5),
                theme::HANDLE_COLOR,
            );
        }
    }
}
