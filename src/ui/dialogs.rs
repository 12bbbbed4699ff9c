use crate::app::TimelineApp;
use crate::ui::theme;
use egui::{Color32, Context, RichText, Window};

/// Modal shown when a drag was refused by a dependency.
pub fn show_conflict_dialog(app: &mut TimelineApp, ctx: &Context) {
    let Some(conflict) = app.conflict.as_ref() else {
        return;
    };

    let mut should_close = false;
    Window::new(
        RichText::new(format!("{}  Dependency conflict", egui_phosphor::regular::WARNING))
            .strong()
            .color(theme::CONFLICT),
    )
    .resizable(false)
    .collapsible(false)
    .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
    .fixed_size([360.0, 0.0])
    .show(ctx, |ui| {
        ui.add_space(4.0);
        ui.label(
            RichText::new(format!(
                "\"{}\" cannot start before \"{}\" finishes.",
                conflict.task_name, conflict.blocking_name
            ))
            .color(theme::TEXT_PRIMARY),
        );
        ui.label(
            RichText::new(format!(
                "\"{}\" ends on {}. The task keeps its previous dates.",
                conflict.blocking_name,
                conflict.blocking_end.format("%d/%m/%Y")
            ))
            .color(theme::TEXT_SECONDARY),
        );
        ui.add_space(8.0);

        let ok = egui::Button::new(RichText::new("OK").color(Color32::WHITE))
            .fill(theme::ACCENT)
            .rounding(egui::Rounding::same(4.0));
        if ui.add_sized([80.0, 28.0], ok).clicked() {
            should_close = true;
        }
    });

    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape) || i.key_pressed(egui::Key::Enter)) {
        app.conflict = None;
    }
}

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut TimelineApp, ctx: &Context) {
    let mut open = app.show_about;
    Window::new("About")
        .open(&mut open)
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(RichText::new("Obra Gantt").strong().size(16.0));
            ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
            ui.add_space(6.0);
            ui.label("Drag a bar to move a task, drag its edges to change its dates.");
            ui.label("A task cannot start before the tasks it depends on have finished.");
            ui.label(RichText::new("Esc cancels a drag in progress.").color(theme::TEXT_DIM));
        });
    app.show_about = open;
}
