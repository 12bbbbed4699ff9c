use crate::app::TimelineApp;
use crate::model::TimeScale;
use egui::{menu, RichText, Ui};
use egui_phosphor::regular as icons;

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut TimelineApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button("File", |ui| {
            if ui.button(format!("{}  Open tasks...", icons::FOLDER_OPEN)).clicked() {
                app.open_tasks();
                ui.close_menu();
            }
            if ui.button(format!("{}  Import tasks JSON...", icons::DOWNLOAD_SIMPLE)).clicked() {
                app.import_tasks();
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Reload", icons::ARROWS_CLOCKWISE)).clicked() {
                app.reload();
                ui.close_menu();
            }
        });

        ui.menu_button("View", |ui| {
            let mut editable = app.engine.is_editable();
            if ui.checkbox(&mut editable, "Allow editing").changed() {
                app.set_editable(editable);
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Open settings folder", icons::GEAR)).clicked() {
                app.open_settings_folder();
                ui.close_menu();
            }
        });

        ui.menu_button("Help", |ui| {
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        ui.separator();

        // Scale selector
        let mut scale = app.engine.scale();
        for option in TimeScale::ALL {
            ui.selectable_value(&mut scale, option, option.label());
        }
        if scale != app.engine.scale() {
            app.set_scale(scale);
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let mode = if app.engine.is_editable() { "" } else { " (view only)" };
            ui.label(
                RichText::new(format!("{}{}", app.source_name(), mode))
                    .size(11.0)
                    .weak(),
            );
        });
    });
}
