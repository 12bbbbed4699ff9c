#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use obra_gantt::app::TimelineApp;
use obra_gantt::config::AppSettings;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings_path = AppSettings::default_path();
    let settings = AppSettings::load(&settings_path).with_args(std::env::args().skip(1));
    log::info!(
        "Starting with scale {:?}, editable={}, tasks={:?}",
        settings.scale,
        settings.editable,
        settings.tasks_file
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 400.0])
            .with_title("Obra Gantt"),
        ..Default::default()
    };

    eframe::run_native(
        "Obra Gantt",
        options,
        Box::new(|cc| Ok(Box::new(TimelineApp::new(cc, settings, settings_path)))),
    )
}
