use std::path::PathBuf;

use crate::config::AppSettings;
use crate::io::{JsonTaskStore, MemoryTaskStore, TaskStore};
use crate::model::TimeScale;
use crate::scheduling::{DependencyConflict, TimelineConfig, TimelineEngine};
use crate::ui;
use crate::ui::timeline_view::TimelineEvent;

/// Main application state.
pub struct TimelineApp {
    pub engine: TimelineEngine,
    pub store: Box<dyn TaskStore>,
    pub tasks_file: Option<PathBuf>,
    pub settings: AppSettings,
    pub settings_path: PathBuf,

    // Dialog state
    pub conflict: Option<DependencyConflict>,
    pub show_about: bool,

    // Status message
    pub status_message: String,
}

impl TimelineApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: AppSettings, settings_path: PathBuf) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let today = chrono::Local::now().date_naive();
        let (store, tasks_file): (Box<dyn TaskStore>, _) = match &settings.tasks_file {
            Some(path) => (Box::new(JsonTaskStore::new(path)), Some(path.clone())),
            None => (Box::new(MemoryTaskStore::sample(today)), None),
        };

        let config = TimelineConfig {
            scale: settings.scale,
            editable: settings.editable,
            today,
        };
        let mut app = Self {
            engine: TimelineEngine::new(&[], config),
            store,
            tasks_file,
            settings,
            settings_path,
            conflict: None,
            show_about: false,
            status_message: "Ready".to_string(),
        };
        app.reload();
        app
    }

    /// Name shown in the toolbar for the current task source.
    pub fn source_name(&self) -> String {
        self.tasks_file
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Sample project".to_string())
    }

    // --- Task source ---

    /// Re-read tasks from the store and rebuild the grid.
    pub fn reload(&mut self) {
        match self.store.load() {
            Ok(records) => {
                self.engine.set_records(&records);
                let skipped = self.engine.project().skipped.len();
                self.status_message = if skipped > 0 {
                    format!("Loaded {} tasks ({} skipped: invalid dates)", self.engine.tasks().len(), skipped)
                } else {
                    format!("Loaded {} tasks", self.engine.tasks().len())
                };
            }
            Err(e) => {
                log::error!("Failed to load tasks: {}", e);
                self.status_message = format!("Error loading tasks: {}", e);
            }
        }
    }

    pub fn open_tasks(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Task file", &["json"])
            .pick_file()
        {
            self.store = Box::new(JsonTaskStore::new(&path));
            self.tasks_file = Some(path.clone());
            self.settings.tasks_file = Some(path);
            self.settings.save(&self.settings_path);
            self.reload();
        }
    }

    pub fn import_tasks(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Task export", &["json"])
            .pick_file()
        {
            match crate::io::import_tasks(&path, self.store.as_mut()) {
                Ok(0) => {
                    self.status_message = "No new tasks imported; every task already exists".to_string();
                }
                Ok(added) => {
                    self.reload();
                    self.status_message = format!("Imported {} new tasks", added);
                }
                Err(e) => {
                    log::error!("Import of {:?} failed: {}", path, e);
                    self.status_message = format!("Import failed: {}", e);
                }
            }
        }
    }

    pub fn set_scale(&mut self, scale: TimeScale) {
        self.engine.set_scale(scale);
        self.settings.scale = scale;
        self.settings.save(&self.settings_path);
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.engine.set_editable(editable);
        self.settings.editable = editable;
        self.settings.save(&self.settings_path);
        self.status_message = if editable {
            "Editing enabled".to_string()
        } else {
            "View only".to_string()
        };
    }

    pub fn open_settings_folder(&mut self) {
        let dir = AppSettings::config_dir();
        if let Err(e) = std::fs::create_dir_all(&dir) {
            log::warn!("Cannot create {:?}: {}", dir, e);
        }
        if let Err(e) = open::that(&dir) {
            log::warn!("Cannot open {:?}: {}", dir, e);
            self.status_message = format!("Cannot open settings folder: {}", e);
        }
    }

    fn handle_timeline_event(&mut self, event: TimelineEvent) {
        match event {
            TimelineEvent::Committed(change) => {
                let name = self
                    .engine
                    .project()
                    .task(&change.task_id)
                    .map(|t| t.name.clone())
                    .unwrap_or_else(|| change.task_id.to_string());
                self.status_message = format!(
                    "Updated '{}' ({} → {})",
                    name,
                    change.start.format("%Y-%m-%d"),
                    change.end.format("%Y-%m-%d")
                );
            }
            TimelineEvent::Conflict(conflict) => {
                self.status_message = conflict.to_string();
                self.conflict = Some(conflict);
            }
            TimelineEvent::CommitFailed(err) => {
                self.status_message = format!("Could not save the new dates: {}", err);
            }
            TimelineEvent::Cancelled => {
                self.status_message = "Drag cancelled".to_string();
            }
        }
    }
}

impl eframe::App for TimelineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx);
        self.engine.set_today(chrono::Local::now().date_naive());

        let should_reload = ctx.input(|i| i.key_pressed(egui::Key::F5));
        if should_reload && !self.engine.is_dragging() {
            self.reload();
        }

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Bottom panel: status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .size(11.5)
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let skipped = self.engine.project().skipped.len();
                        let mut summary = format!(
                            "Tasks: {} · Scale: {}",
                            self.engine.tasks().len(),
                            self.engine.scale().label()
                        );
                        if skipped > 0 {
                            summary.push_str(&format!(" · Skipped: {}", skipped));
                        }
                        ui.label(
                            egui::RichText::new(summary)
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        // Central panel: timeline
        let mut timeline_event = None;
        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(ui::theme::BG_CANVAS))
            .show(ctx, |ui| {
                let interaction =
                    ui::timeline_view::show_timeline(&mut self.engine, self.store.as_mut(), ui);
                timeline_event = interaction.event;
            });
        if let Some(event) = timeline_event {
            self.handle_timeline_event(event);
        }

        // Dialogs
        if self.conflict.is_some() {
            ui::dialogs::show_conflict_dialog(self, ctx);
        }
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
    }
}
