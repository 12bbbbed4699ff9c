//! Persisted user settings and command-line overrides.

use std::path::{Path, PathBuf};

use crate::model::TimeScale;

/// Settings stored as JSON in the OS config directory.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub scale: TimeScale,
    /// `false` renders the timeline for viewers: no dragging at all.
    pub editable: bool,
    /// JSON task store. `None` runs on the built-in sample schedule.
    pub tasks_file: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            scale: TimeScale::Day,
            editable: true,
            tasks_file: None,
        }
    }
}

impl AppSettings {
    /// Directory holding `settings.json`.
    pub fn config_dir() -> PathBuf {
        directories::ProjectDirs::from("", "", "ObraGantt")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn default_path() -> PathBuf {
        Self::config_dir().join("settings.json")
    }

    /// Read settings, falling back to defaults when missing or unreadable.
    pub fn load(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(err) => {
                log::warn!("Cannot read settings {:?}: {}", path, err);
                return Self::default();
            }
        };
        serde_json::from_str(&contents).unwrap_or_else(|err| {
            log::warn!("Ignoring malformed settings {:?}: {}", path, err);
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) {
        let json = match serde_json::to_string_pretty(self) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("Cannot serialise settings: {}", err);
                return;
            }
        };
        if let Some(dir) = path.parent() {
            if let Err(err) = std::fs::create_dir_all(dir) {
                log::warn!("Cannot create settings directory {:?}: {}", dir, err);
            }
        }
        if let Err(err) = std::fs::write(path, json) {
            log::warn!("Cannot write settings {:?}: {}", path, err);
        }
    }

    /// Apply command-line arguments: a task file path and `--view-only`.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            match arg.as_ref() {
                "--view-only" => self.editable = false,
                "--edit" => self.editable = true,
                other if other.starts_with("--") => log::warn!("Unknown option {}", other),
                path => self.tasks_file = Some(PathBuf::from(path)),
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_fill_defaults() {
        let settings: AppSettings = serde_json::from_str(r#"{"scale": "Week"}"#).unwrap();
        assert_eq!(settings.scale, TimeScale::Week);
        assert!(settings.editable);
        assert_eq!(settings.tasks_file, None);
    }

    #[test]
    fn args_override_settings() {
        let settings = AppSettings::default().with_args(["--view-only", "obra.json"]);
        assert!(!settings.editable);
        assert_eq!(settings.tasks_file, Some(PathBuf::from("obra.json")));
    }

    #[test]
    fn settings_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        assert_eq!(AppSettings::load(&path), AppSettings::default());

        let settings = AppSettings {
            scale: TimeScale::Month,
            editable: false,
            tasks_file: Some(PathBuf::from("tasks.json")),
        };
        settings.save(&path);
        assert_eq!(AppSettings::load(&path), settings);
    }

    #[test]
    fn malformed_settings_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(AppSettings::load(&path), AppSettings::default());
    }

    #[test]
    fn save_into_blocked_directory_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("taken");
        std::fs::write(&blocker, "not a directory").unwrap();
        let path = blocker.join("settings.json");

        AppSettings::default().save(&path);
        assert!(!path.exists());
        assert_eq!(AppSettings::load(&path), AppSettings::default());
    }
}
