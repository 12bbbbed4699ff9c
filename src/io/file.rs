use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::store::{merge_new, TaskStore};
use crate::error::StoreError;
use crate::model::{TaskId, TaskRecord};

/// Task store backed by a JSON array on disk.
///
/// Every write reloads the file first so edits made by other tools between
/// two drags are not lost.
#[derive(Debug, Clone)]
pub struct JsonTaskStore {
    path: PathBuf,
}

impl JsonTaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, records: &[TaskRecord]) -> Result<(), StoreError> {
        save_tasks(records, &self.path)
    }
}

impl TaskStore for JsonTaskStore {
    fn load(&self) -> Result<Vec<TaskRecord>, StoreError> {
        load_tasks(&self.path)
    }

    fn update_task(&mut self, id: &TaskId, start: NaiveDate, end: NaiveDate) -> Result<(), StoreError> {
        let mut records = self.load()?;
        let record = records
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| StoreError::TaskNotFound(id.clone()))?;
        record.set_dates(start, end);
        self.write(&records)
    }

    fn insert_new(&mut self, incoming: Vec<TaskRecord>) -> Result<usize, StoreError> {
        let mut records = if self.path.exists() { self.load()? } else { Vec::new() };
        let added = merge_new(&mut records, incoming);
        if added > 0 {
            self.write(&records)?;
        }
        Ok(added)
    }
}

/// Save task records to a JSON file.
pub fn save_tasks(records: &[TaskRecord], path: &Path) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(records).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load task records from a JSON file.
pub fn load_tasks(path: &Path) -> Result<Vec<TaskRecord>, StoreError> {
    let json = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}
