use chrono::NaiveDate;

use crate::error::TaskError;

use super::task::{Task, TaskId, TaskRecord};

/// A record that could not be laid out.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedTask {
    pub id: TaskId,
    pub reason: TaskError,
}

/// The displayable tasks of a project, sorted for row layout.
#[derive(Debug, Clone, Default)]
pub struct Project {
    pub tasks: Vec<Task>,
    pub skipped: Vec<SkippedTask>,
}

impl Project {
    /// Parse store records, dropping rows whose dates are unusable.
    ///
    /// Rows are ordered by start date; equal starts keep store order.
    pub fn from_records(records: &[TaskRecord]) -> Self {
        let mut tasks = Vec::with_capacity(records.len());
        let mut skipped = Vec::new();

        for record in records {
            match Task::try_from(record) {
                Ok(task) => tasks.push(task),
                Err(reason) => {
                    log::warn!("Skipping task row: {}", reason);
                    skipped.push(SkippedTask {
                        id: record.id.clone(),
                        reason,
                    });
                }
            }
        }

        tasks.sort_by_key(|t| t.start);
        Self { tasks, skipped }
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn row_of(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == id)
    }

    /// Set new dates on one task and restore start-date row order.
    ///
    /// Returns `false` when the task is unknown.
    pub fn reschedule(&mut self, id: &TaskId, start: NaiveDate, end: NaiveDate) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| &t.id == id) else {
            return false;
        };
        task.start = start;
        task.end = end;
        self.tasks.sort_by_key(|t| t.start);
        true
    }
}
