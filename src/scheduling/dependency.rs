use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{Task, TaskId};

/// A finish-to-start constraint that a proposed schedule would break.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Dependency conflict: \"{task_name}\" cannot start before \"{blocking_name}\" finishes on {blocking_end}.")]
pub struct DependencyConflict {
    pub task_id: TaskId,
    pub task_name: String,
    pub blocking_id: TaskId,
    pub blocking_name: String,
    pub blocking_end: NaiveDate,
}

/// Verdict on a proposed (start, end) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Accept,
    Reject(DependencyConflict),
}

impl Validation {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Validation::Accept)
    }
}

/// Check `task`'s own predecessors against a proposed start.
///
/// Dependencies missing from `all_tasks` are ignored. Only upstream
/// constraints are checked: tasks that depend on `task` are not revisited.
pub fn validate(
    task: &Task,
    proposed_start: NaiveDate,
    proposed_end: NaiveDate,
    all_tasks: &[Task],
) -> Validation {
    for dep_id in &task.depends_on {
        let Some(dependency) = all_tasks.iter().find(|t| &t.id == dep_id) else {
            continue;
        };

        if proposed_start < dependency.end {
            log::debug!(
                "{} -> {}..{} blocked by {} (ends {})",
                task.id,
                proposed_start,
                proposed_end,
                dependency.id,
                dependency.end
            );
            return Validation::Reject(DependencyConflict {
                task_id: task.id.clone(),
                task_name: task.name.clone(),
                blocking_id: dependency.id.clone(),
                blocking_name: dependency.name.clone(),
                blocking_end: dependency.end,
            });
        }
    }

    Validation::Accept
}
