use std::path::PathBuf;

use thiserror::Error;

use crate::model::TaskId;

/// A task record that cannot be laid out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("task {id}: invalid {field} '{value}' (expected YYYY-MM-DD)")]
    InvalidDate {
        id: TaskId,
        field: &'static str,
        value: String,
    },

    #[error("task {id}: end date precedes start date")]
    EndBeforeStart { id: TaskId },
}

/// Failures reported by a task store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed task file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("task {0} not found in store")]
    TaskNotFound(TaskId),

    #[error("store rejected the update: {0}")]
    Rejected(String),
}

/// Failures while importing a task file.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON array of tasks")]
    NotAnArray,

    #[error("task at position {0} has no id")]
    MissingId(usize),

    #[error(transparent)]
    Store(#[from] StoreError),
}
