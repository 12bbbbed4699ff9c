use std::path::Path;

use serde_json::Value;

use super::store::TaskStore;
use crate::error::ImportError;
use crate::model::TaskRecord;

/// Parse a JSON task export.
///
/// The document must be an array and every element must carry an `id`.
pub fn parse_task_json(json: &str) -> Result<Vec<TaskRecord>, ImportError> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(items) = value else {
        return Err(ImportError::NotAnArray);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let has_id = item
                .get("id")
                .is_some_and(|id| id.as_str().is_some_and(|s| !s.is_empty()));
            if !has_id {
                return Err(ImportError::MissingId(index));
            }
            Ok(serde_json::from_value(item)?)
        })
        .collect()
}

/// Import a task file into `store`, keeping tasks whose ids already exist.
///
/// Returns the number of tasks added.
pub fn import_tasks(path: &Path, store: &mut dyn TaskStore) -> Result<usize, ImportError> {
    let json = std::fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_task_json(&json)?;
    let total = records.len();
    let added = store.insert_new(records)?;
    log::info!("Imported {} of {} tasks from {:?}", added, total, path);
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryTaskStore;

    #[test]
    fn rejects_non_array_documents() {
        assert!(matches!(
            parse_task_json(r#"{"id": "t1"}"#),
            Err(ImportError::NotAnArray)
        ));
    }

    #[test]
    fn rejects_records_without_id() {
        let json = r#"[
            {"id": "t1", "name": "A", "startDate": "2024-08-01", "endDate": "2024-08-02"},
            {"name": "B", "startDate": "2024-08-01", "endDate": "2024-08-02"}
        ]"#;
        assert!(matches!(parse_task_json(json), Err(ImportError::MissingId(1))));
    }

    #[test]
    fn import_merges_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(
            &path,
            r#"[
                {"id": "t1", "name": "A", "startDate": "2024-08-01", "endDate": "2024-08-02"},
                {"id": "t2", "name": "B", "startDate": "2024-08-03", "endDate": "2024-08-04"}
            ]"#,
        )
        .unwrap();

        let mut store = MemoryTaskStore::default();
        assert_eq!(import_tasks(&path, &mut store).unwrap(), 2);
        assert_eq!(import_tasks(&path, &mut store).unwrap(), 0);
        assert_eq!(store.records().len(), 2);
    }
}
