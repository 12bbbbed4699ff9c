use chrono::NaiveDate;
use obra_gantt::error::{ImportError, StoreError};
use obra_gantt::io::{import_tasks, load_tasks, save_tasks, JsonTaskStore, TaskStore};
use obra_gantt::model::{TaskId, TaskRecord, TaskStatus, TimeScale};
use obra_gantt::scheduling::{DragAction, ReleaseOutcome, TimelineConfig, TimelineEngine};
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seeded_store(dir: &TempDir) -> JsonTaskStore {
    let path = dir.path().join("tasks.json");
    let mut slab = TaskRecord::new("slab", "Losa", date(2024, 8, 5), date(2024, 8, 9));
    slab.status = TaskStatus::InProgress;
    slab.total_volume = Some(120.0);
    slab.completed_volume = Some(30.0);
    save_tasks(&[slab], &path).unwrap();
    JsonTaskStore::new(path)
}

#[test]
fn drag_release_is_written_to_disk() {
    let dir = TempDir::new().unwrap();
    let mut store = seeded_store(&dir);
    let mut engine = TimelineEngine::new(
        &store.load().unwrap(),
        TimelineConfig {
            scale: TimeScale::Day,
            editable: true,
            today: date(2024, 8, 1),
        },
    );

    engine.begin_drag(&TaskId::from("slab"), DragAction::ResizeEnd, 0.0);
    let outcome = engine.release(80.0, &mut store).unwrap();
    assert!(matches!(outcome, ReleaseOutcome::Committed(_)));

    let on_disk = load_tasks(store.path()).unwrap();
    assert_eq!(on_disk.len(), 1);
    assert_eq!(on_disk[0].start_date, "2024-08-05");
    assert_eq!(on_disk[0].end_date, "2024-08-11");
    assert_eq!(on_disk[0].completed_volume, Some(30.0));
    assert_eq!(on_disk[0].status, TaskStatus::InProgress);
    assert_eq!(engine.tasks()[0].end, date(2024, 8, 11));
}

#[test]
fn updating_unknown_task_fails() {
    let dir = TempDir::new().unwrap();
    let mut store = seeded_store(&dir);
    let err = store
        .update_task(&TaskId::from("ghost"), date(2024, 8, 1), date(2024, 8, 2))
        .unwrap_err();
    assert!(matches!(err, StoreError::TaskNotFound(id) if id == TaskId::from("ghost")));
}

#[test]
fn missing_file_reports_io_error() {
    let dir = TempDir::new().unwrap();
    let store = JsonTaskStore::new(dir.path().join("absent.json"));
    assert!(matches!(store.load(), Err(StoreError::Io { .. })));
}

#[test]
fn null_and_missing_dates_skip_only_their_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tasks.json");
    std::fs::write(
        &path,
        r#"[
            {"id": "t1", "name": "Losa", "startDate": "2024-08-05", "endDate": "2024-08-09"},
            {"id": "t2", "name": "Muros", "startDate": "2024-08-10", "endDate": null},
            {"id": "t3", "name": "Vigas", "end_date": "2024-08-12"}
        ]"#,
    )
    .unwrap();
    let store = JsonTaskStore::new(path);

    let records = store.load().unwrap();
    assert_eq!(records.len(), 3);

    let engine = TimelineEngine::new(
        &records,
        TimelineConfig {
            scale: TimeScale::Day,
            editable: true,
            today: date(2024, 8, 1),
        },
    );
    assert_eq!(engine.tasks().len(), 1);
    assert_eq!(engine.tasks()[0].id, TaskId::from("t1"));
    let skipped: Vec<_> = engine.project().skipped.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(skipped, ["t2", "t3"]);
}

#[test]
fn import_tolerates_rows_with_null_dates() {
    let dir = TempDir::new().unwrap();
    let mut store = seeded_store(&dir);
    let export = dir.path().join("export.json");
    std::fs::write(
        &export,
        r#"[{"id": "walls", "name": "Muros", "startDate": null, "endDate": null}]"#,
    )
    .unwrap();

    assert_eq!(import_tasks(&export, &mut store).unwrap(), 1);
    assert_eq!(store.load().unwrap().len(), 2);
}

#[test]
fn import_adds_only_new_ids() {
    let dir = TempDir::new().unwrap();
    let mut store = seeded_store(&dir);
    let export = dir.path().join("export.json");
    std::fs::write(
        &export,
        r#"[
            {"id": "slab", "name": "Losa (copia)", "startDate": "2024-01-01", "endDate": "2024-01-02"},
            {"id": "walls", "name": "Muros", "startDate": "2024-08-12", "endDate": "2024-08-20",
             "status": "En Progreso", "dependsOn": ["slab"]}
        ]"#,
    )
    .unwrap();

    let added = import_tasks(&export, &mut store).unwrap();
    assert_eq!(added, 1);

    let records = store.load().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "Losa");
    assert_eq!(records[1].status, TaskStatus::InProgress);
    assert_eq!(records[1].depends_on, vec![TaskId::from("slab")]);

    assert_eq!(import_tasks(&export, &mut store).unwrap(), 0);
}

#[test]
fn import_rejects_non_array_json() {
    let dir = TempDir::new().unwrap();
    let mut store = seeded_store(&dir);
    let export = dir.path().join("export.json");
    std::fs::write(&export, r#"{"id": "slab"}"#).unwrap();

    assert!(matches!(
        import_tasks(&export, &mut store),
        Err(ImportError::NotAnArray)
    ));
    assert_eq!(store.load().unwrap().len(), 1);
}
