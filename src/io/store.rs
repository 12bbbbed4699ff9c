use std::collections::HashSet;

use chrono::NaiveDate;

use crate::error::StoreError;
use crate::model::{TaskId, TaskRecord};

/// The project store the timeline reads tasks from and writes dates back to.
pub trait TaskStore {
    /// Current task records, in store order.
    fn load(&self) -> Result<Vec<TaskRecord>, StoreError>;

    /// Persist new dates for one task. Only called after validation.
    fn update_task(&mut self, id: &TaskId, start: NaiveDate, end: NaiveDate) -> Result<(), StoreError>;

    /// Add records whose ids are not already present. Returns how many were added.
    fn insert_new(&mut self, records: Vec<TaskRecord>) -> Result<usize, StoreError>;
}

/// Append the records of `incoming` whose ids `existing` does not know yet.
pub(crate) fn merge_new(existing: &mut Vec<TaskRecord>, incoming: Vec<TaskRecord>) -> usize {
    let mut known: HashSet<TaskId> = existing.iter().map(|r| r.id.clone()).collect();
    let before = existing.len();
    for record in incoming {
        if known.insert(record.id.clone()) {
            existing.push(record);
        }
    }
    existing.len() - before
}

/// Store kept entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryTaskStore {
    records: Vec<TaskRecord>,
}

impl MemoryTaskStore {
    pub fn new(records: Vec<TaskRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[TaskRecord] {
        &self.records
    }

    /// A small building schedule anchored on `today`, for running without a task file.
    pub fn sample(today: NaiveDate) -> Self {
        use crate::model::TaskStatus;

        let day = |offset: i64| today + chrono::Duration::days(offset);

        let mut site = TaskRecord::new(TaskId::generate(), "Site preparation", day(-10), day(-6));
        site.status = TaskStatus::Completed;

        let mut footings = TaskRecord::new(TaskId::generate(), "Footings", day(-5), day(2));
        footings.status = TaskStatus::InProgress;
        footings.total_volume = Some(48.0);
        footings.completed_volume = Some(30.0);
        footings.depends_on = vec![site.id.clone()];

        let mut walls = TaskRecord::new(TaskId::generate(), "Masonry walls", day(3), day(14));
        walls.total_volume = Some(320.0);
        walls.completed_volume = Some(0.0);
        walls.depends_on = vec![footings.id.clone()];

        let mut drainage = TaskRecord::new(TaskId::generate(), "Storm drainage repair", day(-2), day(4));
        drainage.status = TaskStatus::Delayed;
        drainage.is_extraordinary = true;

        let mut slab = TaskRecord::new(TaskId::generate(), "Roof slab", day(15), day(22));
        slab.depends_on = vec![walls.id.clone()];

        let finishes = TaskRecord::new(TaskId::generate(), "Finishes", day(23), day(35));

        Self::new(vec![site, footings, walls, drainage, slab, finishes])
    }
}

impl TaskStore for MemoryTaskStore {
    fn load(&self) -> Result<Vec<TaskRecord>, StoreError> {
        Ok(self.records.clone())
    }

    fn update_task(&mut self, id: &TaskId, start: NaiveDate, end: NaiveDate) -> Result<(), StoreError> {
        let record = self
            .records
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| StoreError::TaskNotFound(id.clone()))?;
        record.set_dates(start, end);
        Ok(())
    }

    fn insert_new(&mut self, records: Vec<TaskRecord>) -> Result<usize, StoreError> {
        Ok(merge_new(&mut self.records, records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn update_rewrites_dates_in_store_format() {
        let mut store = MemoryTaskStore::new(vec![TaskRecord::new(
            "t1",
            "Losa",
            date(2024, 8, 1),
            date(2024, 8, 5),
        )]);
        store
            .update_task(&TaskId::from("t1"), date(2024, 8, 3), date(2024, 8, 7))
            .unwrap();
        assert_eq!(store.records()[0].start_date, "2024-08-03");
        assert_eq!(store.records()[0].end_date, "2024-08-07");
    }

    #[test]
    fn update_of_unknown_task_fails() {
        let mut store = MemoryTaskStore::default();
        let err = store
            .update_task(&TaskId::from("nope"), date(2024, 8, 3), date(2024, 8, 7))
            .unwrap_err();
        assert!(matches!(err, StoreError::TaskNotFound(_)));
    }

    #[test]
    fn insert_new_skips_known_ids() {
        let mut store = MemoryTaskStore::new(vec![TaskRecord::new(
            "t1",
            "Losa",
            date(2024, 8, 1),
            date(2024, 8, 5),
        )]);
        let added = store
            .insert_new(vec![
                TaskRecord::new("t1", "Duplicate", date(2024, 9, 1), date(2024, 9, 5)),
                TaskRecord::new("t2", "Muros", date(2024, 8, 6), date(2024, 8, 9)),
                TaskRecord::new("t2", "Muros again", date(2024, 8, 6), date(2024, 8, 9)),
            ])
            .unwrap();
        assert_eq!(added, 1);
        assert_eq!(store.records().len(), 2);
        assert_eq!(store.records()[0].name, "Losa");
    }

    #[test]
    fn sample_schedule_is_consistent() {
        let store = MemoryTaskStore::sample(date(2024, 8, 7));
        let project = crate::model::Project::from_records(store.records());
        assert!(project.skipped.is_empty());
        for task in &project.tasks {
            for dep in &task.depends_on {
                let upstream = project.task(dep).unwrap();
                assert!(upstream.end <= task.start, "{} starts before {}", task.name, upstream.name);
            }
        }
    }
}
