use chrono::NaiveDate;

use super::dependency::DependencyConflict;
use super::drag::{DragAction, DragController, DragOutcome, DragPreview, ScheduleChange};
use crate::error::StoreError;
use crate::io::TaskStore;
use crate::model::{CoordinateMapper, Project, Task, TaskId, TaskRecord, TimeGrid, TimeScale};

/// Knobs that distinguish one timeline instance from another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineConfig {
    pub scale: TimeScale,
    pub editable: bool,
    pub today: NaiveDate,
}

/// Geometry of one task row.
#[derive(Debug, Clone, PartialEq)]
pub struct BarLayout<'a> {
    pub row: usize,
    pub task: &'a Task,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub left: f32,
    pub width: f32,
    pub progress: f32,
    /// Drawn from the live drag preview rather than stored dates.
    pub is_preview: bool,
}

/// How a release ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseOutcome {
    NotDragging,
    NoChange,
    Rejected(DependencyConflict),
    Committed(ScheduleChange),
}

/// The timeline engine: tasks, grid, mapper and drag controller together.
///
/// Renderers read [`bars`](Self::bars) and feed pointer events back in; the
/// engine never touches task dates itself, it only hands validated changes to
/// a [`TaskStore`] and reloads.
#[derive(Debug, Clone)]
pub struct TimelineEngine {
    project: Project,
    grid: TimeGrid,
    mapper: CoordinateMapper,
    controller: DragController,
    today: NaiveDate,
}

impl TimelineEngine {
    pub fn new(records: &[TaskRecord], config: TimelineConfig) -> Self {
        let project = Project::from_records(records);
        let grid = TimeGrid::from_tasks(&project.tasks, config.scale, config.today);
        let mapper = grid.mapper();
        Self {
            project,
            grid,
            mapper,
            controller: DragController::new(config.editable),
            today: config.today,
        }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn tasks(&self) -> &[Task] {
        &self.project.tasks
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn controller(&self) -> &DragController {
        &self.controller
    }

    pub fn scale(&self) -> TimeScale {
        self.grid.scale
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn is_editable(&self) -> bool {
        self.controller.is_editable()
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.controller.set_editable(editable);
    }

    pub fn is_dragging(&self) -> bool {
        self.controller.captures_pointer()
    }

    /// Replace the task list, e.g. after the store changed.
    ///
    /// An active gesture is cancelled since its baseline may be stale.
    pub fn set_records(&mut self, records: &[TaskRecord]) {
        self.controller.cancel();
        self.project = Project::from_records(records);
        self.rebuild_grid(self.grid.scale);
    }

    /// Switch the time scale. Task data and row order are untouched.
    pub fn set_scale(&mut self, scale: TimeScale) {
        if scale != self.grid.scale {
            self.controller.cancel();
            self.rebuild_grid(scale);
            log::info!("Timeline scale set to {}", scale.label());
        }
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        if today != self.today {
            self.today = today;
            if self.project.tasks.is_empty() {
                self.rebuild_grid(self.grid.scale);
            }
        }
    }

    fn rebuild_grid(&mut self, scale: TimeScale) {
        self.grid = TimeGrid::from_tasks(&self.project.tasks, scale, self.today);
        self.mapper = self.grid.mapper();
    }

    /// Row geometry for every displayable task, in row order.
    pub fn bars(&self) -> Vec<BarLayout<'_>> {
        let preview = self
            .controller
            .session()
            .map(|s| (&s.task_id, s.preview_dates()));

        self.project
            .tasks
            .iter()
            .enumerate()
            .map(|(row, task)| {
                let (start, end, is_preview) = match preview {
                    Some((id, (start, end))) if *id == task.id => (start, end, true),
                    _ => (task.start, task.end, false),
                };
                let (left, width) = self.mapper.bar_span(start, end);
                BarLayout {
                    row,
                    task,
                    start,
                    end,
                    left,
                    width,
                    progress: task.progress(),
                    is_preview,
                }
            })
            .collect()
    }

    /// Pointer pressed on a bar. Returns whether a drag began.
    pub fn begin_drag(&mut self, id: &TaskId, action: DragAction, x: f32) -> bool {
        match self.project.task(id) {
            Some(task) => self.controller.pointer_down(task, action, x),
            None => false,
        }
    }

    /// Pointer moved while dragging.
    pub fn drag_to(&mut self, x: f32) -> Option<DragPreview> {
        self.controller.pointer_move(x, &self.mapper)
    }

    /// Pointer capture lost or gesture aborted.
    pub fn cancel_drag(&mut self) {
        self.controller.cancel();
    }

    /// Pointer released: validate, then persist through `store`.
    ///
    /// A failed write is returned as an error; the engine keeps the task list
    /// it had before the drag, so the bar falls back to its stored dates. If
    /// the write succeeds but reloading fails, the change is applied locally.
    pub fn release(&mut self, x: f32, store: &mut dyn TaskStore) -> Result<ReleaseOutcome, StoreError> {
        let outcome = self
            .controller
            .pointer_up(x, &self.mapper, &self.project.tasks);

        let change = match outcome {
            DragOutcome::NotDragging => return Ok(ReleaseOutcome::NotDragging),
            DragOutcome::Unchanged => return Ok(ReleaseOutcome::NoChange),
            DragOutcome::Rejected(conflict) => {
                log::info!("{}", conflict);
                return Ok(ReleaseOutcome::Rejected(conflict));
            }
            DragOutcome::Commit(change) => change,
        };

        let written = store.update_task(&change.task_id, change.start, change.end);
        self.controller.commit_settled(&change.task_id);
        if let Err(err) = written {
            log::error!("Failed to persist {}: {}", change.task_id, err);
            return Err(err);
        }

        log::info!("Rescheduled {} to {} – {}", change.task_id, change.start, change.end);
        match store.load() {
            Ok(records) => self.set_records(&records),
            Err(err) => {
                log::error!("Saved {} but could not reload tasks: {}", change.task_id, err);
                self.project.reschedule(&change.task_id, change.start, change.end);
                self.rebuild_grid(self.grid.scale);
            }
        }
        Ok(ReleaseOutcome::Committed(change))
    }
}
