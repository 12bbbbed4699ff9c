//! Pointer gesture state machine for timeline bars.
//!
//! The controller is either [`DragState::Idle`] or [`DragState::Dragging`] with
//! exactly one [`DragSession`]. Pointer moves only refresh the session's
//! preview; the dependency check runs once, on release.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};

use super::dependency::{self, DependencyConflict, Validation};
use crate::model::{CoordinateMapper, Task, TaskId};

/// Which part of a bar the pointer grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragAction {
    /// Bar body: shift both dates.
    Move,
    /// Left handle: shift the start date.
    ResizeStart,
    /// Right handle: shift the end date.
    ResizeEnd,
}

impl DragAction {
    /// Apply a day delta to baseline dates, never producing `start > end`.
    ///
    /// A delta that would leave the calendar keeps the baseline dates.
    pub fn apply(self, start: NaiveDate, end: NaiveDate, days: i64) -> (NaiveDate, NaiveDate) {
        let shift = |date: NaiveDate| Duration::try_days(days).and_then(|d| date.checked_add_signed(d));
        let shifted = match self {
            DragAction::Move => shift(start).zip(shift(end)),
            DragAction::ResizeStart => shift(start).map(|s| (s.min(end), end)),
            DragAction::ResizeEnd => shift(end).map(|e| (start, e.max(start))),
        };
        shifted.unwrap_or((start, end))
    }
}

/// Ephemeral record of the gesture in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub task_id: TaskId,
    pub action: DragAction,
    pub anchor_x: f32,
    pub baseline_start: NaiveDate,
    pub baseline_end: NaiveDate,
    preview_start: NaiveDate,
    preview_end: NaiveDate,
}

impl DragSession {
    fn new(task: &Task, action: DragAction, anchor_x: f32) -> Self {
        Self {
            task_id: task.id.clone(),
            action,
            anchor_x,
            baseline_start: task.start,
            baseline_end: task.end,
            preview_start: task.start,
            preview_end: task.end,
        }
    }

    /// Dates the pointer at `x` proposes, rounded to whole days.
    pub fn proposed_dates(&self, x: f32, mapper: &CoordinateMapper) -> (NaiveDate, NaiveDate) {
        let days = mapper.pixel_to_day_delta(x - self.anchor_x);
        self.action.apply(self.baseline_start, self.baseline_end, days)
    }

    pub fn preview_dates(&self) -> (NaiveDate, NaiveDate) {
        (self.preview_start, self.preview_end)
    }
}

/// Live feedback for the bar being dragged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragPreview {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub left: f32,
    pub width: f32,
}

impl DragPreview {
    pub fn tooltip(&self) -> String {
        format!("{} – {}", self.start.format("%d/%m/%Y"), self.end.format("%d/%m/%Y"))
    }
}

/// Dates approved for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleChange {
    pub task_id: TaskId,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Result of releasing the pointer.
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// No gesture was active.
    NotDragging,
    /// The gesture ended where it began.
    Unchanged,
    /// A predecessor would still be running; nothing is committed.
    Rejected(DependencyConflict),
    /// Validated dates the caller must hand to the store.
    Commit(ScheduleChange),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Owns at most one pointer gesture per timeline.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
    editable: bool,
    pending_commits: HashSet<TaskId>,
}

impl DragController {
    pub fn new(editable: bool) -> Self {
        Self {
            state: DragState::Idle,
            editable,
            pending_commits: HashSet::new(),
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Switching to read-only drops any gesture in flight.
    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
        if !editable {
            self.cancel();
        }
    }

    /// True while a gesture needs global pointer move/release events.
    pub fn captures_pointer(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn has_pending_commit(&self, id: &TaskId) -> bool {
        self.pending_commits.contains(id)
    }

    /// Start a gesture on `task`. Returns `false` if it was refused.
    ///
    /// Refused when read-only, when another gesture is active, or while the
    /// task's previous commit is still pending.
    pub fn pointer_down(&mut self, task: &Task, action: DragAction, x: f32) -> bool {
        if !self.editable {
            return false;
        }
        if let DragState::Dragging(active) = &self.state {
            log::debug!("Ignoring pointer-down on {}: {} is being dragged", task.id, active.task_id);
            return false;
        }
        if self.pending_commits.contains(&task.id) {
            log::debug!("Ignoring pointer-down on {}: commit pending", task.id);
            return false;
        }

        log::debug!("Drag start {:?} on {} at x={}", action, task.id, x);
        self.state = DragState::Dragging(DragSession::new(task, action, x));
        true
    }

    /// Refresh the live preview. Does not validate or commit.
    pub fn pointer_move(&mut self, x: f32, mapper: &CoordinateMapper) -> Option<DragPreview> {
        let DragState::Dragging(session) = &mut self.state else {
            return None;
        };

        let (start, end) = session.proposed_dates(x, mapper);
        session.preview_start = start;
        session.preview_end = end;
        let (left, width) = mapper.bar_span(start, end);
        Some(DragPreview {
            start,
            end,
            left,
            width,
        })
    }

    /// Finish the gesture and decide whether its dates may be committed.
    ///
    /// The controller is `Idle` afterwards whatever the outcome. A
    /// [`DragOutcome::Commit`] marks the task as pending until
    /// [`commit_settled`](Self::commit_settled) is called.
    pub fn pointer_up(&mut self, x: f32, mapper: &CoordinateMapper, tasks: &[Task]) -> DragOutcome {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return DragOutcome::NotDragging;
        };

        let (start, end) = session.proposed_dates(x, mapper);
        if start == session.baseline_start && end == session.baseline_end {
            log::debug!("Drag on {} ended without movement", session.task_id);
            return DragOutcome::Unchanged;
        }

        let Some(task) = tasks.iter().find(|t| t.id == session.task_id) else {
            log::warn!("Dragged task {} disappeared before release", session.task_id);
            return DragOutcome::Unchanged;
        };

        match dependency::validate(task, start, end, tasks) {
            Validation::Accept => {
                self.pending_commits.insert(session.task_id.clone());
                DragOutcome::Commit(ScheduleChange {
                    task_id: session.task_id,
                    start,
                    end,
                })
            }
            Validation::Reject(conflict) => DragOutcome::Rejected(conflict),
        }
    }

    /// Abandon the active gesture, e.g. when pointer capture is lost.
    pub fn cancel(&mut self) -> Option<DragSession> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging(session) => {
                log::debug!("Drag on {} cancelled", session.task_id);
                Some(session)
            }
            DragState::Idle => None,
        }
    }

    /// The store answered for `id`; it may be dragged again.
    pub fn commit_settled(&mut self, id: &TaskId) {
        self.pending_commits.remove(id);
    }
}
