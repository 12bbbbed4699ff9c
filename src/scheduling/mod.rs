pub mod dependency;
pub mod drag;
pub mod engine;

pub use dependency::{validate, DependencyConflict, Validation};
pub use drag::{DragAction, DragController, DragOutcome, DragPreview, DragSession, DragState, ScheduleChange};
pub use engine::{BarLayout, ReleaseOutcome, TimelineConfig, TimelineEngine};
