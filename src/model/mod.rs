pub mod project;
pub mod task;
pub mod timeline;

pub use project::{Project, SkippedTask};
pub use task::{Task, TaskId, TaskRecord, TaskStatus};
pub use timeline::{CoordinateMapper, TimeGrid, TimeScale};
