pub mod file;
pub mod import;
pub mod store;

pub use file::{load_tasks, save_tasks, JsonTaskStore};
pub use import::import_tasks;
pub use store::{MemoryTaskStore, TaskStore};
