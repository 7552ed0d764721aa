// TodoStore - single-user task list persisted to one storage slot

pub mod config;
pub mod error;
pub mod filter;
pub mod format;
pub mod record;
pub mod slot;
pub mod storage;
pub mod store;
pub mod task;

// Re-export main types for convenience
pub use config::Config;
pub use error::{StorageError, StoreError, ValidationError};
pub use filter::{Query, StatusFilter};
pub use format::TaskFormatter;
pub use record::Record;
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{StoreOptions, TaskCounts, TaskStore};
pub use task::{DueDate, DueTime, NewTask, Priority, Task, TaskUpdate};
