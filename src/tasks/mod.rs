//! Task management.
//!
//! Tasks are scheduled on a single calendar day, carry a category and a
//! priority, and can be completed, edited, moved to another day or deleted.
//!
//! # Example
//!
//! ```no_run
//! use week_planner::storage::SqliteStore;
//! use week_planner::tasks::{Priority, TaskDraft, TaskStore};
//!
//! let kv = SqliteStore::with_path("/tmp/planner.sqlite3".into()).unwrap();
//! let store = TaskStore::new(&kv);
//!
//! let date = week_planner::calendar::today();
//! let task = store.add(TaskDraft::new("Call dentist", date).with_priority(Priority::High)).unwrap();
//! store.toggle_complete(&task.id).unwrap();
//! ```

pub mod id;
pub mod models;
pub mod store;

pub use models::{InvalidPriority, Priority, Task, TaskDraft, TaskUpdate};
pub use store::TaskStore;
