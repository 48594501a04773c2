//! Task store over key-value storage.
//!
//! The whole collection is one versioned JSON document:
//! `{"version": 1, "tasks": {"<id>": Task, ...}}`. Every operation reads the
//! document, applies its change and writes it back. Records that cannot be
//! read are skipped and written back untouched.

use crate::categories;
use crate::error::{Error, Result};
use crate::storage::keys;
use crate::tasks::id::{generate_task_id, now_utc};
use crate::tasks::models::{Task, TaskDraft, TaskUpdate};
use crate::traits::KeyValueStore;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashSet};

/// Schema version of the persisted task document.
pub const SCHEMA_VERSION: u32 = 1;

/// The document as stored, before each record is checked.
#[derive(Debug, Deserialize)]
struct StoredTasks {
    version: u32,
    tasks: BTreeMap<String, Value>,
}

#[derive(Debug, Default)]
struct TaskData {
    tasks: BTreeMap<String, Task>,
    unreadable: BTreeMap<String, Value>,
}

impl TaskData {
    fn empty() -> Self {
        Self::default()
    }

    fn contains(&self, id: &str) -> bool {
        self.tasks.contains_key(id) || self.unreadable.contains_key(id)
    }
}

/// CRUD and date-range queries for tasks.
///
/// Reads hand out owned copies; callers can sort or filter them freely.
pub struct TaskStore<'a> {
    kv: &'a dyn KeyValueStore,
}

impl<'a> TaskStore<'a> {
    /// Create a task store over the given key-value storage.
    pub fn new(kv: &'a dyn KeyValueStore) -> Self {
        Self { kv }
    }

    /// Load the task document, falling back to an empty one if the stored
    /// payload is unreadable or has the wrong version.
    ///
    /// Individual records that do not parse are kept aside and are not
    /// visible to queries.
    fn load(&self) -> Result<TaskData> {
        let Some(raw) = self.kv.get(keys::TASKS)? else {
            return Ok(TaskData::empty());
        };

        let stored = match serde_json::from_str::<StoredTasks>(&raw) {
            Ok(stored) if stored.version == SCHEMA_VERSION => stored,
            Ok(stored) => {
                tracing::warn!(version = stored.version, "unknown task data version, resetting");
                return Ok(TaskData::empty());
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load task data, resetting");
                return Ok(TaskData::empty());
            }
        };

        let mut data = TaskData::empty();
        for (id, value) in stored.tasks {
            match serde_json::from_value::<Task>(value.clone()) {
                Ok(task) => {
                    data.tasks.insert(id, task);
                }
                Err(e) => {
                    tracing::warn!(id = %id, error = %e, "skipping unreadable task");
                    data.unreadable.insert(id, value);
                }
            }
        }
        Ok(data)
    }

    fn save(&self, data: &TaskData) -> Result<()> {
        let mut tasks = data.unreadable.clone();
        for (id, task) in &data.tasks {
            tasks.insert(id.clone(), serde_json::to_value(task)?);
        }
        let raw = serde_json::to_string(&json!({ "version": SCHEMA_VERSION, "tasks": tasks }))?;
        self.kv.set(keys::TASKS, &raw)
    }

    /// All tasks.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    pub fn all(&self) -> Result<Vec<Task>> {
        Ok(self.load()?.tasks.into_values().collect())
    }

    /// Get a task by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    pub fn get(&self, id: &str) -> Result<Option<Task>> {
        Ok(self.load()?.tasks.remove(id))
    }

    /// Tasks scheduled on one day.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    pub fn by_date(&self, date: NaiveDate) -> Result<Vec<Task>> {
        Ok(self.all()?.into_iter().filter(|t| t.date == date).collect())
    }

    /// Tasks scheduled on any of the given days (typically one week).
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    pub fn by_dates(&self, dates: &[NaiveDate]) -> Result<Vec<Task>> {
        let wanted: HashSet<NaiveDate> = dates.iter().copied().collect();
        Ok(self.all()?.into_iter().filter(|t| wanted.contains(&t.date)).collect())
    }

    /// Tasks scheduled between `start` and `end`, both inclusive.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    pub fn by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Task>> {
        Ok(self.all()?.into_iter().filter(|t| t.date >= start && t.date <= end).collect())
    }

    /// Create a task from a draft.
    ///
    /// A missing category defaults to the registry's first category and a
    /// missing priority to medium.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the title is blank, or an error if the
    /// storage cannot be read or written.
    pub fn add(&self, draft: TaskDraft) -> Result<Task> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(Error::Validation("task title must not be empty".to_string()));
        }

        let category = match draft.category {
            Some(category) if !category.is_empty() => category,
            _ => categories::default_category_id(self.kv)?,
        };

        let mut data = self.load()?;
        let mut id = generate_task_id();
        while data.contains(&id) {
            id = generate_task_id();
        }

        let now = now_utc();
        let task = Task {
            id: id.clone(),
            title: title.to_string(),
            date: draft.date,
            category,
            priority: draft.priority.unwrap_or_default(),
            completed: false,
            created_at: now,
            updated_at: now,
        };
        data.tasks.insert(id, task.clone());
        self.save(&data)?;

        tracing::debug!(id = %task.id, date = %task.date, "task added");
        Ok(task)
    }

    /// Merge the given fields into a task and bump its `updated_at`.
    ///
    /// Returns `None` if no task has this ID. An empty update returns the task
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if a new title is blank, or an error if
    /// the storage cannot be read or written.
    pub fn update(&self, id: &str, update: TaskUpdate) -> Result<Option<Task>> {
        if update.is_empty() {
            return self.get(id);
        }

        let mut data = self.load()?;
        let Some(task) = data.tasks.get_mut(id) else {
            return Ok(None);
        };

        if let Some(title) = update.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(Error::Validation("task title must not be empty".to_string()));
            }
            task.title = title.to_string();
        }
        if let Some(date) = update.date {
            task.date = date;
        }
        if let Some(category) = update.category {
            task.category = category;
        }
        if let Some(priority) = update.priority {
            task.priority = priority;
        }
        if let Some(completed) = update.completed {
            task.completed = completed;
        }
        task.updated_at = now_utc();

        let updated = task.clone();
        self.save(&data)?;

        tracing::debug!(id, "task updated");
        Ok(Some(updated))
    }

    /// Reschedule a task onto another day.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read or written.
    pub fn move_to(&self, id: &str, date: NaiveDate) -> Result<Option<Task>> {
        self.update(id, TaskUpdate { date: Some(date), ..Default::default() })
    }

    /// Flip a task's completed flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read or written.
    pub fn toggle_complete(&self, id: &str) -> Result<Option<Task>> {
        let mut data = self.load()?;
        let Some(task) = data.tasks.get_mut(id) else {
            return Ok(None);
        };

        task.completed = !task.completed;
        task.updated_at = now_utc();
        let toggled = task.clone();
        self.save(&data)?;

        tracing::debug!(id, completed = toggled.completed, "task toggled");
        Ok(Some(toggled))
    }

    /// Delete a task. Returns `false` if no task has this ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read or written.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let mut data = self.load()?;
        if data.tasks.remove(id).is_none() {
            return Ok(false);
        }
        self.save(&data)?;

        tracing::debug!(id, "task removed");
        Ok(true)
    }
}
