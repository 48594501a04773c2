//! Reviewing proposed tasks before they are added.

use crate::error::Result;
use crate::tasks::{Priority, Task, TaskDraft, TaskStore};
use chrono::NaiveDate;

/// Proposed tasks awaiting confirmation.
///
/// Drafts exist only here; dropping the review discards them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Review {
    drafts: Vec<TaskDraft>,
}

/// A change to one proposed task.
#[derive(Debug, Clone, Default)]
pub struct DraftEdit {
    /// New title (if Some).
    pub title: Option<String>,
    /// New date (if Some).
    pub date: Option<NaiveDate>,
    /// New category (if Some).
    pub category: Option<String>,
    /// New priority (if Some).
    pub priority: Option<Priority>,
}

impl Review {
    /// Start a review of the given drafts.
    #[must_use]
    pub const fn new(drafts: Vec<TaskDraft>) -> Self {
        Self { drafts }
    }

    /// The drafts, in proposal order.
    #[must_use]
    pub fn drafts(&self) -> &[TaskDraft] {
        &self.drafts
    }

    /// Number of drafts left.
    #[must_use]
    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    /// Whether every draft has been removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    /// Change a draft. Returns `false` if `index` is out of range.
    pub fn edit(&mut self, index: usize, edit: DraftEdit) -> bool {
        let Some(draft) = self.drafts.get_mut(index) else {
            return false;
        };
        if let Some(title) = edit.title {
            draft.title = title;
        }
        if let Some(date) = edit.date {
            draft.date = date;
        }
        if let Some(category) = edit.category {
            draft.category = Some(category);
        }
        if let Some(priority) = edit.priority {
            draft.priority = Some(priority);
        }
        true
    }

    /// Drop a draft. Returns it, or `None` if `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Option<TaskDraft> {
        (index < self.drafts.len()).then(|| self.drafts.remove(index))
    }

    /// Add every remaining draft to the store.
    ///
    /// Drafts whose title was edited to blank are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read or written. Tasks added
    /// before the failure stay added.
    pub fn confirm(self, store: &TaskStore<'_>) -> Result<Vec<Task>> {
        let mut added = Vec::with_capacity(self.drafts.len());
        for draft in self.drafts {
            if draft.title.trim().is_empty() {
                continue;
            }
            added.push(store.add(draft)?);
        }
        tracing::info!(count = added.len(), "proposed tasks added");
        Ok(added)
    }
}
