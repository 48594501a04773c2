//! Task model types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Task priority levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Do this first.
    High,
    /// Normal work (default).
    #[default]
    Medium,
    /// Nice to have.
    Low,
}

impl Priority {
    /// All priorities, most urgent first.
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    /// Get the string representation of the priority.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Sort rank, 0 = most urgent.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = InvalidPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(InvalidPriority(s.to_string())),
        }
    }
}

/// Error when an invalid priority string is provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPriority(pub String);

impl std::fmt::Display for InvalidPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid priority: '{}' (must be one of: high, medium, low)", self.0)
    }
}

impl std::error::Error for InvalidPriority {}

/// A task scheduled on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, never reused.
    pub id: String,
    /// Short title.
    pub title: String,
    /// The day the task is scheduled on.
    pub date: NaiveDate,
    /// Category ID. May refer to a category that has since been deleted.
    pub category: String,
    /// Priority level.
    pub priority: Priority,
    /// Whether the task is done.
    pub completed: bool,
    /// When the task was created.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// When the task was last changed.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

/// The fields needed to create a task.
///
/// Also used for the proposed tasks of the planner assistant, which live only
/// until the user confirms or discards them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Title; surrounding whitespace is trimmed on insert.
    pub title: String,
    /// The day to schedule the task on.
    pub date: NaiveDate,
    /// Category ID; the registry's first category when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Priority; medium when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl TaskDraft {
    /// A draft with only a title and a date.
    #[must_use]
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        Self { title: title.into(), date, category: None, priority: None }
    }

    /// Set the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Fields that can be updated on a task.
#[derive(Debug, Default, Clone)]
pub struct TaskUpdate {
    /// New title (if Some).
    pub title: Option<String>,
    /// New date (if Some).
    pub date: Option<NaiveDate>,
    /// New category (if Some).
    pub category: Option<String>,
    /// New priority (if Some).
    pub priority: Option<Priority>,
    /// New completion state (if Some).
    pub completed: Option<bool>,
}

impl TaskUpdate {
    /// Check if any fields are set for update.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.date.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.completed.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_default() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_priority_from_str() {
        assert_eq!("high".parse::<Priority>(), Ok(Priority::High));
        assert_eq!("LOW".parse::<Priority>(), Ok(Priority::Low));
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_invalid_priority_display() {
        let err = "urgent".parse::<Priority>().unwrap_err();
        assert!(err.to_string().contains("urgent"));
    }

    #[test]
    fn test_priority_rank_order() {
        assert!(Priority::High.rank() < Priority::Medium.rank());
        assert!(Priority::Medium.rank() < Priority::Low.rank());
    }

    #[test]
    fn test_task_serializes_camel_case_with_millis() {
        let ts = DateTime::from_timestamp_millis(1_738_713_600_000).unwrap();
        let task = Task {
            id: "task_1_abc".to_string(),
            title: "Call dentist".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 2, 5).unwrap(),
            category: "health".to_string(),
            priority: Priority::High,
            completed: false,
            created_at: ts,
            updated_at: ts,
        };

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["date"], "2025-02-05");
        assert_eq!(json["priority"], "high");
        assert_eq!(json["createdAt"], 1_738_713_600_000_i64);
        assert_eq!(json["updatedAt"], 1_738_713_600_000_i64);

        let back: Task = serde_json::from_value(json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn test_task_update_is_empty() {
        assert!(TaskUpdate::default().is_empty());
        assert!(!TaskUpdate { completed: Some(true), ..Default::default() }.is_empty());
    }

    #[test]
    fn test_draft_builders() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 5).unwrap();
        let draft = TaskDraft::new("Run", date).with_category("health").with_priority(Priority::Low);
        assert_eq!(draft.category.as_deref(), Some("health"));
        assert_eq!(draft.priority, Some(Priority::Low));
    }
}
