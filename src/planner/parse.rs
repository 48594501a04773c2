//! Parsing and normalizing the model's reply.
//!
//! The reply should be a JSON array of `{title, date, category, priority}`
//! objects, possibly wrapped in a markdown code fence. Anything the model
//! gets wrong is clamped to a safe value rather than rejected.

use super::{PlannerError, MAX_TASKS};
use crate::calendar;
use crate::categories::DEFAULT_CATEGORY_ID;
use crate::tasks::{Priority, TaskDraft};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Longest title kept, in characters.
pub const MAX_TITLE_CHARS: usize = 100;

static FENCE_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^```(?:json)?\s*").expect("opening fence regex is valid"));
static FENCE_CLOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*```$").expect("closing fence regex is valid"));

/// Remove a surrounding markdown code fence, if any.
#[must_use]
pub fn strip_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    let opened = FENCE_OPEN.replace(trimmed, "");
    FENCE_CLOSE.replace(&opened, "").into_owned()
}

fn title_of(entry: &Value) -> String {
    let title = match entry.get("title") {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null | Value::Bool(false)) => String::new(),
        Some(other) => other.to_string(),
    };
    title.chars().take(MAX_TITLE_CHARS).collect::<String>().trim().to_string()
}

fn date_of(entry: &Value, today: NaiveDate) -> NaiveDate {
    entry
        .get("date")
        .and_then(Value::as_str)
        .filter(|s| calendar::is_date_key(s))
        .and_then(calendar::parse_date_key)
        .unwrap_or(today)
}

fn category_of(entry: &Value, category_ids: &[&str]) -> String {
    let fallback = category_ids.first().copied().unwrap_or(DEFAULT_CATEGORY_ID);
    let category = entry
        .get("category")
        .and_then(Value::as_str)
        .filter(|c| category_ids.contains(c))
        .unwrap_or(fallback);
    category.to_string()
}

fn priority_of(entry: &Value) -> Priority {
    entry
        .get("priority")
        .and_then(Value::as_str)
        .and_then(|p| Priority::ALL.into_iter().find(|known| known.as_str() == p))
        .unwrap_or_default()
}

/// Turn a reply into drafts.
///
/// At most [`MAX_TASKS`] entries are read. Entries with blank titles are
/// dropped; every other field falls back to a valid value.
///
/// # Errors
///
/// Returns [`PlannerError::NoActionableTasks`] if the reply is not a JSON
/// array, is empty, or has no entry with a title.
pub fn parse_response(
    raw: &str,
    category_ids: &[&str],
    today: NaiveDate,
) -> Result<Vec<TaskDraft>, PlannerError> {
    let cleaned = strip_fences(raw);
    let Ok(Value::Array(entries)) = serde_json::from_str::<Value>(&cleaned) else {
        tracing::debug!("reply is not a JSON array");
        return Err(PlannerError::NoActionableTasks);
    };

    let drafts: Vec<TaskDraft> = entries
        .iter()
        .take(MAX_TASKS)
        .filter_map(|entry| {
            let title = title_of(entry);
            if title.is_empty() {
                return None;
            }
            Some(
                TaskDraft::new(title, date_of(entry, today))
                    .with_category(category_of(entry, category_ids))
                    .with_priority(priority_of(entry)),
            )
        })
        .collect();

    if drafts.is_empty() {
        return Err(PlannerError::NoActionableTasks);
    }
    Ok(drafts)
}
