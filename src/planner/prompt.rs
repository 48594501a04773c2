//! System prompt for task extraction.

use super::{DateHint, MAX_TASKS};
use crate::calendar;
use crate::error::Result;
use crate::tasks::Priority;
use crate::templates;
use chrono::NaiveDate;

/// Render the extraction prompt for `today`.
///
/// The allowed categories and priorities are embedded as JSON arrays so the
/// model sees the exact strings it must answer with.
///
/// # Errors
///
/// Returns an error if the template cannot be rendered.
pub fn build_system_prompt(today: NaiveDate, hint: DateHint, category_ids: &[&str]) -> Result<String> {
    let priorities: Vec<&str> = Priority::ALL.iter().map(|p| p.as_str()).collect();

    let mut ctx = tera::Context::new();
    ctx.insert("day_name", calendar::day_name(today));
    ctx.insert("today", &calendar::to_date_key(today));
    ctx.insert("hint", &hint.prompt_text().unwrap_or_default());
    ctx.insert("categories", &serde_json::to_string(category_ids)?);
    ctx.insert("priorities", &serde_json::to_string(&priorities)?);
    ctx.insert("max_tasks", &MAX_TASKS);

    templates::render(templates::TASK_EXTRACTION, &ctx)
}
