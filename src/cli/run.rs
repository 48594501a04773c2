//! Command execution for the CLI.
//!
//! This module handles running CLI commands and producing output.

use crate::app::Planner;
use crate::calendar;
use crate::categories::{style_rules, CategoryUpdate};
use crate::cli::{CategoryCommand, Command, KeyCommand, StickerCommand, TaskCommand};
use crate::config::{self, PlannerConfig};
use crate::event_log::EventLog;
use crate::paths;
use crate::planner::{Attachment, DateHint, PlanRequest};
use crate::storage::SqliteStore;
use crate::tasks::{Priority, Task, TaskDraft, TaskUpdate};
use crate::view::{sort_tasks, AppState, CategoryFilter, ViewMode};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Output from running the CLI, with separate stdout and stderr messages.
#[derive(Debug)]
pub struct CliOutput {
    /// Exit code for the process.
    pub exit_code: ExitCode,
    /// Messages to print to stdout.
    pub stdout: Vec<String>,
    /// Messages to print to stderr.
    pub stderr: Vec<String>,
}

/// Result of a `plan` command.
#[derive(Debug, Serialize)]
struct PlanOutput {
    proposed: Vec<TaskDraft>,
    added: Vec<Task>,
}

/// Whether an API key is stored.
#[derive(Debug, Serialize)]
struct KeyStatus {
    configured: bool,
}

/// Run a CLI command against the configured data directory.
pub fn run(command: Command) -> CliOutput {
    let Some(data_dir) = paths::data_dir() else {
        return error_output(crate::error::Error::NoDataDir.to_string());
    };
    run_in(command, &data_dir, calendar::today())
}

/// Run a CLI command against `data_dir`, treating `today` as the current day.
pub fn run_in(command: Command, data_dir: &Path, today: NaiveDate) -> CliOutput {
    match command {
        Command::Version => run_version(),
        Command::EnsureConfig => run_ensure_config(data_dir),
        Command::Week { date, category } => {
            with_planner(data_dir, |p| run_week(p, date.unwrap_or(today), category, today))
        }
        Command::Month { month, category } => {
            with_planner(data_dir, |p| run_month(p, month.unwrap_or(today), category, today))
        }
        Command::Task(cmd) => with_planner(data_dir, |p| run_task_cmd(p, cmd, today)),
        Command::Category(cmd) => with_planner(data_dir, |p| run_category_cmd(p, cmd)),
        Command::Sticker(cmd) => with_planner(data_dir, |p| run_sticker_cmd(p, cmd)),
        Command::Plan { text, file, hint, yes, skip } => {
            with_planner(data_dir, |p| run_plan(p, text, &file, hint, yes, &skip, today))
        }
        Command::Key(cmd) => with_planner(data_dir, |p| run_key_cmd(p, cmd)),
    }
}

// === Utility Commands ===

fn run_version() -> CliOutput {
    CliOutput {
        exit_code: ExitCode::SUCCESS,
        stdout: vec![],
        stderr: vec![format!("week-planner v{}", crate::VERSION)],
    }
}

fn run_ensure_config(data_dir: &Path) -> CliOutput {
    match config::ensure_config(data_dir) {
        Ok(config) => {
            let mut output = json_output(&config);
            output.stderr.push(format!(
                "Config ensured at {}",
                PlannerConfig::config_path(data_dir).display()
            ));
            output
        }
        Err(e) => error_output(format!("Error ensuring config: {e}")),
    }
}

// === Views ===

fn run_week(
    planner: &Planner<'_>,
    date: NaiveDate,
    filter: CategoryFilter,
    today: NaiveDate,
) -> CliOutput {
    let mut state = AppState::new(date);
    state.set_filter(filter);
    match planner.week_view(&state, today) {
        Ok(screen) => {
            let mut output = json_output(&screen);
            if let Some(sticker) = &screen.new_sticker {
                output.stderr.push(format!(
                    "{} Sticker earned for {} ({}%)",
                    sticker.emoji, sticker.week_label, sticker.pct
                ));
            }
            output
        }
        Err(e) => error_output(e.to_string()),
    }
}

fn run_month(
    planner: &Planner<'_>,
    month: NaiveDate,
    filter: CategoryFilter,
    today: NaiveDate,
) -> CliOutput {
    let mut state = AppState::new(today);
    state.set_view(ViewMode::Month);
    state.month_date = month;
    state.set_filter(filter);
    match planner.month_view(&state, today) {
        Ok(screen) => json_output(&screen),
        Err(e) => error_output(e.to_string()),
    }
}

// === Task Commands ===

fn run_task_cmd(planner: &Planner<'_>, cmd: TaskCommand, today: NaiveDate) -> CliOutput {
    match cmd {
        TaskCommand::Add { title, date, category, priority } => {
            task_add(planner, title, date.unwrap_or(today), category, priority)
        }
        TaskCommand::Edit { id, title, date, category, priority } => {
            let update = TaskUpdate { title, date, category, priority, completed: None };
            task_result(&id, planner.tasks().update(&id, update))
        }
        TaskCommand::Done { id } => task_result(&id, planner.tasks().toggle_complete(&id)),
        TaskCommand::Move { id, date } => task_result(&id, planner.tasks().move_to(&id, date)),
        TaskCommand::Delete { id } => match planner.tasks().remove(&id) {
            Ok(true) => success_output(format!("Task deleted: {id}")),
            Ok(false) => error_output(format!("Task not found: {id}")),
            Err(e) => error_output(e.to_string()),
        },
        TaskCommand::List { date, from, to } => task_list(planner, date, from.zip(to)),
    }
}

fn task_add(
    planner: &Planner<'_>,
    title: String,
    date: NaiveDate,
    category: Option<String>,
    priority: Option<Priority>,
) -> CliOutput {
    let draft = TaskDraft { title, date, category, priority };
    match planner.tasks().add(draft) {
        Ok(task) => json_output(&task),
        Err(e) => error_output(e.to_string()),
    }
}

fn task_result(id: &str, result: crate::error::Result<Option<Task>>) -> CliOutput {
    match result {
        Ok(Some(task)) => json_output(&task),
        Ok(None) => error_output(format!("Task not found: {id}")),
        Err(e) => error_output(e.to_string()),
    }
}

fn task_list(
    planner: &Planner<'_>,
    date: Option<NaiveDate>,
    range: Option<(NaiveDate, NaiveDate)>,
) -> CliOutput {
    let store = planner.tasks();
    let tasks = match (date, range) {
        (Some(date), _) => store.by_date(date),
        (None, Some((from, to))) => store.by_date_range(from, to),
        (None, None) => store.all(),
    };
    match tasks {
        Ok(tasks) => {
            let mut tasks = sort_tasks(tasks);
            tasks.sort_by_key(|t| t.date);
            json_output(&tasks)
        }
        Err(e) => error_output(e.to_string()),
    }
}

// === Category Commands ===

fn run_category_cmd(planner: &mut Planner<'_>, cmd: CategoryCommand) -> CliOutput {
    match cmd {
        CategoryCommand::List => json_output(&planner.categories().all()),
        CategoryCommand::Add { name, color } => match planner.categories_mut().add(&name, &color) {
            Ok(category) => json_output(&category),
            Err(e) => error_output(e.to_string()),
        },
        CategoryCommand::Update { id, name, color } => {
            match planner.categories_mut().update(&id, CategoryUpdate { name, color }) {
                Ok(Some(category)) => json_output(&category),
                Ok(None) => error_output(format!("Category not found: {id}")),
                Err(e) => error_output(e.to_string()),
            }
        }
        CategoryCommand::Delete { id } => match planner.categories_mut().remove(&id) {
            Ok(true) => success_output(format!("Category deleted: {id}")),
            Ok(false) => error_output(format!("Category not found: {id}")),
            Err(e) => error_output(e.to_string()),
        },
        CategoryCommand::Css => success_output(style_rules(planner.categories().all())),
    }
}

// === Sticker Commands ===

fn run_sticker_cmd(planner: &Planner<'_>, cmd: StickerCommand) -> CliOutput {
    let stickers = planner.stickers();
    match cmd {
        StickerCommand::List => match stickers.all() {
            Ok(all) => json_output(&all),
            Err(e) => error_output(e.to_string()),
        },
        StickerCommand::Remove { week_key } => match stickers.remove(&week_key) {
            Ok(true) => success_output(format!("Sticker removed: {week_key}")),
            Ok(false) => error_output(format!("No sticker for week: {week_key}")),
            Err(e) => error_output(e.to_string()),
        },
    }
}

// === Planner Assistant ===

fn run_plan(
    planner: &Planner<'_>,
    text: String,
    files: &[PathBuf],
    hint: DateHint,
    yes: bool,
    skip: &[usize],
    today: NaiveDate,
) -> CliOutput {
    let mut attachments = Vec::with_capacity(files.len());
    for path in files {
        match Attachment::from_path(path) {
            Ok(a) => attachments.push(a),
            Err(e) => return error_output(format!("Error reading {}: {e}", path.display())),
        }
    }
    let request = PlanRequest { text, attachments, date_hint: hint };

    let mut review = match planner.plan(&request, today) {
        Ok(r) => r,
        Err(e) => return error_output(e.to_string()),
    };

    let mut skip: Vec<usize> = skip.to_vec();
    skip.sort_unstable();
    skip.dedup();
    if let Some(bad) = skip.iter().find(|&&i| i == 0 || i > review.len()) {
        return error_output(format!("No proposal #{bad} (got {})", review.len()));
    }
    for index in skip.iter().rev() {
        review.remove(index - 1);
    }

    let proposed = review.drafts().to_vec();
    if !yes {
        return json_output(&PlanOutput { proposed, added: vec![] });
    }
    match review.confirm(&planner.tasks()) {
        Ok(added) => json_output(&PlanOutput { proposed, added }),
        Err(e) => error_output(e.to_string()),
    }
}

// === Key Commands ===

fn run_key_cmd(planner: &Planner<'_>, cmd: KeyCommand) -> CliOutput {
    let configured = match cmd {
        KeyCommand::Set { key } => planner.set_api_key(&key),
        KeyCommand::Clear => planner.clear_api_key().map(|()| false),
        KeyCommand::Status => planner.api_key().map(|k| k.is_some()),
    };
    match configured {
        Ok(configured) => json_output(&KeyStatus { configured }),
        Err(e) => error_output(e.to_string()),
    }
}

// === Helpers ===

fn with_planner(data_dir: &Path, f: impl FnOnce(&mut Planner<'_>) -> CliOutput) -> CliOutput {
    let store = match open_store(data_dir) {
        Ok(s) => s,
        Err(e) => return error_output(e),
    };
    // Bound so the planner is dropped before `store`.
    let output = match open_planner(&store, data_dir) {
        Ok(mut planner) => f(&mut planner),
        Err(e) => error_output(e),
    };
    output
}

fn open_store(data_dir: &Path) -> Result<SqliteStore, String> {
    SqliteStore::new(data_dir).map_err(|e| e.to_string())
}

fn open_planner<'a>(store: &'a SqliteStore, data_dir: &Path) -> Result<Planner<'a>, String> {
    let config = PlannerConfig::load_or_default(data_dir).map_err(|e| e.to_string())?;
    let events = EventLog::from_config(data_dir, &config);
    let planner = Planner::new(store).map_err(|e| e.to_string())?;
    Ok(planner.with_config(config, events))
}

fn json_output<T: Serialize>(value: &T) -> CliOutput {
    match serde_json::to_string_pretty(value) {
        Ok(json) => CliOutput { exit_code: ExitCode::SUCCESS, stdout: vec![json], stderr: vec![] },
        Err(e) => error_output(e.to_string()),
    }
}

fn success_output(message: String) -> CliOutput {
    CliOutput { exit_code: ExitCode::SUCCESS, stdout: vec![message], stderr: vec![] }
}

fn error_output(message: String) -> CliOutput {
    CliOutput { exit_code: ExitCode::from(1), stdout: vec![], stderr: vec![message] }
}
