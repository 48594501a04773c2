//! Tests for the CLI module.

use super::*;
use crate::calendar::parse_date_key;
use crate::paths;
use crate::tasks::Task;
use chrono::NaiveDate;
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tempfile::TempDir;

fn d(s: &str) -> NaiveDate {
    parse_date_key(s).unwrap()
}

fn parse(args: &[&str]) -> Command {
    let mut argv = vec!["week-planner"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap().command
}

fn exec(dir: &Path, args: &[&str]) -> CliOutput {
    run_in(parse(args), dir, d("2025-02-12"))
}

fn json(output: &CliOutput) -> serde_json::Value {
    assert_eq!(output.exit_code, ExitCode::SUCCESS, "stderr: {:?}", output.stderr);
    serde_json::from_str(&output.stdout[0]).unwrap()
}

fn add_task(dir: &Path, args: &[&str]) -> Task {
    let mut argv = vec!["task", "add"];
    argv.extend_from_slice(args);
    let output = exec(dir, &argv);
    assert_eq!(output.exit_code, ExitCode::SUCCESS, "stderr: {:?}", output.stderr);
    serde_json::from_str(&output.stdout[0]).unwrap()
}

#[test]
fn test_parse_week_defaults() {
    match parse(&["week"]) {
        Command::Week { date, category } => {
            assert!(date.is_none());
            assert_eq!(category, crate::view::CategoryFilter::All);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_month_argument() {
    match parse(&["month", "--month", "2026-02"]) {
        Command::Month { month, .. } => assert_eq!(month, Some(d("2026-02-01"))),
        other => panic!("unexpected command: {other:?}"),
    }
    assert!(Cli::try_parse_from(["week-planner", "month", "--month", "2026-13"]).is_err());
}

#[test]
fn test_parse_rejects_bad_priority() {
    assert!(Cli::try_parse_from(["week-planner", "task", "add", "x", "--priority", "urgent"]).is_err());
}

#[test]
fn test_parse_plan_hint() {
    match parse(&["plan", "--text", "notes", "--hint", "next-week", "--skip", "2"]) {
        Command::Plan { hint, skip, yes, .. } => {
            assert_eq!(hint, crate::planner::DateHint::NextWeek);
            assert_eq!(skip, vec![2]);
            assert!(!yes);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    let output = exec(dir.path(), &["version"]);
    assert_eq!(output.exit_code, ExitCode::SUCCESS);
    assert!(output.stderr[0].starts_with("week-planner v"));
}

#[test]
fn test_ensure_config_writes_defaults() {
    let dir = TempDir::new().unwrap();
    let output = exec(dir.path(), &["ensure-config"]);
    let config = json(&output);
    assert_eq!(config["max_tokens"], 2048);
    assert!(paths::config_path(dir.path()).exists());
}

#[test]
fn test_task_lifecycle() {
    let dir = TempDir::new().unwrap();
    let task = add_task(dir.path(), &["Call the plumber", "--priority", "high"]);
    assert_eq!(task.date, d("2025-02-12"));
    assert_eq!(task.category, "work");

    let done = json(&exec(dir.path(), &["task", "done", &task.id]));
    assert_eq!(done["completed"], true);

    let moved = json(&exec(dir.path(), &["task", "move", &task.id, "2025-02-14"]));
    assert_eq!(moved["date"], "2025-02-14");

    let edited = json(&exec(dir.path(), &["task", "edit", &task.id, "--title", "Call Bob"]));
    assert_eq!(edited["title"], "Call Bob");
    assert_eq!(edited["priority"], "high");

    let output = exec(dir.path(), &["task", "delete", &task.id]);
    assert_eq!(output.exit_code, ExitCode::SUCCESS);
    assert_eq!(output.stdout[0], format!("Task deleted: {}", task.id));

    let output = exec(dir.path(), &["task", "delete", &task.id]);
    assert_eq!(output.exit_code, ExitCode::from(1));
    assert!(output.stderr[0].contains("Task not found"));
}

#[test]
fn test_task_add_rejects_blank_title() {
    let dir = TempDir::new().unwrap();
    let output = exec(dir.path(), &["task", "add", "   "]);
    assert_eq!(output.exit_code, ExitCode::from(1));
}

#[test]
fn test_task_list_by_range_sorted_by_date() {
    let dir = TempDir::new().unwrap();
    add_task(dir.path(), &["Friday", "--date", "2025-02-14"]);
    add_task(dir.path(), &["Monday low", "--date", "2025-02-10", "--priority", "low"]);
    add_task(dir.path(), &["Monday high", "--date", "2025-02-10", "--priority", "high"]);
    add_task(dir.path(), &["Next week", "--date", "2025-02-17"]);

    let list = json(&exec(dir.path(), &["task", "list", "--from", "2025-02-10", "--to", "2025-02-16"]));
    let titles: Vec<&str> = list.as_array().unwrap().iter().map(|t| t["title"].as_str().unwrap()).collect();
    assert_eq!(titles, ["Monday high", "Monday low", "Friday"]);

    let list = json(&exec(dir.path(), &["task", "list", "--date", "2025-02-17"]));
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[test]
fn test_week_awards_sticker() {
    let dir = TempDir::new().unwrap();
    let task = add_task(dir.path(), &["Only task"]);
    exec(dir.path(), &["task", "done", &task.id]);

    let output = exec(dir.path(), &["week"]);
    let screen = json(&output);
    assert_eq!(screen["label"], "Feb 10 - 16, 2025");
    assert_eq!(screen["days"].as_array().unwrap().len(), 7);
    assert_eq!(screen["new_sticker"]["weekKey"], "2025-02-10");
    assert!(output.stderr[0].contains("Sticker earned"));

    let screen = json(&exec(dir.path(), &["week"]));
    assert!(screen["new_sticker"].is_null());
    assert_eq!(screen["sticker_count"], 1);

    let stickers = json(&exec(dir.path(), &["sticker", "list"]));
    assert_eq!(stickers.as_array().unwrap().len(), 1);
    let output = exec(dir.path(), &["sticker", "remove", "2025-02-10"]);
    assert_eq!(output.exit_code, ExitCode::SUCCESS);
}

#[test]
fn test_week_category_filter() {
    let dir = TempDir::new().unwrap();
    add_task(dir.path(), &["Work thing"]);
    add_task(dir.path(), &["Run", "--category", "health"]);

    let screen = json(&exec(dir.path(), &["week", "--category", "health"]));
    assert_eq!(screen["progress"]["total"], 1);
    assert_eq!(screen["progress"]["label"], "0 of 1 tasks");
}

#[test]
fn test_month_grid() {
    let dir = TempDir::new().unwrap();
    let screen = json(&exec(dir.path(), &["month", "--month", "2026-02"]));
    assert_eq!(screen["label"], "February 2026");
    assert_eq!(screen["rows"].as_array().unwrap().len(), 5);
}

#[test]
fn test_category_commands() {
    let dir = TempDir::new().unwrap();
    let list = json(&exec(dir.path(), &["category", "list"]));
    assert_eq!(list.as_array().unwrap().len(), 4);

    let added = json(&exec(dir.path(), &["category", "add", "Side Projects", "--color", "#112233"]));
    assert_eq!(added["id"], "side-projects");

    let updated = json(&exec(dir.path(), &["category", "update", "side-projects", "--name", "Hobbies"]));
    assert_eq!(updated["name"], "Hobbies");
    assert_eq!(updated["color"], "#112233");

    let css = exec(dir.path(), &["category", "css"]);
    assert!(css.stdout[0].contains(".cat-dot--side-projects { background: #112233; }"));

    let output = exec(dir.path(), &["category", "add", "Bad", "--color", "blue"]);
    assert_eq!(output.exit_code, ExitCode::from(1));

    let output = exec(dir.path(), &["category", "delete", "side-projects"]);
    assert_eq!(output.exit_code, ExitCode::SUCCESS);
    let output = exec(dir.path(), &["category", "delete", "side-projects"]);
    assert!(output.stderr[0].contains("Category not found"));
}

#[test]
fn test_key_commands() {
    let dir = TempDir::new().unwrap();
    assert_eq!(json(&exec(dir.path(), &["key", "status"]))["configured"], false);
    assert_eq!(json(&exec(dir.path(), &["key", "set", "sk-ant-test"]))["configured"], true);
    assert_eq!(json(&exec(dir.path(), &["key", "status"]))["configured"], true);
    assert_eq!(json(&exec(dir.path(), &["key", "clear"]))["configured"], false);
}

#[test]
fn test_plan_checks_input_and_key_before_network() {
    let dir = TempDir::new().unwrap();

    let output = exec(dir.path(), &["plan"]);
    assert_eq!(output.exit_code, ExitCode::from(1));
    assert_eq!(output.stderr[0], "Please paste some text to analyze.");

    let output = exec(dir.path(), &["plan", "--text", "call the plumber"]);
    assert_eq!(output.exit_code, ExitCode::from(1));
    assert!(output.stderr[0].contains("API key"));
}

#[test]
fn test_plan_missing_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.txt");
    let output = exec(dir.path(), &["plan", "--file", missing.to_str().unwrap()]);
    assert_eq!(output.exit_code, ExitCode::from(1));
    assert!(output.stderr[0].starts_with("Error reading"));
}

#[test]
#[serial_test::serial]
fn test_run_uses_home_env_var() {
    let dir = TempDir::new().unwrap();
    let original = std::env::var(paths::HOME_ENV_VAR).ok();
    std::env::set_var(paths::HOME_ENV_VAR, dir.path());

    let output = run(parse(&["category", "list"]));

    match original {
        Some(v) => std::env::set_var(paths::HOME_ENV_VAR, v),
        None => std::env::remove_var(paths::HOME_ENV_VAR),
    }
    assert_eq!(output.exit_code, ExitCode::SUCCESS);
    assert!(paths::db_path(dir.path()).exists());
}
