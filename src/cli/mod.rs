//! Command-line interface for week-planner.
//!
//! Every command prints pretty JSON on stdout. Errors go to stderr and exit
//! with code 1.

mod category;
mod key;
mod run;
mod sticker;
mod task;

#[cfg(test)]
mod tests;

pub use category::CategoryCommand;
pub use key::KeyCommand;
pub use run::{run, run_in, CliOutput};
pub use sticker::StickerCommand;
pub use task::TaskCommand;

use crate::planner::DateHint;
use crate::view::CategoryFilter;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Weekly and monthly task planner.
///
/// State lives in `$WEEK_PLANNER_HOME` (default `~/.week-planner`).
/// Set `WEEK_PLANNER_LOG=debug` for diagnostic output on stderr.
#[derive(Parser, Debug)]
#[command(name = "week-planner")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show a week with its progress, awarding the week's sticker if earned.
    Week {
        /// Any day in the week to show (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Only show tasks in this category ("all" for every task)
        #[arg(short, long, default_value = "all")]
        category: CategoryFilter,
    },

    /// Show a month as a Monday-first calendar grid.
    Month {
        /// Month to show as YYYY-MM (default: this month)
        #[arg(short, long, value_parser = parse_month)]
        month: Option<NaiveDate>,

        /// Only show tasks in this category ("all" for every task)
        #[arg(short, long, default_value = "all")]
        category: CategoryFilter,
    },

    /// Task management - add, edit, complete, move and delete tasks.
    #[command(subcommand)]
    Task(TaskCommand),

    /// Category management - list, add, rename, recolor and delete.
    #[command(subcommand)]
    Category(CategoryCommand),

    /// Earned weekly stickers.
    #[command(subcommand)]
    Sticker(StickerCommand),

    /// Turn free text and files into proposed tasks with the AI assistant.
    ///
    /// Without `--yes` the proposals are only printed. With `--yes` they are
    /// added, minus any indexes passed to `--skip`.
    Plan {
        /// Text to analyze (notes, an email, a meeting summary)
        #[arg(short, long, default_value = "")]
        text: String,

        /// Files to attach (text, images or PDF); may be repeated
        #[arg(short, long)]
        file: Vec<PathBuf>,

        /// Scheduling hint: auto, today, this-week, next-week or YYYY-MM-DD
        #[arg(long, default_value = "auto")]
        hint: DateHint,

        /// Add the proposed tasks instead of only printing them
        #[arg(short, long)]
        yes: bool,

        /// 1-based index of a proposal to leave out; may be repeated
        #[arg(long)]
        skip: Vec<usize>,
    },

    /// API key for the AI assistant.
    #[command(subcommand)]
    Key(KeyCommand),

    /// Ensure the config file exists (create with defaults if not).
    #[command(name = "ensure-config")]
    EnsureConfig,

    /// Show version information.
    Version,
}

/// Parse `YYYY-MM` into the first day of that month.
fn parse_month(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .map_err(|_| format!("invalid month '{s}' (expected YYYY-MM)"))
}
