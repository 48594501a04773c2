//! Task CLI subcommands.

use crate::tasks::Priority;
use chrono::NaiveDate;
use clap::Subcommand;

/// Task management commands.
///
/// ## Quick Start
///
/// ```bash
/// # Add a task for today
/// week-planner task add "Call the plumber" --priority high
///
/// # Mark it done (run again to undo)
/// week-planner task done <id>
///
/// # Push it to Friday
/// week-planner task move <id> 2025-02-14
/// ```
#[derive(Subcommand, Debug, Clone)]
pub enum TaskCommand {
    /// Add a task.
    ///
    /// Without `--category` the task goes to the first category.
    Add {
        /// Task title
        title: String,

        /// Day of the task (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Category id
        #[arg(short, long)]
        category: Option<String>,

        /// Priority: high, medium or low
        #[arg(short, long)]
        priority: Option<Priority>,
    },

    /// Change a task's fields. Only specified fields are updated.
    Edit {
        /// Task ID
        id: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New day
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// New category id
        #[arg(short, long)]
        category: Option<String>,

        /// New priority
        #[arg(short, long)]
        priority: Option<Priority>,
    },

    /// Toggle a task between done and not done.
    Done {
        /// Task ID
        id: String,
    },

    /// Move a task to another day.
    Move {
        /// Task ID
        id: String,

        /// Target day
        date: NaiveDate,
    },

    /// Delete a task.
    Delete {
        /// Task ID
        id: String,
    },

    /// List tasks, by day or by inclusive date range.
    List {
        /// Only this day
        #[arg(short, long, conflicts_with_all = ["from", "to"])]
        date: Option<NaiveDate>,

        /// First day of the range
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,

        /// Last day of the range
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,
    },
}
