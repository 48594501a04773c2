//! View models for the week and month screens.
//!
//! Everything here is a pure function of a task snapshot, the category list
//! and today's date. Rendering the models (terminal, HTML, JSON) is up to the
//! caller.

use crate::calendar;
use crate::categories::{Category, FALLBACK_COLOR};
use crate::tasks::{Priority, Task};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Dots shown per month cell before the overflow count.
pub const MAX_DOTS: usize = 4;

/// Display order: incomplete before completed, incomplete by priority.
///
/// Completed tasks, and incomplete tasks of equal priority, keep their
/// relative order.
#[must_use]
pub fn sort_tasks(mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by(|a, b| match (a.completed, b.completed) {
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (false, false) => a.priority.rank().cmp(&b.priority.rank()),
        (true, true) => Ordering::Equal,
    });
    tasks
}

/// Which categories are shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Every task.
    #[default]
    All,
    /// Only tasks in this category.
    Category(String),
}

impl CategoryFilter {
    /// Whether a task passes the filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Category(id) => task.category == *id,
        }
    }
}

impl std::str::FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            Ok(Self::Category(s.to_string()))
        }
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Category(id) => f.write_str(id),
        }
    }
}

/// Completion summary for the visible tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// Completed tasks.
    pub done: usize,
    /// All tasks counted.
    pub total: usize,
    /// Rounded percentage, 0 when there are no tasks.
    pub pct: u8,
    /// Summary line.
    pub label: String,
}

impl Progress {
    /// Summarize the tasks that pass `filter`.
    #[must_use]
    pub fn from_tasks<'t>(tasks: impl IntoIterator<Item = &'t Task>, filter: &CategoryFilter) -> Self {
        let (done, total) = tasks
            .into_iter()
            .filter(|t| filter.matches(t))
            .fold((0, 0), |(done, total), t| (done + usize::from(t.completed), total + 1));

        #[allow(clippy::cast_precision_loss)]
        let pct = if total == 0 {
            0
        } else {
            crate::rewards::fraction_to_pct(done as f64 / total as f64)
        };
        let label = if total == 0 {
            "No tasks this week".to_string()
        } else if pct == 100 {
            "All done!".to_string()
        } else {
            format!("{done} of {total} tasks")
        };

        Self { done, total, pct, label }
    }

    /// Whether every counted task is done.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.total > 0 && self.pct == 100
    }
}

/// A task as shown in a day column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskCard {
    /// Task ID.
    pub id: String,
    /// Title.
    pub title: String,
    /// Category ID.
    pub category: String,
    /// Category display name (the raw ID for deleted categories).
    pub category_name: String,
    /// Category color.
    pub color: String,
    /// Priority.
    pub priority: Priority,
    /// Whether done.
    pub completed: bool,
}

/// Name and color lookup by category ID.
struct CategoryLookup<'c> {
    by_id: HashMap<&'c str, &'c Category>,
}

impl<'c> CategoryLookup<'c> {
    fn new(categories: &'c [Category]) -> Self {
        Self { by_id: categories.iter().map(|c| (c.id.as_str(), c)).collect() }
    }

    fn name<'a>(&'a self, id: &'a str) -> &'a str {
        self.by_id.get(id).map_or(id, |c| c.name.as_str())
    }

    fn color(&self, id: &str) -> &str {
        self.by_id.get(id).map_or(FALLBACK_COLOR, |c| c.color.as_str())
    }

    fn card(&self, task: &Task) -> TaskCard {
        TaskCard {
            id: task.id.clone(),
            title: task.title.clone(),
            category: task.category.clone(),
            category_name: self.name(&task.category).to_string(),
            color: self.color(&task.category).to_string(),
            priority: task.priority,
            completed: task.completed,
        }
    }
}

/// Group tasks by day, keeping input order within a day.
fn by_date(tasks: &[Task]) -> HashMap<NaiveDate, Vec<&Task>> {
    let mut grouped: HashMap<NaiveDate, Vec<&Task>> = HashMap::new();
    for task in tasks {
        grouped.entry(task.date).or_default().push(task);
    }
    grouped
}

/// One day of the week view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayColumn {
    /// `YYYY-MM-DD`.
    pub date: String,
    /// E.g. `Mon 10`.
    pub header: String,
    /// Whether this is today.
    pub is_today: bool,
    /// Whether this is a Saturday or Sunday.
    pub is_weekend: bool,
    /// The day's tasks in display order.
    pub tasks: Vec<TaskCard>,
}

/// The week screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekView {
    /// E.g. `Feb 10 - 16, 2025`.
    pub label: String,
    /// Monday..Sunday.
    pub days: Vec<DayColumn>,
    /// Completion over the week's visible tasks.
    pub progress: Progress,
}

impl WeekView {
    /// Build the week view. Tasks outside `week` are ignored.
    #[must_use]
    pub fn build(
        week: &[NaiveDate; 7],
        tasks: &[Task],
        categories: &[Category],
        filter: &CategoryFilter,
        today: NaiveDate,
    ) -> Self {
        let lookup = CategoryLookup::new(categories);
        let grouped = by_date(tasks);

        let days = week
            .iter()
            .map(|&date| {
                let day_tasks: Vec<Task> = grouped
                    .get(&date)
                    .into_iter()
                    .flatten()
                    .filter(|t| filter.matches(t))
                    .map(|t| (*t).clone())
                    .collect();
                DayColumn {
                    date: calendar::to_date_key(date),
                    header: calendar::format_day_header(date),
                    is_today: calendar::is_today(date, today),
                    is_weekend: calendar::is_weekend(date),
                    tasks: sort_tasks(day_tasks).iter().map(|t| lookup.card(t)).collect(),
                }
            })
            .collect();

        let in_week = tasks.iter().filter(|t| week.contains(&t.date));
        Self {
            label: calendar::format_week_range(week),
            days,
            progress: Progress::from_tasks(in_week, filter),
        }
    }
}

/// A task marker in a month cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthDot {
    /// Category ID.
    pub category: String,
    /// Category color.
    pub color: String,
    /// Whether the task is done.
    pub completed: bool,
}

/// One day of the month grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthCell {
    /// `YYYY-MM-DD`.
    pub date: String,
    /// Day of the month.
    pub day: u32,
    /// False for leading and trailing days of neighbouring months.
    pub in_month: bool,
    /// Whether this is today.
    pub is_today: bool,
    /// Whether this is a Saturday or Sunday.
    pub is_weekend: bool,
    /// Up to [`MAX_DOTS`] markers.
    pub dots: Vec<MonthDot>,
    /// Visible tasks beyond the shown dots.
    pub more: usize,
}

/// The month screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthView {
    /// E.g. `February 2026`.
    pub label: String,
    /// Weeks of seven cells, Monday first.
    pub rows: Vec<Vec<MonthCell>>,
    /// Completion over the visible tasks from the 1st to the last day.
    pub progress: Progress,
}

impl MonthView {
    /// Build the month view. Returns `None` for an invalid month.
    #[must_use]
    pub fn build(
        year: i32,
        month: u32,
        tasks: &[Task],
        categories: &[Category],
        filter: &CategoryFilter,
        today: NaiveDate,
    ) -> Option<Self> {
        let (first, last) = calendar::month_bounds(year, month)?;
        let grid = calendar::month_grid_dates(year, month)?;
        let lookup = CategoryLookup::new(categories);
        let grouped = by_date(tasks);

        let cells: Vec<MonthCell> = grid
            .iter()
            .map(|&date| {
                let visible: Vec<&Task> = grouped
                    .get(&date)
                    .into_iter()
                    .flatten()
                    .copied()
                    .filter(|t| filter.matches(t))
                    .collect();
                MonthCell {
                    date: calendar::to_date_key(date),
                    day: date.day(),
                    in_month: calendar::is_same_month(date, first),
                    is_today: calendar::is_today(date, today),
                    is_weekend: calendar::is_weekend(date),
                    dots: visible
                        .iter()
                        .take(MAX_DOTS)
                        .map(|t| MonthDot {
                            category: t.category.clone(),
                            color: lookup.color(&t.category).to_string(),
                            completed: t.completed,
                        })
                        .collect(),
                    more: visible.len().saturating_sub(MAX_DOTS),
                }
            })
            .collect();

        let in_month = tasks.iter().filter(|t| t.date >= first && t.date <= last);
        Some(Self {
            label: calendar::format_month(first),
            rows: cells.chunks(7).map(<[MonthCell]>::to_vec).collect(),
            progress: Progress::from_tasks(in_month, filter),
        })
    }
}

/// Which screen is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Seven day columns.
    #[default]
    Week,
    /// Calendar grid.
    Month,
}

/// Navigation state of the planner screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    /// The screen shown.
    pub view: ViewMode,
    /// Monday of the week shown in week view.
    pub week_start: NaiveDate,
    /// Any day in the month shown in month view.
    pub month_date: NaiveDate,
    /// The active category filter.
    pub filter: CategoryFilter,
}

impl AppState {
    /// Start on the week containing `today`.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            view: ViewMode::Week,
            week_start: calendar::monday_of(today),
            month_date: today,
            filter: CategoryFilter::All,
        }
    }

    /// The dates of the week shown in week view.
    #[must_use]
    pub fn week_dates(&self) -> [NaiveDate; 7] {
        calendar::week_dates(self.week_start)
    }

    /// Go back one week or to the first of the previous month.
    pub fn prev(&mut self) {
        match self.view {
            ViewMode::Week => self.week_start -= Duration::days(7),
            ViewMode::Month => self.month_date = calendar::shift_month(self.month_date, -1),
        }
    }

    /// Go forward one week or to the first of the next month.
    pub fn next(&mut self) {
        match self.view {
            ViewMode::Week => self.week_start += Duration::days(7),
            ViewMode::Month => self.month_date = calendar::shift_month(self.month_date, 1),
        }
    }

    /// Jump back to the week and month containing `today`.
    pub fn go_today(&mut self, today: NaiveDate) {
        self.week_start = calendar::monday_of(today);
        self.month_date = today;
    }

    /// Switch screens, carrying the position across.
    ///
    /// Month view opens on the month of the current week's Monday; week
    /// view opens on the week containing the current month date.
    pub fn set_view(&mut self, view: ViewMode) {
        if view == self.view {
            return;
        }
        self.view = view;
        match view {
            ViewMode::Month => self.month_date = self.week_start,
            ViewMode::Week => self.week_start = calendar::monday_of(self.month_date),
        }
    }

    /// Change the category filter.
    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.filter = filter;
    }
}
