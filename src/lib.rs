//! # `week_planner`
//!
//! A local-first weekly and monthly task planner. Tasks live on calendar
//! days, are grouped into colored categories and earn a sticker for any week
//! that reaches 80% completion. An optional assistant turns pasted text and
//! attached files into proposed tasks using a hosted model.
//!
//! ```no_run
//! use week_planner::app::Planner;
//! use week_planner::storage::SqliteStore;
//! use week_planner::view::AppState;
//!
//! # fn main() -> week_planner::error::Result<()> {
//! let data_dir = week_planner::paths::data_dir().ok_or(week_planner::error::Error::NoDataDir)?;
//! let store = SqliteStore::new(&data_dir)?;
//! let planner = Planner::new(&store)?;
//! let today = week_planner::calendar::today();
//! let screen = planner.week_view(&AppState::new(today), today)?;
//! println!("{}: {}", screen.view.label, screen.view.progress.label);
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod calendar;
pub mod categories;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod event_log;
pub mod paths;
pub mod planner;
pub mod rewards;
pub mod storage;
pub mod tasks;
pub mod templates;
pub mod testing;
pub mod traits;
pub mod view;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
