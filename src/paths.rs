//! Path utilities for determining data storage locations.
//!
//! All planner state lives in one data directory: `$WEEK_PLANNER_HOME` when
//! set, otherwise `~/.week-planner/`.

use std::path::{Path, PathBuf};

/// Environment variable that overrides the data directory.
pub const HOME_ENV_VAR: &str = "WEEK_PLANNER_HOME";

/// The base directory name under the user's home directory.
const DATA_DIR_NAME: &str = ".week-planner";

/// The database filename.
pub const DATABASE_FILENAME: &str = "planner.sqlite3";

/// The config filename.
pub const CONFIG_FILENAME: &str = "config.yaml";

/// The debug event log filename.
pub const EVENTS_FILENAME: &str = "events.jsonl";

/// Get the base data directory.
///
/// Returns `None` if neither the override variable nor the home directory
/// is available.
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    match std::env::var_os(HOME_ENV_VAR) {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::home_dir().map(|home| home.join(DATA_DIR_NAME)),
    }
}

/// Get the database path inside a data directory.
#[must_use]
pub fn db_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DATABASE_FILENAME)
}

/// Get the config file path inside a data directory.
#[must_use]
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILENAME)
}

/// Get the event log path inside a data directory.
#[must_use]
pub fn events_path(data_dir: &Path) -> PathBuf {
    data_dir.join(EVENTS_FILENAME)
}
