//! Error types for `week_planner`.

use crate::planner::PlannerError;

/// Errors that can occur in the planner.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON parsing error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error occurred.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A `SQLite` database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A template error occurred.
    #[error("Template error: {0}")]
    Template(String),

    /// Input was rejected before anything was stored.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The home directory could not be determined.
    #[error("Could not determine a data directory (no home directory and WEEK_PLANNER_HOME unset)")]
    NoDataDir,

    /// The planner assistant failed.
    #[error(transparent)]
    Planner(#[from] PlannerError),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
