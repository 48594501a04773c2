//! Debug event logging.
//!
//! When `debug_logging` is enabled in the config, planner events (extraction
//! requests, failures, awarded stickers) are appended as JSONL lines to
//! `events.jsonl` in the data directory.

use crate::config::PlannerConfig;
use crate::paths;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appends events to a JSONL file, or does nothing when disabled.
///
/// Errors are silently ignored. Logging never breaks a planner operation.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    path: Option<PathBuf>,
}

impl EventLog {
    /// An event log that records nothing.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { path: None }
    }

    /// An event log writing into `data_dir`.
    #[must_use]
    pub fn enabled(data_dir: &Path) -> Self {
        Self { path: Some(paths::events_path(data_dir)) }
    }

    /// Enabled when the config's `debug_logging` flag is set.
    #[must_use]
    pub fn from_config(data_dir: &Path, config: &PlannerConfig) -> Self {
        if config.debug_logging {
            Self::enabled(data_dir)
        } else {
            Self::disabled()
        }
    }

    /// Whether events are written anywhere.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.path.is_some()
    }

    /// Append one event.
    pub fn record(&self, event_type: &str, details: &serde_json::Value) {
        let Some(log_path) = &self.path else {
            return;
        };
        write_event(log_path, event_type, details);
    }
}

/// Write the event to the log file.
fn write_event(log_path: &Path, event_type: &str, details: &serde_json::Value) {
    if let Some(parent) = log_path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return;
        }
    }

    let entry = serde_json::json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "event_type": event_type,
        "details": details,
    });

    let Ok(mut file) = OpenOptions::new().create(true).append(true).open(log_path) else {
        return;
    };

    let _ = writeln!(file, "{entry}");
}
