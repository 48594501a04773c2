//! Core traits for testability and abstraction.

use crate::error::Result;
use crate::planner::{ChatRequest, PlannerError};

/// Trait for string key-value persistence.
///
/// Every planner component stores one JSON document under a fixed key.
/// The production implementation uses `SQLite`, while tests use an
/// in-memory map.
pub trait KeyValueStore {
    /// Get the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Trait for the hosted chat-completion call behind the planner assistant.
///
/// The real implementation performs one HTTP request; tests script replies.
pub trait ChatClient {
    /// Send the request and return the text of the model's first content block.
    ///
    /// # Errors
    ///
    /// Returns a [`PlannerError`] describing the transport or API failure.
    fn complete(&self, request: &ChatRequest) -> std::result::Result<String, PlannerError>;
}
