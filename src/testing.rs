//! Testing utilities and mock implementations.
//!
//! These types are provided for use in tests. They may appear unused in
//! the library itself but are consumed by unit and integration tests.

#![allow(dead_code)]

use crate::error::Result;
use crate::planner::{ChatRequest, PlannerError};
use crate::traits::{ChatClient, KeyValueStore};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

/// An in-memory key-value store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

/// A store whose every operation fails, for testing error paths.
#[derive(Debug, Default)]
pub struct FailingStore {
    error_message: String,
}

impl FailingStore {
    /// Create a new failing store with the specified error message.
    #[must_use]
    pub fn new(error_message: impl Into<String>) -> Self {
        Self { error_message: error_message.into() }
    }

    fn fail<T>(&self) -> Result<T> {
        Err(std::io::Error::other(self.error_message.clone()).into())
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        self.fail()
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        self.fail()
    }

    fn remove(&self, _key: &str) -> Result<()> {
        self.fail()
    }
}

/// A mock chat client for testing.
///
/// Replies are scripted in order; every request is recorded.
#[derive(Debug, Default)]
pub struct MockChatClient {
    replies: RefCell<VecDeque<std::result::Result<String, PlannerError>>>,
    requests: RefCell<Vec<ChatRequest>>,
}

impl MockChatClient {
    /// Create a mock with no scripted replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of the next call.
    pub fn push_reply(&self, reply: std::result::Result<String, PlannerError>) {
        self.replies.borrow_mut().push_back(reply);
    }

    /// The requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.borrow().clone()
    }
}

impl ChatClient for MockChatClient {
    fn complete(&self, request: &ChatRequest) -> std::result::Result<String, PlannerError> {
        self.requests.borrow_mut().push(request.clone());
        let reply = self.replies.borrow_mut().pop_front();
        assert!(reply.is_some(), "Unexpected chat request (no more replies scripted)");
        reply.unwrap_or(Err(PlannerError::NoActionableTasks))
    }
}
