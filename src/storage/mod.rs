// src/storage/mod.rs
// This module handles all data persistence: item memory states and the attempt log.

pub mod attempt_log;
pub mod db;

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::PersistenceError;
use crate::scheduler::MemoryState;

// Re-export the main structs for easier access.
pub use self::attempt_log::{AttemptRecord, AttemptSink, CsvAttemptLog};
pub use self::db::SqliteStateStore;

/// Keyed storage of memory states. `put` replaces the whole record.
pub trait StateStore {
    fn get(&self, item_id: &str) -> Result<Option<MemoryState>, PersistenceError>;
    fn put(&mut self, item_id: &str, state: &MemoryState) -> Result<(), PersistenceError>;
    fn all(&self) -> Result<HashMap<String, MemoryState>, PersistenceError>;

    /// The stored state, or the never-reviewed default due `today`.
    fn get_or_default(&self, item_id: &str, today: NaiveDate) -> Result<MemoryState, PersistenceError> {
        Ok(self.get(item_id)?.unwrap_or_else(|| MemoryState::new(today)))
    }
}

/// A volatile store, handy for tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    states: HashMap<String, MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for InMemoryStore {
    fn get(&self, item_id: &str) -> Result<Option<MemoryState>, PersistenceError> {
        Ok(self.states.get(item_id).cloned())
    }

    fn put(&mut self, item_id: &str, state: &MemoryState) -> Result<(), PersistenceError> {
        self.states.insert(item_id.to_string(), state.clone());
        Ok(())
    }

    fn all(&self) -> Result<HashMap<String, MemoryState>, PersistenceError> {
        Ok(self.states.clone())
    }
}
