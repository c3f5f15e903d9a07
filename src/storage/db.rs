// src/storage/db.rs
// Manages the SQLite database for storing item memory states.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::StateStore;
use crate::error::PersistenceError;
use crate::scheduler::MemoryState;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqliteStateStore {
    conn: Connection,
}

impl SqliteStateStore {
    /// Opens (or creates) the state database at `path`.
    pub fn open(path: &Path) -> Result<Self, PersistenceError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let store = SqliteStateStore { conn: Connection::open(path)? };
        store.init_schema()?;
        log::debug!("Opened state database at {:?}", path);
        Ok(store)
    }

    /// A private database that vanishes with the connection.
    pub fn open_in_memory() -> Result<Self, PersistenceError> {
        let store = SqliteStateStore { conn: Connection::open_in_memory()? };
        store.init_schema()?;
        Ok(store)
    }

    /// Creates the necessary tables if they don't already exist.
    fn init_schema(&self) -> Result<(), PersistenceError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS memory_state (
                item_id         TEXT PRIMARY KEY,
                repetitions     INTEGER NOT NULL,
                interval_days   INTEGER NOT NULL,
                easiness        REAL NOT NULL,
                due_at          TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }
}

type StateRow = (String, u32, u32, f64, String);

fn read_row(row: &Row<'_>) -> rusqlite::Result<StateRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn decode((item_id, repetitions, interval_days, easiness, due_at): StateRow) -> Result<(String, MemoryState), PersistenceError> {
    let due_at = NaiveDate::parse_from_str(&due_at, DATE_FORMAT).map_err(|e| PersistenceError::CorruptState {
        item_id: item_id.clone(),
        reason: format!("bad due_at {:?}: {}", due_at, e),
    })?;
    Ok((item_id, MemoryState { repetitions, interval_days, easiness, due_at }))
}

impl StateStore for SqliteStateStore {
    fn get(&self, item_id: &str) -> Result<Option<MemoryState>, PersistenceError> {
        let row = self
            .conn
            .query_row(
                "SELECT item_id, repetitions, interval_days, easiness, due_at
                 FROM memory_state WHERE item_id = ?1",
                [item_id],
                read_row,
            )
            .optional()?;
        row.map(|r| decode(r).map(|(_, state)| state)).transpose()
    }

    /// Uses `INSERT OR REPLACE` so a record is always swapped as a whole.
    fn put(&mut self, item_id: &str, state: &MemoryState) -> Result<(), PersistenceError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO memory_state (item_id, repetitions, interval_days, easiness, due_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                item_id,
                state.repetitions,
                state.interval_days,
                state.easiness,
                state.due_at.format(DATE_FORMAT).to_string(),
            ],
        )?;
        Ok(())
    }

    fn all(&self) -> Result<HashMap<String, MemoryState>, PersistenceError> {
        let mut stmt = self
            .conn
            .prepare("SELECT item_id, repetitions, interval_days, easiness, due_at FROM memory_state")?;
        let rows = stmt.query_map([], read_row)?;

        let mut states = HashMap::new();
        for row in rows {
            let (item_id, state) = decode(row?)?;
            states.insert(item_id, state);
        }
        Ok(states)
    }
}
