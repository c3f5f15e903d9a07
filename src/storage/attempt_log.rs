// src/storage/attempt_log.rs
// Manages the append-only CSV log of answered questions.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;

const HEADER: [&str; 5] = ["timestamp", "item_id", "chosen_id", "correct", "elapsed_ms"];

/// One answered question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub timestamp: DateTime<Utc>,
    pub item_id: String,
    pub chosen_id: String,
    /// 1 when the chosen option was the pictured item, else 0.
    pub correct: u8,
    pub elapsed_ms: u64,
}

impl AttemptRecord {
    pub fn is_correct(&self) -> bool {
        self.correct != 0
    }
}

/// Anything that accepts attempt records.
pub trait AttemptSink {
    fn append(&mut self, record: &AttemptRecord) -> Result<(), PersistenceError>;
}

pub struct CsvAttemptLog {
    log_path: PathBuf,
}

impl CsvAttemptLog {
    pub fn new(log_path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let log_path = log_path.into();
        if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(CsvAttemptLog { log_path })
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

impl AttemptSink for CsvAttemptLog {
    fn append(&mut self, record: &AttemptRecord) -> Result<(), PersistenceError> {
        // Open the file in append mode, creating it if it doesn't exist.
        let file = OpenOptions::new().create(true).append(true).open(&self.log_path)?;
        let is_new = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        if is_new {
            writer.write_record(HEADER)?;
        }
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }
}

/// Hit counts for one item or for the whole log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub attempts: u64,
    pub correct: u64,
}

impl Tally {
    fn add(&mut self, correct: bool) {
        self.attempts += 1;
        if correct {
            self.correct += 1;
        }
    }

    pub fn accuracy(&self) -> Option<f64> {
        if self.attempts == 0 {
            None
        } else {
            Some(self.correct as f64 / self.attempts as f64)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AccuracySummary {
    pub overall: Tally,
    pub per_item: BTreeMap<String, Tally>,
}

/// Aggregates accuracy over a log file. A missing log is an empty summary.
pub fn summarize(path: &Path) -> Result<AccuracySummary, PersistenceError> {
    let mut summary = AccuracySummary::default();
    if !path.exists() {
        return Ok(summary);
    }

    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    for result in reader.deserialize::<AttemptRecord>() {
        let record: AttemptRecord = result?;
        let correct = record.is_correct();
        summary.overall.add(correct);
        summary.per_item.entry(record.item_id).or_default().add(correct);
    }
    Ok(summary)
}
