// src/error.rs
// Error types shared across the quiz engine and its I/O shell.

use thiserror::Error;

/// Failures reading or writing the memory-state store or the attempt log.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Corrupt state for item {item_id}: {reason}")]
    CorruptState { item_id: String, reason: String },
}

/// Errors raised by the scheduling and selection engine.
#[derive(Error, Debug)]
pub enum QuizError {
    #[error("The catalog has no items")]
    EmptyCatalog,

    #[error("Need {needed} distinct items for a question but the catalog has {available}")]
    NotEnoughItems { needed: usize, available: usize },

    #[error("Grade {0} is outside 0..=5")]
    InvalidGrade(u8),

    #[error("Option {0} is not part of the current question")]
    UnknownOption(String),

    #[error("There is no pending question to answer")]
    NoPendingQuestion,

    #[error("Persistence failure: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Problems loading or validating the item catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Blank value in column '{column}' on line {line}")]
    BlankValue { column: String, line: usize },
}

/// Problems reading the optional JSON config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures fetching, decoding or caching item images.
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not persist media index: {0}")]
    Persist(#[from] tempfile::PersistError),
}

pub type Result<T> = std::result::Result<T, QuizError>;
