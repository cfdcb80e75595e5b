//! # signdb - Road Sign Catalog Importer
//!
//! Loads a nested JSON sign database into normalized relational tables.
//!
//! signdb provides:
//! - A typed, validated model of the source document (category → series → sign)
//! - SQLite-backed storage with storage-level uniqueness per catalog key
//! - An idempotent upsert primitive (`get_or_create`) for keyed rows
//! - A single-transaction importer that is safe to re-run

pub mod catalog;
pub mod source;
pub mod storage;
pub mod importer;
pub mod config;
pub mod output;
pub mod ui;

// Re-exports for convenient access
pub use catalog::{Category, FileType, Series, Sign, SignFile};
pub use source::{SignDocument, SignRecord};
pub use storage::SqliteStore;
pub use importer::{ImportEvent, ImportReport, Importer};
pub use config::ImportConfig;

/// Result type alias for signdb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for signdb operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid source document at {location}: {message}")]
    InvalidDocument { location: String, message: String },

    #[error("Invalid SQL identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("No lookup fields given for table {0}")]
    EmptyLookup(String),

    #[error("Unknown file type: {0}")]
    UnknownFileType(String),

    #[error("Unsupported database URL {0:?} (expected a path, sqlite:path or sqlite://path)")]
    UnsupportedDatabaseUrl(String),
}
