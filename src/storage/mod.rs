//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - categories(id, name, description)
//! - series(id, category_id, series_code, description)
//! - signs(id, series_id, designation, name, notes)
//! - sign_files(id, sign_id, file_type, storage_url)

pub mod schema;
pub mod sqlite;
pub mod writer;

pub use sqlite::{SqliteStore, DbStats};
pub use writer::{CatalogWriter, get_or_create};
