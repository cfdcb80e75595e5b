//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;
use crate::{Result, Error};
use crate::catalog::{Category, FileType, Series, Sign, SignFile};
use super::schema;
use super::writer::CatalogWriter;

/// SQLite-backed storage for the sign catalog
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        self.conn.pragma_update(None, "foreign_keys", true)?;
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    // ========== Write Operations ==========

    /// Begin a transaction and hand out a writer bound to it
    pub fn writer(&mut self) -> Result<CatalogWriter<'_>> {
        let tx = self.conn.transaction()?;
        Ok(CatalogWriter::new(tx))
    }

    // ========== Category Operations ==========

    pub fn find_category(&self, name: &str) -> Result<Option<Category>> {
        self.conn
            .query_row(
                "SELECT id, name, description FROM categories WHERE name = ?1",
                [name],
                Self::row_to_category,
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn get_category(&self, id: i64) -> Result<Option<Category>> {
        self.conn
            .query_row(
                "SELECT id, name, description FROM categories WHERE id = ?1",
                [id],
                Self::row_to_category,
            )
            .optional()
            .map_err(Into::into)
    }

    /// All categories in creation order
    pub fn list_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description FROM categories ORDER BY id"
        )?;
        let categories = stmt
            .query_map([], Self::row_to_category)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(categories)
    }

    pub fn count_categories(&self) -> Result<usize> {
        self.count("categories")
    }

    fn row_to_category(row: &rusqlite::Row) -> rusqlite::Result<Category> {
        Ok(Category {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
        })
    }

    // ========== Series Operations ==========

    pub fn find_series(&self, category_id: i64, series_code: &str) -> Result<Option<Series>> {
        self.conn
            .query_row(
                "SELECT id, category_id, series_code, description FROM series WHERE category_id = ?1 AND series_code = ?2",
                rusqlite::params![category_id, series_code],
                Self::row_to_series,
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn get_series(&self, id: i64) -> Result<Option<Series>> {
        self.conn
            .query_row(
                "SELECT id, category_id, series_code, description FROM series WHERE id = ?1",
                [id],
                Self::row_to_series,
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn series_in_category(&self, category_id: i64) -> Result<Vec<Series>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, category_id, series_code, description FROM series WHERE category_id = ?1 ORDER BY id"
        )?;
        let series = stmt
            .query_map([category_id], Self::row_to_series)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(series)
    }

    pub fn count_series(&self) -> Result<usize> {
        self.count("series")
    }

    fn row_to_series(row: &rusqlite::Row) -> rusqlite::Result<Series> {
        Ok(Series {
            id: row.get(0)?,
            category_id: row.get(1)?,
            series_code: row.get(2)?,
            description: row.get(3)?,
        })
    }

    // ========== Sign Operations ==========

    /// Get a sign by its designation
    pub fn find_sign(&self, designation: &str) -> Result<Option<Sign>> {
        self.conn
            .query_row(
                "SELECT id, series_id, designation, name, notes FROM signs WHERE designation = ?1",
                [designation],
                Self::row_to_sign,
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn signs_in_series(&self, series_id: i64) -> Result<Vec<Sign>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, series_id, designation, name, notes FROM signs WHERE series_id = ?1 ORDER BY id"
        )?;
        let signs = stmt
            .query_map([series_id], Self::row_to_sign)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(signs)
    }

    pub fn count_signs(&self) -> Result<usize> {
        self.count("signs")
    }

    fn row_to_sign(row: &rusqlite::Row) -> rusqlite::Result<Sign> {
        Ok(Sign {
            id: row.get(0)?,
            series_id: row.get(1)?,
            designation: row.get(2)?,
            name: row.get(3)?,
            notes: row.get(4)?,
        })
    }

    // ========== Sign File Operations ==========

    /// Files attached to a sign, in insertion order
    pub fn files_for_sign(&self, sign_id: i64) -> Result<Vec<SignFile>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, sign_id, file_type, storage_url FROM sign_files WHERE sign_id = ?1 ORDER BY id"
        )?;
        let files = stmt
            .query_map([sign_id], Self::row_to_sign_file)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(files)
    }

    pub fn count_sign_files(&self) -> Result<usize> {
        self.count("sign_files")
    }

    /// Helper to convert a row to a SignFile
    fn row_to_sign_file(row: &rusqlite::Row) -> rusqlite::Result<SignFile> {
        let type_str: String = row.get(2)?;
        let file_type: FileType = type_str.parse().map_err(|e: Error| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(SignFile {
            id: row.get(0)?,
            sign_id: row.get(1)?,
            file_type,
            storage_url: row.get(3)?,
        })
    }

    // ========== Statistics ==========

    /// `table` is always one of the schema's own table names
    fn count(&self, table: &str) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", table);
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            categories: self.count_categories()?,
            series: self.count_series()?,
            signs: self.count_signs()?,
            sign_files: self.count_sign_files()?,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DbStats {
    pub categories: usize,
    pub series: usize,
    pub signs: usize,
    pub sign_files: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Categories: {}", self.categories)?;
        writeln!(f, "  Series: {}", self.series)?;
        writeln!(f, "  Signs: {}", self.signs)?;
        writeln!(f, "  Sign files: {}", self.sign_files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_store() -> SqliteStore {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let writer = store.writer().unwrap();
        let category = writer.upsert_category("Regulatory Signs", "Regulatory Signs (imported)").unwrap();
        let series = writer.upsert_series(category, "R1", "R1 series").unwrap();
        let stop = writer.upsert_sign(series, "R1-1", "Stop", Some("")).unwrap();
        writer.upsert_sign(series, "R1-2", "Yield", None).unwrap();
        writer.insert_sign_file(stop, FileType::Svg, "r1-1.svg").unwrap();
        writer.insert_sign_file(stop, FileType::Png, "r1-1.png").unwrap();
        writer.commit().unwrap();
        store
    }

    #[test]
    fn test_stats() {
        let store = seeded_store();
        let stats = store.stats().unwrap();
        assert_eq!(
            stats,
            DbStats { categories: 1, series: 1, signs: 2, sign_files: 2 }
        );
        assert!(stats.to_string().contains("Signs: 2"));
    }

    #[test]
    fn test_navigate_catalog() {
        let store = seeded_store();

        let categories = store.list_categories().unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].description.as_deref(), Some("Regulatory Signs (imported)"));

        let series = store.series_in_category(categories[0].id).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].series_code, "R1");
        assert_eq!(store.find_series(categories[0].id, "R1").unwrap(), Some(series[0].clone()));
        assert_eq!(store.get_series(series[0].id).unwrap(), Some(series[0].clone()));

        let signs = store.signs_in_series(series[0].id).unwrap();
        let designations: Vec<_> = signs.iter().map(|s| s.designation.as_str()).collect();
        assert_eq!(designations, vec!["R1-1", "R1-2"]);
        assert_eq!(signs[1].notes, None);

        let files = store.files_for_sign(signs[0].id).unwrap();
        let types: Vec<_> = files.iter().map(|f| f.file_type).collect();
        assert_eq!(types, vec![FileType::Svg, FileType::Png]);
    }

    #[test]
    fn test_missing_rows() {
        let store = seeded_store();
        assert!(store.find_sign("X9-9").unwrap().is_none());
        assert!(store.find_category("Nope").unwrap().is_none());
        assert!(store.get_category(999).unwrap().is_none());
    }

    #[test]
    fn test_open_file_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signs.db");
        {
            let mut store = SqliteStore::open(&path).unwrap();
            let writer = store.writer().unwrap();
            writer.upsert_category("Warning Signs", "").unwrap();
            writer.commit().unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.count_categories().unwrap(), 1);
    }
}
