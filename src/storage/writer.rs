//! Transactional write side of the catalog

use rusqlite::{Connection, ToSql, Transaction, params};
use crate::{Result, Error};
use crate::catalog::FileType;

/// Find-or-insert a keyed row and return its id.
///
/// `lookup` names the columns of a unique constraint on `table`; `insert`
/// holds columns written only when the row is created. Runs as one
/// `INSERT .. ON CONFLICT .. RETURNING id` statement, so there is no window
/// between the lookup and the insert. On conflict the first lookup column is
/// rewritten with its own value, which leaves the existing row unchanged.
pub fn get_or_create(
    conn: &Connection,
    table: &str,
    lookup: &[(&str, &dyn ToSql)],
    insert: &[(&str, &dyn ToSql)],
) -> Result<i64> {
    let Some((key, _)) = lookup.first() else {
        return Err(Error::EmptyLookup(table.to_string()));
    };

    check_identifier(table)?;
    for (column, _) in lookup.iter().chain(insert) {
        check_identifier(column)?;
    }

    let columns: Vec<&str> = lookup.iter().chain(insert).map(|(column, _)| *column).collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
    let conflict: Vec<&str> = lookup.iter().map(|(column, _)| *column).collect();

    let sql = format!(
        "INSERT INTO {table} ({columns}) VALUES ({placeholders}) \
         ON CONFLICT ({conflict}) DO UPDATE SET {key} = excluded.{key} \
         RETURNING id",
        table = table,
        columns = columns.join(", "),
        placeholders = placeholders.join(", "),
        conflict = conflict.join(", "),
        key = key,
    );

    let values: Vec<&dyn ToSql> = lookup.iter().chain(insert).map(|(_, value)| *value).collect();
    let id = conn.query_row(&sql, values.as_slice(), |row| row.get(0))?;
    Ok(id)
}

/// Plain SQL identifier: `[A-Za-z_][A-Za-z0-9_]*`
fn check_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidIdentifier(name.to_string()))
    }
}

/// Writes catalog rows inside a single transaction.
///
/// Nothing is visible to other connections until [`CatalogWriter::commit`].
/// Dropping the writer without committing rolls everything back.
pub struct CatalogWriter<'conn> {
    tx: Transaction<'conn>,
}

impl<'conn> CatalogWriter<'conn> {
    pub(crate) fn new(tx: Transaction<'conn>) -> Self {
        Self { tx }
    }

    /// See [`get_or_create`]
    pub fn get_or_create(
        &self,
        table: &str,
        lookup: &[(&str, &dyn ToSql)],
        insert: &[(&str, &dyn ToSql)],
    ) -> Result<i64> {
        get_or_create(&self.tx, table, lookup, insert)
    }

    pub fn upsert_category(&self, name: &str, description: &str) -> Result<i64> {
        self.get_or_create(
            "categories",
            &[("name", &name)],
            &[("description", &description)],
        )
    }

    pub fn upsert_series(&self, category_id: i64, series_code: &str, description: &str) -> Result<i64> {
        self.get_or_create(
            "series",
            &[("category_id", &category_id), ("series_code", &series_code)],
            &[("description", &description)],
        )
    }

    /// Resolve a sign by designation; `series_id`, `name` and `notes` only
    /// apply when the sign is new.
    pub fn upsert_sign(
        &self,
        series_id: i64,
        designation: &str,
        name: &str,
        notes: Option<&str>,
    ) -> Result<i64> {
        self.get_or_create(
            "signs",
            &[("designation", &designation)],
            &[("series_id", &series_id), ("name", &name), ("notes", &notes)],
        )
    }

    /// Append a file row. Never deduplicated.
    pub fn insert_sign_file(&self, sign_id: i64, file_type: FileType, storage_url: &str) -> Result<i64> {
        self.tx.execute(
            "INSERT INTO sign_files (sign_id, file_type, storage_url) VALUES (?1, ?2, ?3)",
            params![sign_id, file_type.as_str(), storage_url],
        )?;
        Ok(self.tx.last_insert_rowid())
    }

    pub fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }

    pub fn rollback(self) -> Result<()> {
        self.tx.rollback()?;
        Ok(())
    }
}
