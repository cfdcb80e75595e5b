//! Database schema definitions
//!
//! Every keyed table carries the unique constraint that `get_or_create`
//! names in its `ON CONFLICT` clause.

/// SQL to create the categories table
pub const CREATE_CATEGORIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    description TEXT
)
"#;

/// SQL to create the series table
pub const CREATE_SERIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS series (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    category_id INTEGER NOT NULL REFERENCES categories(id),
    series_code TEXT NOT NULL,
    description TEXT,
    UNIQUE(category_id, series_code)
)
"#;

/// SQL to create the signs table
pub const CREATE_SIGNS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS signs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    series_id INTEGER NOT NULL REFERENCES series(id),
    designation TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    notes TEXT
)
"#;

/// SQL to create the sign_files table
/// Append-only: rows are not deduplicated across imports
pub const CREATE_SIGN_FILES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS sign_files (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    sign_id INTEGER NOT NULL REFERENCES signs(id),
    file_type TEXT NOT NULL CHECK (file_type IN ('png', 'svg', 'pdf_full', 'layout', 'png_page', 'pdf_page')),
    storage_url TEXT NOT NULL
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_series_category ON series(category_id)",
    "CREATE INDEX IF NOT EXISTS idx_signs_series ON signs(series_id)",
    "CREATE INDEX IF NOT EXISTS idx_sign_files_sign ON sign_files(sign_id)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_CATEGORIES_TABLE,
        CREATE_SERIES_TABLE,
        CREATE_SIGNS_TABLE,
        CREATE_SIGN_FILES_TABLE,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FileType;

    #[test]
    fn test_file_type_check_lists_every_tag() {
        for file_type in FileType::all() {
            assert!(
                CREATE_SIGN_FILES_TABLE.contains(&format!("'{}'", file_type.as_str())),
                "missing {}",
                file_type
            );
        }
    }
}
