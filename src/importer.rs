//! Importer - walks a sign document into the catalog tables
//!
//! One import is one transaction: categories, series and signs are resolved
//! through `get_or_create`, file links are appended, and the whole batch is
//! committed once at the end. Any error drops the writer, which rolls the
//! batch back.

use crate::catalog;
use crate::config::ImportConfig;
use crate::source::SignDocument;
use crate::storage::SqliteStore;
use crate::Result;
use serde::Serialize;

/// Progress notifications emitted during an import
#[derive(Clone, Debug, PartialEq)]
pub enum ImportEvent {
    Started {
        total_signs: usize,
    },
    Sign {
        current: usize,
        designation: String,
    },
    Finished,
}

/// Counts of entries processed by one import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub categories: usize,
    pub series: usize,
    pub signs: usize,
    /// `sign_files` rows appended
    pub sign_files: usize,
}

impl std::fmt::Display for ImportReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Import Report:")?;
        writeln!(f, "  Categories: {}", self.categories)?;
        writeln!(f, "  Series: {}", self.series)?;
        writeln!(f, "  Signs: {}", self.signs)?;
        writeln!(f, "  Files added: {}", self.sign_files)
    }
}

/// Import `document` into `store` inside a single transaction.
pub fn import_sign_database(
    store: &mut SqliteStore,
    document: &SignDocument,
    on_event: &mut dyn FnMut(ImportEvent),
) -> Result<ImportReport> {
    let mut report = ImportReport::default();
    on_event(ImportEvent::Started {
        total_signs: document.total_signs(),
    });

    let writer = store.writer()?;

    for category in &document.categories {
        tracing::info!("Importing category {}", category.name);
        let category_id =
            writer.upsert_category(&category.name, &catalog::category_description(&category.name))?;
        report.categories += 1;

        for series in &category.series {
            tracing::debug!(
                "Series {} (code {}) with {} signs",
                series.label,
                series.code,
                series.signs.len()
            );
            let series_id = writer.upsert_series(category_id, &series.code, &series.label)?;
            report.series += 1;

            for sign in &series.signs {
                let sign_id = writer.upsert_sign(
                    series_id,
                    &sign.sign_designation,
                    &sign.sign_name,
                    sign.notes.as_deref(),
                )?;
                report.signs += 1;

                for (file_type, url) in sign.file_links() {
                    writer.insert_sign_file(sign_id, file_type, url)?;
                    report.sign_files += 1;
                }

                tracing::debug!("Sign {} -> id {}", sign.sign_designation, sign_id);
                on_event(ImportEvent::Sign {
                    current: report.signs,
                    designation: sign.sign_designation.clone(),
                });
            }
        }
    }

    writer.commit()?;
    on_event(ImportEvent::Finished);
    tracing::info!(
        "Import committed: {} categories, {} series, {} signs, {} files",
        report.categories,
        report.series,
        report.signs,
        report.sign_files
    );

    Ok(report)
}

/// Runs imports for one resolved configuration
pub struct Importer {
    config: ImportConfig,
}

impl Importer {
    pub fn new(config: ImportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Load the configured source document and validate it
    pub fn load_source(&self) -> Result<SignDocument> {
        tracing::info!("Loading {}", self.config.source.display());
        SignDocument::load(&self.config.source)
    }

    /// Open (or create) the configured database
    pub fn open_store(&self) -> Result<SqliteStore> {
        crate::config::ensure_db_dir(&self.config.database)?;
        SqliteStore::open(&self.config.database)
    }

    /// Load, open and import in one go
    pub fn run(&self) -> Result<ImportReport> {
        self.run_with_events(&mut |_| {})
    }

    pub fn run_with_events(&self, on_event: &mut dyn FnMut(ImportEvent)) -> Result<ImportReport> {
        let document = self.load_source()?;
        let mut store = self.open_store()?;
        import_sign_database(&mut store, &document, on_event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FileType;
    use crate::Error;

    const CATALOG: &str = r#"{
        "Regulatory Signs": {
            "R1 series": [
                {
                    "sign_designation": "R1-1",
                    "sign_name": "Stop",
                    "notes": "Octagon",
                    "png_file_link": "https://files/r1-1.png",
                    "svg_file_link": "https://files/r1-1.svg",
                    "pdf_file_link": "https://files/r1-1.pdf",
                    "layout_file_link": "https://files/r1-1-layout.pdf",
                    "png_file": "https://files/page-12.png",
                    "pdf_file": "https://files/page-12.pdf"
                },
                {
                    "sign_designation": "R1-2",
                    "sign_name": "Yield"
                }
            ]
        },
        "Warning Signs": {
            "W1 series": [
                {
                    "sign_designation": "W1-1",
                    "sign_name": "Turn",
                    "svg_file_link": "https://files/w1-1.svg",
                    "png_file_link": "  "
                }
            ]
        }
    }"#;

    fn import(store: &mut SqliteStore, json: &str) -> Result<ImportReport> {
        let document = SignDocument::from_json_str(json)?;
        import_sign_database(store, &document, &mut |_| {})
    }

    #[test]
    fn test_import_populates_catalog() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let report = import(&mut store, CATALOG).unwrap();

        assert_eq!(
            report,
            ImportReport { categories: 2, series: 2, signs: 3, sign_files: 7 }
        );

        let category = store.find_category("Regulatory Signs").unwrap().unwrap();
        assert_eq!(category.description.as_deref(), Some("Regulatory Signs (imported)"));

        let series = store.find_series(category.id, "R1").unwrap().unwrap();
        assert_eq!(series.description.as_deref(), Some("R1 series"));

        let stop = store.find_sign("R1-1").unwrap().unwrap();
        assert_eq!(stop.series_id, series.id);
        assert_eq!(stop.notes.as_deref(), Some("Octagon"));

        let yield_sign = store.find_sign("R1-2").unwrap().unwrap();
        assert_eq!(yield_sign.notes.as_deref(), Some(""));
    }

    #[test]
    fn test_all_six_links_yield_six_rows() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        import(&mut store, CATALOG).unwrap();

        let stop = store.find_sign("R1-1").unwrap().unwrap();
        let files = store.files_for_sign(stop.id).unwrap();
        let types: Vec<_> = files.iter().map(|f| f.file_type).collect();
        assert_eq!(types, FileType::all().to_vec());
        assert_eq!(files[5].storage_url, "https://files/page-12.pdf");

        let yield_sign = store.find_sign("R1-2").unwrap().unwrap();
        assert!(store.files_for_sign(yield_sign.id).unwrap().is_empty());

        // blank png link skipped
        let turn = store.find_sign("W1-1").unwrap().unwrap();
        let files = store.files_for_sign(turn.id).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_type, FileType::Svg);
    }

    #[test]
    fn test_reimport_is_idempotent_except_files() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        import(&mut store, CATALOG).unwrap();
        let first = store.stats().unwrap();
        let stop_id = store.find_sign("R1-1").unwrap().unwrap().id;

        import(&mut store, CATALOG).unwrap();
        let second = store.stats().unwrap();

        assert_eq!(second.categories, first.categories);
        assert_eq!(second.series, first.series);
        assert_eq!(second.signs, first.signs);
        assert_eq!(second.sign_files, first.sign_files * 2);
        assert_eq!(store.find_sign("R1-1").unwrap().unwrap().id, stop_id);
    }

    #[test]
    fn test_reimport_keeps_single_designation_row() {
        let json = r#"{"Regulatory Signs": {"R1 series": [
            {"sign_designation": "R1-1", "sign_name": "Stop"}
        ]}}"#;
        let mut store = SqliteStore::open_in_memory().unwrap();
        import(&mut store, json).unwrap();
        import(&mut store, json).unwrap();

        assert_eq!(store.count_signs().unwrap(), 1);
        let category = store.find_category("Regulatory Signs").unwrap().unwrap();
        let series = store.series_in_category(category.id).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].series_code, "R1");
    }

    #[test]
    fn test_empty_document_commits_nothing() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let report = import(&mut store, "{}").unwrap();
        assert_eq!(report, ImportReport::default());
        assert_eq!(store.stats().unwrap(), crate::storage::DbStats::default());
    }

    #[test]
    fn test_malformed_sign_commits_nothing() {
        let json = r#"{"Regulatory Signs": {"R1 series": [
            {"sign_designation": "R1-1", "sign_name": "Stop", "png_file_link": "a.png"},
            {"sign_name": "Yield"}
        ]}}"#;
        let mut store = SqliteStore::open_in_memory().unwrap();
        let err = import(&mut store, json).unwrap_err();
        assert!(matches!(err, Error::InvalidDocument { .. }));
        assert_eq!(store.stats().unwrap(), crate::storage::DbStats::default());
    }

    #[test]
    fn test_storage_failure_rolls_back_whole_batch() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        import(&mut store, CATALOG).unwrap();
        let before = store.stats().unwrap();

        store
            .connection()
            .execute_batch(
                "CREATE TRIGGER reject_x1_2 BEFORE INSERT ON signs
                 WHEN NEW.designation = 'X1-2'
                 BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
            )
            .unwrap();

        let json = r#"{"Extra": {"X1 series": [
            {"sign_designation": "X1-1", "sign_name": "New", "svg_file_link": "x1-1.svg"},
            {"sign_designation": "X1-2", "sign_name": "Other"}
        ]}}"#;
        let mut events = Vec::new();
        let document = SignDocument::from_json_str(json).unwrap();
        let err = import_sign_database(&mut store, &document, &mut |e| events.push(e)).unwrap_err();

        assert!(matches!(err, Error::Storage(_)));
        assert!(!events.contains(&ImportEvent::Finished));
        assert_eq!(store.stats().unwrap(), before);
        assert!(store.find_category("Extra").unwrap().is_none());
        assert!(store.find_sign("X1-1").unwrap().is_none());
    }

    #[test]
    fn test_events() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let document = SignDocument::from_json_str(CATALOG).unwrap();
        let mut events = Vec::new();
        import_sign_database(&mut store, &document, &mut |e| events.push(e)).unwrap();

        assert_eq!(events.first(), Some(&ImportEvent::Started { total_signs: 3 }));
        assert_eq!(
            events[1],
            ImportEvent::Sign { current: 1, designation: "R1-1".to_string() }
        );
        assert_eq!(events.last(), Some(&ImportEvent::Finished));
        assert_eq!(events.len(), 5);
    }

    #[test]
    fn test_importer_runs_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("database_with_pages.json");
        std::fs::write(&source, CATALOG).unwrap();

        let config = ImportConfig {
            database: dir.path().join("nested").join("signs.db"),
            source,
        };
        let importer = Importer::new(config);
        let report = importer.run().unwrap();
        assert_eq!(report.signs, 3);

        let store = importer.open_store().unwrap();
        assert_eq!(store.count_signs().unwrap(), 3);
    }

    #[test]
    fn test_importer_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let importer = Importer::new(ImportConfig {
            database: dir.path().join("signs.db"),
            source: dir.path().join("missing.json"),
        });
        assert!(matches!(importer.run(), Err(Error::Io(_))));
    }
}
