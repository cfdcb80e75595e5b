//! signdb CLI - import and inspect the road sign catalog

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use signdb::config::{self, ImportConfig, SigndbConfig};
use signdb::storage::SqliteStore;
use signdb::ui::{self, Icons, ImportProgress, Spinner};
use signdb::{Importer, SignDocument};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "signdb")]
#[command(version)]
#[command(about = "Road sign catalog importer - loads a nested JSON sign database into SQLite")]
#[command(long_about = r#"
signdb loads a sign database shaped as
  {category: {"<code> series": [sign, ...]}}
into four tables: categories, series, signs and sign_files.

Re-running an import never duplicates categories, series or signs;
file links are appended on every run.

Settings resolve as: flag > environment (DATABASE_URL, JSON_PATH) > signdb.toml > default.
A .env file in the working directory is loaded first.

Example usage:
  signdb import --source database_with_pages.json --database signs.db
  signdb stats
  signdb show R1-1
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file (defaults to signdb.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a JSON sign database in a single transaction
    Import {
        /// Path to the JSON source document
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Parse and validate a JSON sign database without touching storage
    Validate {
        /// Path to the JSON source document
        #[arg(short, long)]
        source: Option<PathBuf>,
    },

    /// Show row counts and categories
    Stats {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show one sign with its series, category and files
    Show {
        /// Sign designation, e.g. R1-1
        designation: String,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Write a config file with the effective paths
    Init {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Path to the JSON source document
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let dotenv = config::load_dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(log_filter(cli.verbose))
        .init();

    if let Some(path) = &dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }
    let file_config = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Import { source, database, format } => {
            let importer = Importer::new(ImportConfig::resolve(database, source, file_config.as_ref())?);
            let human = format == OutputFormat::Text;

            if human {
                ui::header("Importing sign database");
                ui::status(Icons::FILE, "Source", &importer.config().source.display().to_string());
                ui::status(Icons::DATABASE, "Database", &importer.config().database.display().to_string());
            }

            let progress = ImportProgress::new(!human || signdb::output::is_quiet());
            let started = Instant::now();
            let report = match importer.run_with_events(&mut |event| progress.handle(event)) {
                Ok(report) => report,
                Err(e) => {
                    progress.abandon();
                    tracing::error!("Import failed, nothing was committed: {}", e);
                    return Err(e.into());
                }
            };

            if report.categories == 0 {
                ui::warn("Source document has no categories; nothing was imported");
            }

            let totals = importer.open_store()?.stats()?;
            match format {
                OutputFormat::Text => {
                    progress.finish_with_summary(started.elapsed(), &report);
                    ui::section("Processed");
                    println!("{}", ui::report_table(&report));
                    ui::section("Catalog totals");
                    println!("{}", ui::stats_table(&totals));
                }
                OutputFormat::Json => {
                    let data = serde_json::json!({
                        "report": report,
                        "totals": totals,
                    });
                    println!("{}", serde_json::to_string_pretty(&data)?);
                }
            }
        }

        Commands::Validate { source } => {
            let config = ImportConfig::resolve(None, source, file_config.as_ref())?;
            let spinner = Spinner::new(&format!("Validating {}", config.source.display()));

            match SignDocument::load(&config.source) {
                Ok(document) => {
                    spinner.finish_and_clear();
                    ui::success(&format!("{} is valid", config.source.display()));
                    ui::summary_row("Categories:", &document.categories.len().to_string());
                    ui::summary_row("Series:", &document.total_series().to_string());
                    ui::summary_row("Signs:", &document.total_signs().to_string());
                    ui::summary_row("File links:", &document.total_links().to_string());
                }
                Err(e) => {
                    spinner.finish_and_clear();
                    ui::error(&e.to_string());
                    anyhow::bail!("{} is not a valid sign database", config.source.display());
                }
            }
        }

        Commands::Stats { database, format } => {
            let config = ImportConfig::resolve(database, None, file_config.as_ref())?;
            let store = open_existing(&config)?;
            let stats = store.stats()?;

            let mut categories = Vec::new();
            for category in store.list_categories()? {
                let series = store.series_in_category(category.id)?.len();
                categories.push((category, series));
            }

            match format {
                OutputFormat::Text => {
                    println!("{} signdb Statistics ({})", Icons::STATS, config.database.display());
                    println!("{}", ui::stats_table(&stats));
                    if !categories.is_empty() {
                        ui::section("Categories");
                        println!("{}", ui::categories_table(&categories));
                    }
                }
                OutputFormat::Json => {
                    let categories: Vec<_> = categories
                        .iter()
                        .map(|(category, series)| {
                            serde_json::json!({
                                "id": category.id,
                                "name": category.name,
                                "description": category.description,
                                "series": series,
                            })
                        })
                        .collect();
                    let data = serde_json::json!({
                        "totals": stats,
                        "categories": categories,
                    });
                    println!("{}", serde_json::to_string_pretty(&data)?);
                }
            }
        }

        Commands::Show { designation, database } => {
            let config = ImportConfig::resolve(database, None, file_config.as_ref())?;
            let store = open_existing(&config)?;

            let Some(sign) = store.find_sign(&designation)? else {
                anyhow::bail!("no sign with designation {:?}", designation);
            };
            let series = store.get_series(sign.series_id)?;
            let category = match &series {
                Some(series) => store.get_category(series.category_id)?,
                None => None,
            };

            ui::sign_line(&sign);
            if let Some(category) = &category {
                ui::summary_row("Category:", &ui::category_name(&category.name));
            }
            if let Some(series) = &series {
                ui::summary_row("Series:", &ui::series_code(&series.series_code));
            }

            let files = store.files_for_sign(sign.id)?;
            if files.is_empty() {
                println!("  {}", ui::muted("no files"));
            }
            for file in &files {
                ui::file_line(file.file_type, &file.storage_url);
            }
        }

        Commands::Init { database, source, force } => {
            let config = ImportConfig::resolve(database, source, file_config.as_ref())?;
            let path = cli.config.clone().unwrap_or_else(config::default_config_path);
            let contents = SigndbConfig {
                database: Some(config.database.display().to_string()),
                source: Some(config.source.display().to_string()),
            };
            config::write_config(&path, &contents, force)?;
            ui::success(&format!("Wrote {}", path.display()));
            ui::info("database", &config.database.display().to_string());
            ui::info("source", &config.source.display().to_string());
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `--verbose` picks debug over info
fn log_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    })
}

/// Open a database that an import has already created
fn open_existing(config: &ImportConfig) -> anyhow::Result<SqliteStore> {
    if !config.database.exists() {
        anyhow::bail!(
            "database {} does not exist (run `signdb import` first)",
            config.database.display()
        );
    }
    Ok(SqliteStore::open(&config.database)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_log_from_env_file_drives_filter() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let env_file = dir.path().join(".env");
        std::fs::write(&env_file, "RUST_LOG=warn\n").unwrap();

        assert_eq!(log_filter(false).to_string(), "info");
        assert!(config::load_dotenv_from(&env_file));
        assert_eq!(log_filter(false).to_string(), "warn");
        assert_eq!(log_filter(true).to_string(), "warn");
    }
}
