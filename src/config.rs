use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::{Error, Result};

/// Environment variable naming the database
pub const DATABASE_ENV: &str = "DATABASE_URL";
/// Environment variable naming the source JSON document
pub const SOURCE_ENV: &str = "JSON_PATH";

pub const DEFAULT_DATABASE: &str = "signs.db";
pub const DEFAULT_SOURCE: &str = "database_with_pages.json";

/// Contents of `signdb.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SigndbConfig {
    pub database: Option<String>,
    pub source: Option<String>,
}

/// Fully resolved settings for one import run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    pub database: PathBuf,
    pub source: PathBuf,
}

impl ImportConfig {
    /// Resolve from the process environment.
    ///
    /// | Setting  | CLI flag     | Env var        | File key   | Default                    |
    /// |----------|--------------|----------------|------------|----------------------------|
    /// | database | `--database` | `DATABASE_URL` | `database` | `signs.db`                 |
    /// | source   | `--source`   | `JSON_PATH`    | `source`   | `database_with_pages.json` |
    pub fn resolve(
        database: Option<PathBuf>,
        source: Option<PathBuf>,
        file: Option<&SigndbConfig>,
    ) -> Result<Self> {
        Self::resolve_with(database, source, file, |key| std::env::var(key).ok())
    }

    /// Same as [`ImportConfig::resolve`] with an explicit environment lookup
    pub fn resolve_with(
        database: Option<PathBuf>,
        source: Option<PathBuf>,
        file: Option<&SigndbConfig>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let database = match database {
            Some(path) => path,
            None => match env(DATABASE_ENV).or_else(|| file.and_then(|f| f.database.clone())) {
                Some(url) => database_path_from_url(&url)?,
                None => PathBuf::from(DEFAULT_DATABASE),
            },
        };

        let source = source
            .or_else(|| env(SOURCE_ENV).map(PathBuf::from))
            .or_else(|| file.and_then(|f| f.source.as_deref()).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE));

        Ok(Self { database, source })
    }
}

/// Accepts `sqlite://path`, `sqlite:path` or a plain path.
/// Any other `scheme://` URL is rejected.
pub fn database_path_from_url(url: &str) -> Result<PathBuf> {
    let url = url.trim();
    if let Some(path) = url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:")) {
        return Ok(PathBuf::from(path));
    }
    if let Some((scheme, _)) = url.split_once("://") {
        if !scheme.is_empty() && scheme.chars().all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c)) {
            return Err(Error::UnsupportedDatabaseUrl(url.to_string()));
        }
    }
    Ok(PathBuf::from(url))
}

/// Load `.env` into the process environment, if present.
/// Call before logging is set up so `RUST_LOG` from the file takes effect.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Load a specific env file; existing variables are not overridden
pub fn load_dotenv_from(path: &Path) -> bool {
    dotenvy::from_path(path).is_ok()
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("signdb.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<SigndbConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: SigndbConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &SigndbConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> std::io::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
