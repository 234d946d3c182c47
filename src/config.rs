use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use platlog_types::CatalogKind;

/// Top-level config for platlog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog used when `--catalog` is not given
    pub catalog: CatalogKind,
    /// tracing filter directive, e.g. `warn` or `platlog_parsers=debug`
    pub log_level: String,
    /// Emit a record for lines that match no shape
    pub emit_unmatched: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogKind::Combined,
            log_level: "warn".to_string(),
            emit_unmatched: false,
        }
    }
}

impl Config {
    /// Load config from a toml file, then overlay env vars (PLATLOG_*).
    ///
    /// An explicit path must exist; the default `~/.platlog/platlog.toml` is
    /// optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_file(p)?,
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => Self::default(),
            },
        };

        cfg.apply_env(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    fn default_path() -> Option<PathBuf> {
        let home = std::env::var_os("HOME")?;
        Some(PathBuf::from(home).join(".platlog").join("platlog.toml"))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(catalog) = lookup("PLATLOG_CATALOG") {
            self.catalog = catalog.parse().context("PLATLOG_CATALOG")?;
        }
        if let Some(level) = lookup("PLATLOG_LOG_LEVEL") {
            self.log_level = level;
        }
        Ok(())
    }
}
