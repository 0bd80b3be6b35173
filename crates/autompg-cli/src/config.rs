//! Configuration loading from TOML files.
//!
//! Lookup order:
//! 1. `$AUTOMPG_CONFIG` environment variable
//! 2. `~/.config/autompg/config.toml`
//! 3. Built-in defaults (everything is optional)

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use autompg_core::Corrections;
use autompg_store::{LoadOptions, DEFAULT_URL};
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub dataset: DatasetConfig,
}

/// Where the raw data lives and how to get it.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Raw data file. Default: platform-specific data dir.
    pub path: Option<String>,
    pub url: String,
    /// Download the raw file when it is missing.
    pub download: bool,
}

/// Parsing rules applied to every line.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub year_offset: i32,
    pub title_case: bool,
    /// Extra typo -> manufacturer entries on top of the built-in table.
    pub corrections: BTreeMap<String, String>,
}

// --- Defaults ---

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: None,
            url: DEFAULT_URL.into(),
            download: true,
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            year_offset: 1900,
            title_case: false,
            corrections: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Loader options for this config. `offline` wins over `source.download`.
    pub fn load_options(&self, offline: bool) -> LoadOptions {
        let mut corrections = Corrections::default();
        corrections.extend(&self.dataset.corrections);
        LoadOptions {
            download: self.source.download && !offline,
            url: self.source.url.clone(),
            year_offset: self.dataset.year_offset,
            title_case: self.dataset.title_case,
            corrections,
        }
    }
}

/// Load config from disk. Returns defaults if no config file exists.
pub fn load_config() -> Result<Config> {
    let path = config_path();

    if let Some(p) = &path {
        if p.exists() {
            let content =
                std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
            let config: Config =
                toml::from_str(&content).with_context(|| format!("parsing {}", p.display()))?;
            return Ok(config);
        }
    }

    Ok(Config::default())
}

/// Resolve the config file path.
fn config_path() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("AUTOMPG_CONFIG") {
        return Some(PathBuf::from(p));
    }

    directories::BaseDirs::new().map(|dirs| {
        dirs.home_dir()
            .join(".config")
            .join("autompg")
            .join("config.toml")
    })
}

/// Show the active config path (for `autompg config`).
pub fn show_config_path() -> String {
    match config_path() {
        Some(p) if p.exists() => format!("{} (loaded)", p.display()),
        Some(p) => format!("{} (not found, using defaults)", p.display()),
        None => "no config path resolved (using defaults)".into(),
    }
}
