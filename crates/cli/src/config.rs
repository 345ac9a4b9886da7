use anyhow::{bail, Context as AnyhowContext, Result};
use codescout_indexer::IndexerConfig;
use codescout_vector_store::TfidfVectorizer;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const REPO_PATH_ENV: &str = "REPO_PATH";
pub const INDEX_PATH_ENV: &str = "INDEX_PATH";

/// Where the project lives and where its index artifact goes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub root: PathBuf,
    pub index: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            index: PathBuf::from("repo_index.json"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub top_k: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

/// Full tool configuration as read from `codescout.toml`.
///
/// ```toml
/// [paths]
/// root = "."
/// index = "repo_index.json"
///
/// [scan]
/// ignore_dirs = [".git", "node_modules"]
/// extensions = ["js", "ts"]
///
/// [chunker]
/// max_lines = 120
/// overlap = 20
///
/// [vectorizer]
/// min_n = 3
/// max_n = 5
/// min_df = 1
///
/// [search]
/// top_k = 5
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodescoutConfig {
    pub paths: PathsConfig,
    #[serde(flatten)]
    pub indexer: IndexerConfig,
    pub search: SearchConfig,
}

impl CodescoutConfig {
    /// Read the TOML file at `path`, or fall back to defaults when none is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Apply `REPO_PATH` / `INDEX_PATH`.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(root) = lookup(REPO_PATH_ENV).filter(|v| !v.is_empty()) {
            self.paths.root = PathBuf::from(root);
        }
        if let Some(index) = lookup(INDEX_PATH_ENV).filter(|v| !v.is_empty()) {
            self.paths.index = PathBuf::from(index);
        }
        self
    }

    /// Reject anything that would fail halfway through a run.
    pub fn validate(&self) -> Result<()> {
        if let Err(reason) = self.indexer.chunker.validate() {
            bail!("Invalid [chunker] section: {reason}");
        }
        TfidfVectorizer::new(self.indexer.vectorizer).context("Invalid [vectorizer] section")?;
        if self.search.top_k == 0 {
            bail!("Invalid [search] section: top_k must be at least 1");
        }
        if self.indexer.scan.extensions.is_empty() {
            bail!("Invalid [scan] section: no file extensions allowed");
        }
        Ok(())
    }
}
