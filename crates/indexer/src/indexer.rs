use crate::error::{IndexerError, Result};
use crate::scanner::{FileScanner, ScanOptions};
use crate::stats::IndexStats;
use codescout_chunker::{split_lines, Chunker, ChunkerConfig, CodeChunk};
use codescout_vector_store::{Index, TfidfVectorizer, VectorizerConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Everything the offline indexing pipeline needs to know
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    pub scan: ScanOptions,
    pub chunker: ChunkerConfig,
    pub vectorizer: VectorizerConfig,
}

/// Walks a project, chunks its sources and fits the search index
pub struct ProjectIndexer {
    scanner: FileScanner,
    chunker: Chunker,
    vectorizer: VectorizerConfig,
}

impl ProjectIndexer {
    /// Validate the whole configuration and the root before any file is touched.
    pub fn new(root: impl AsRef<Path>, config: &IndexerConfig) -> Result<Self> {
        let chunker = Chunker::new(config.chunker)?;
        TfidfVectorizer::new(config.vectorizer)?;
        let scanner = FileScanner::new(root, config.scan.clone())?;
        Ok(Self {
            scanner,
            chunker,
            vectorizer: config.vectorizer,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        self.scanner.root()
    }

    /// Build the index in memory.
    ///
    /// Files are processed in relative-path order so the result does not depend on
    /// directory traversal order. Unreadable or non-UTF-8 files are skipped and
    /// reported in [`IndexStats::errors`].
    pub fn build(&self) -> Result<(Index, IndexStats)> {
        let started = Instant::now();
        let mut stats = IndexStats::new();
        log::info!("Indexing {}", self.root().display());

        let mut files: Vec<(String, PathBuf)> = self
            .scanner
            .scan()
            .map(|path| (self.scanner.relative_path(&path), path))
            .collect();
        files.sort();
        log::info!("Found {} source files", files.len());

        let mut chunks: Vec<CodeChunk> = Vec::new();
        for (relative, path) in &files {
            let content = match read_utf8(path) {
                Ok(content) => content,
                Err(reason) => {
                    log::warn!("Skipping {relative}: {reason}");
                    stats.add_error(format!("{relative}: {reason}"));
                    continue;
                }
            };

            let file_chunks = self.chunker.chunk_str(&content, relative);
            log::debug!("{relative}: {} chunks", file_chunks.len());
            let extension = path
                .extension()
                .map(|ext| ext.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            stats.add_file(&extension, split_lines(&content).len());
            stats.add_chunks(file_chunks.len());
            chunks.extend(file_chunks);
        }

        if chunks.is_empty() {
            return Err(IndexerError::NoChunks(self.root().display().to_string()));
        }

        log::info!(
            "{} chunks from {} files; building TF-IDF vectors",
            chunks.len(),
            stats.files
        );
        let index = Index::build(chunks, &self.vectorizer)?;
        stats.vocabulary_size = index.model().vocabulary_size();
        stats.time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        Ok((index, stats))
    }

    /// Build the index and persist it to `index_path`.
    pub fn index_to(&self, index_path: impl AsRef<Path>) -> Result<IndexStats> {
        let (index, stats) = self.build()?;
        index.save(index_path)?;
        Ok(stats)
    }
}

fn read_utf8(path: &Path) -> std::result::Result<String, String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    String::from_utf8(bytes).map_err(|_| "not valid UTF-8".to_string())
}
