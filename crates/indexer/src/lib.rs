//! # Codescout Indexer
//!
//! Offline indexing pipeline for lexical code search.
//!
//! ## Pipeline
//!
//! ```text
//! Directory
//!     │
//!     ├──> File Scanner (ignore-set + extension allow-set)
//!     │      └─> Source files, sorted by relative path
//!     │
//!     ├──> Chunker (overlapping line windows)
//!     │      └─> Code chunks
//!     │
//!     └──> TF-IDF fit
//!            └─> Index (saved as one artifact)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use codescout_indexer::{IndexerConfig, ProjectIndexer};
//!
//! fn main() -> anyhow::Result<()> {
//!     let indexer = ProjectIndexer::new("/path/to/project", &IndexerConfig::default())?;
//!     let stats = indexer.index_to("repo_index.json")?;
//!
//!     println!("Indexed {} files, {} chunks", stats.files, stats.chunks);
//!     Ok(())
//! }
//! ```

mod error;
mod indexer;
mod scanner;
mod stats;

pub use error::{IndexerError, Result};
pub use indexer::{IndexerConfig, ProjectIndexer};
pub use scanner::{FileScanner, ScanOptions};
pub use stats::IndexStats;
