//! # Codescout Chunker
//!
//! Splits source files into overlapping, fixed-size line windows.
//!
//! Every window remembers the file it came from and the 1-based inclusive
//! line range it covers, so a search hit can be mapped straight back to the
//! source.
//!
//! ## Windowing
//!
//! ```text
//! lines:   1 ─────────────────────────────────────────── n
//! chunk 1: [1 ........ max_lines]
//! chunk 2:        [max_lines - overlap + 1 ........ ]
//! ...
//! last:                                   [ ........ n]
//! ```
//!
//! ## Example
//!
//! ```rust
//! use codescout_chunker::{Chunker, ChunkerConfig};
//!
//! let chunker = Chunker::new(ChunkerConfig { max_lines: 4, overlap: 1 }).unwrap();
//! let text = (1..=10).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
//!
//! let chunks = chunker.chunk_str(&text, "example.js");
//! let ranges: Vec<_> = chunks.iter().map(|c| (c.start_line, c.end_line)).collect();
//! assert_eq!(ranges, vec![(1, 4), (4, 7), (7, 10)]);
//! ```

mod chunker;
mod config;
mod error;
mod types;

pub use chunker::{split_lines, Chunker};
pub use config::ChunkerConfig;
pub use error::{ChunkerError, Result};
pub use types::CodeChunk;
