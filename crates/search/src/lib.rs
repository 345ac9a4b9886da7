//! # Codescout Search
//!
//! Top-k cosine ranking of indexed code chunks against free-text queries.
//!
//! ```rust
//! use codescout_chunker::CodeChunk;
//! use codescout_search::SearchEngine;
//! use codescout_vector_store::{Index, VectorizerConfig};
//!
//! let index = Index::build(
//!     vec![
//!         CodeChunk::new("login.js".into(), 1, 1, "authenticate(user, password)".into()),
//!         CodeChunk::new("style.css".into(), 1, 1, ".btn { color: red }".into()),
//!     ],
//!     &VectorizerConfig::default(),
//! )
//! .unwrap();
//!
//! let engine = SearchEngine::new(&index);
//! let hits = engine.search("login fails with wrong password", 1).unwrap();
//! assert_eq!(hits[0].file_path, "login.js");
//! ```

mod engine;
mod error;

pub use engine::{QueryResult, SearchEngine};
pub use error::{Result, SearchError};
