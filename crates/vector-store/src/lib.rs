//! # Codescout Vector Store
//!
//! Sparse character-n-gram TF-IDF vectors for code chunks, plus the durable
//! index artifact that bundles them.
//!
//! ## Architecture
//!
//! ```text
//! CodeChunk[]
//!     │
//!     ├──> Analyzer (lowercase, squeeze whitespace runs, char n-grams)
//!     │
//!     ├──> TfidfVectorizer::fit
//!     │      ├─> VectorSpaceModel (vocabulary + idf)
//!     │      └─> SparseMatrix (one L2-normalized row per chunk)
//!     │
//!     └──> Index
//!            └─> versioned JSON artifact (atomic save, validated load)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use codescout_vector_store::{Index, VectorizerConfig};
//! use codescout_chunker::CodeChunk;
//!
//! let chunks = vec![
//!     CodeChunk::new("a.js".into(), 1, 1, "function login(user) {}".into()),
//!     CodeChunk::new("b.js".into(), 1, 1, "function logout() {}".into()),
//! ];
//! let index = Index::build(chunks, &VectorizerConfig::default()).unwrap();
//! assert_eq!(index.len(), 2);
//! ```

mod analyzer;
mod error;
mod index;
mod sparse;
mod vectorizer;

pub use analyzer::{char_ngrams, normalize_text};
pub use error::{Result, VectorStoreError};
pub use index::{Index, INDEX_SCHEMA_VERSION};
pub use sparse::{cosine_similarity, SparseMatrix, SparseVector, SparseView};
pub use vectorizer::{TfidfVectorizer, VectorSpaceModel, VectorizerConfig};

// Re-export chunk type for convenience
pub use codescout_chunker::CodeChunk;
