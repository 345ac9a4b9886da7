use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexerError>;

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Chunker error: {0}")]
    ChunkerError(#[from] codescout_chunker::ChunkerError),

    #[error("Vector store error: {0}")]
    VectorStoreError(#[from] codescout_vector_store::VectorStoreError),

    #[error("Invalid project path: {0}")]
    InvalidPath(String),

    #[error("No chunks found under {0}; check the allowed extensions and the root path")]
    NoChunks(String),
}
