use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("top_k must be a positive integer (got {0})")]
    InvalidTopK(usize),
}
