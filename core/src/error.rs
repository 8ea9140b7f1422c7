use crate::DocId;

/// Errors raised by the search core.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Malformed caller input: bad document id, control characters in a word,
    /// a broken excluded-term prefix or an unusable configuration value.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The document id is not present in the index.
    #[error("document {0} not found")]
    NotFound(DocId),
}

pub type Result<T> = std::result::Result<T, SearchError>;
