use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Negative or duplicate document id, or a negative id passed to a match lookup.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A word contains a control character.
    #[error("invalid word: {0:?}")]
    InvalidWord(String),

    /// Empty minus-term or doubled minus sign.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Document position outside `[0, count)`.
    #[error("index {index} out of range for {count} documents")]
    OutOfRange { index: i32, count: usize },

    #[error("document {0} not found")]
    NotFound(i32),
}

impl SearchError {
    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            SearchError::InvalidArgument(_) => "invalid_argument",
            SearchError::InvalidWord(_) => "invalid_word",
            SearchError::InvalidQuery(_) => "invalid_query",
            SearchError::OutOfRange { .. } => "out_of_range",
            SearchError::NotFound(_) => "not_found",
        }
    }
}
