//! Error types for sequence generation and search.
//!
//! Every operation returns a [`SearchResult`]; callers match on the variant
//! to tell a rejected request apart from a failed one:
//!
//! ```rust,ignore
//! match service.parallel_search("AGCT", "kmp", 4) {
//!     Ok(result) => println!("{} matches", result.match_count()),
//!     Err(SearchError::SequenceNotFound(path)) => eprintln!("generate first: {}", path.display()),
//!     Err(SearchError::InvalidChunkCount(k)) => eprintln!("bad chunk count {k}"),
//!     Err(e) => eprintln!("search failed: {e}"),
//! }
//! ```
//!
//! Validation errors (`InvalidPattern`, `InvalidSize`, `InvalidChunkCount`)
//! are raised before any work starts, so they never leave the sequence
//! store half-updated. An unknown algorithm selector is not an error: it
//! resolves to the naive matcher with a warning.
use std::path::PathBuf;
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur during generation or search
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
    #[error("Invalid text: {0}")]
    InvalidText(String),
    #[error("Invalid size: {size} (must be between 1 and {max})")]
    InvalidSize { size: usize, max: usize },
    #[error("Invalid chunk count: {0} (must be greater than zero)")]
    InvalidChunkCount(usize),
    #[error("Sequence not found: {0} (generate a sequence first)")]
    SequenceNotFound(PathBuf),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Chunk {chunk} failed: {message}")]
    TaskFailure { chunk: usize, message: String },
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SearchError {
    pub fn invalid_pattern(msg: impl Into<String>) -> Self {
        Self::InvalidPattern(msg.into())
    }

    pub fn invalid_text(msg: impl Into<String>) -> Self {
        Self::InvalidText(msg.into())
    }

    pub fn invalid_size(size: usize, max: usize) -> Self {
        Self::InvalidSize { size, max }
    }

    pub fn sequence_not_found(path: impl Into<PathBuf>) -> Self {
        Self::SequenceNotFound(path.into())
    }

    pub fn task_failure(chunk: usize, message: impl Into<String>) -> Self {
        Self::TaskFailure {
            chunk,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Whether the request was rejected before any work was attempted
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidPattern(_)
                | Self::InvalidText(_)
                | Self::InvalidSize { .. }
                | Self::InvalidChunkCount(_)
        )
    }
}

impl From<::config::ConfigError> for SearchError {
    fn from(err: ::config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = SearchError::invalid_pattern("empty");
        assert!(matches!(err, SearchError::InvalidPattern(_)));

        let err = SearchError::invalid_size(0, 200_000_000);
        assert!(matches!(err, SearchError::InvalidSize { size: 0, .. }));

        let err = SearchError::sequence_not_found("genome_data.txt");
        assert!(matches!(err, SearchError::SequenceNotFound(_)));

        let err = SearchError::task_failure(3, "boom");
        assert!(matches!(err, SearchError::TaskFailure { chunk: 3, .. }));
    }

    #[test]
    fn test_error_messages() {
        let err = SearchError::invalid_size(300_000_000, 200_000_000);
        assert_eq!(
            err.to_string(),
            "Invalid size: 300000000 (must be between 1 and 200000000)"
        );

        let err = SearchError::InvalidChunkCount(0);
        assert_eq!(
            err.to_string(),
            "Invalid chunk count: 0 (must be greater than zero)"
        );

        let err = SearchError::task_failure(2, "Invalid text: symbol 'X' at offset 7");
        assert_eq!(
            err.to_string(),
            "Chunk 2 failed: Invalid text: symbol 'X' at offset 7"
        );

        let err = SearchError::sequence_not_found("genome_data.txt");
        assert_eq!(
            err.to_string(),
            "Sequence not found: genome_data.txt (generate a sequence first)"
        );
    }

    #[test]
    fn test_validation_classification() {
        assert!(SearchError::InvalidChunkCount(0).is_validation_error());
        assert!(SearchError::invalid_pattern("x").is_validation_error());
        assert!(!SearchError::task_failure(0, "x").is_validation_error());
        assert!(!SearchError::sequence_not_found("a").is_validation_error());
    }
}
