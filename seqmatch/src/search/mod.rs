//! Exact substring search over the stored sequence.
//!
//! The module is layered the same way a request flows through it:
//!
//! 1. [`algorithms`] holds the matching functions themselves. Each takes the
//!    full text and pattern and returns a
//!    [`MatchResult`](crate::results::MatchResult) with ascending,
//!    unique positions plus its own timing.
//! 2. [`matcher`] turns a free-form selector into a closed [`Algorithm`] and
//!    binds it to a pattern. Unknown selectors fall back to naive search
//!    with a warning.
//! 3. [`engine`] runs one algorithm sequentially over the whole sequence,
//!    or every algorithm in turn for a comparison run.
//! 4. [`processor`] splits the sequence into overlapping chunks, runs the
//!    algorithm on each chunk in a rayon pool and merges the positions.
//!
//! ```rust,ignore
//! let request = MatchRequest::new("GATTACA", "kmp").with_chunks(8);
//! let sequential = engine::search(&store, &request, &AlgorithmOptions::default())?;
//! let parallel = searcher.execute(&store, &request)?;
//! assert_eq!(sequential.match_indices, parallel.match_indices);
//! ```
pub mod algorithms;
pub mod engine;
pub mod matcher;
pub mod processor;

pub use engine::{compare_all, search};
pub use matcher::{Algorithm, AlgorithmOptions, PatternMatcher};
pub use processor::{plan_chunks, Chunk, ParallelSearcher};

use serde::{Deserialize, Serialize};

/// Parameters of one search call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    /// Pattern to look for. Matched exactly; searches over the stored
    /// sequence uppercase it first, since generated symbols are uppercase.
    pub pattern: String,
    /// Free-form algorithm selector such as "kmp" or "boyermoore"
    pub algorithm: String,
    /// Number of chunks for parallel searches; ignored by sequential ones
    #[serde(default)]
    pub chunk_count: usize,
}

impl MatchRequest {
    pub fn new(pattern: impl Into<String>, algorithm: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            algorithm: algorithm.into(),
            chunk_count: 1,
        }
    }

    pub fn with_chunks(mut self, chunk_count: usize) -> Self {
        self.chunk_count = chunk_count;
        self
    }

    /// Copy of this request with the pattern in the stored sequence's case
    pub fn for_stored_sequence(&self) -> Self {
        Self {
            pattern: stored_pattern(&self.pattern),
            ..self.clone()
        }
    }
}

/// Uppercases a pattern the way the generator uppercases its alphabet
pub(crate) fn stored_pattern(pattern: &str) -> String {
    pattern.to_ascii_uppercase()
}
