//! Search result types.
//!
//! A [`MatchResult`] is a value object built once per request by the
//! algorithm (or coordinator) that produced it and owned by the caller from
//! then on. Positions are 0-based, strictly ascending and unique.
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::host::HostInfo;

/// Outcome of one search run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// Tag of the algorithm (and parallel layout) that produced this result
    pub algorithm: String,
    /// Start offsets of every occurrence, ascending
    pub match_indices: Vec<usize>,
    /// Length of the searched text
    pub text_length: usize,
    /// Length of the pattern
    pub pattern_length: usize,
    /// Wall-clock time of the run, including any construction phase
    pub execution_time_ns: u64,
    /// Construction time for algorithms with a build phase
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overhead_time_ns: Option<u64>,
    /// Symbol comparisons performed, for instrumented algorithms
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison_count: Option<u64>,
    /// Set only on failure results; positions are meaningless when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Host description, attached to parallel results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<HostInfo>,
}

impl MatchResult {
    /// Creates a result for a completed run
    pub fn new(
        algorithm: impl Into<String>,
        match_indices: Vec<usize>,
        text_length: usize,
        pattern_length: usize,
        execution_time: Duration,
    ) -> Self {
        Self {
            algorithm: algorithm.into(),
            match_indices,
            text_length,
            pattern_length,
            execution_time_ns: duration_ns(execution_time),
            ..Default::default()
        }
    }

    /// Creates a result that only carries an error indicator
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error_message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn with_overhead(mut self, overhead: Duration) -> Self {
        self.overhead_time_ns = Some(duration_ns(overhead));
        self
    }

    pub fn with_comparisons(mut self, comparisons: u64) -> Self {
        self.comparison_count = Some(comparisons);
        self
    }

    pub fn with_host(mut self, host: HostInfo) -> Self {
        self.host = Some(host);
        self
    }

    pub fn is_error(&self) -> bool {
        self.error_message.is_some()
    }

    pub fn match_count(&self) -> usize {
        self.match_indices.len()
    }

    pub fn execution_time(&self) -> Duration {
        Duration::from_nanos(self.execution_time_ns)
    }

    pub fn overhead_time(&self) -> Option<Duration> {
        self.overhead_time_ns.map(Duration::from_nanos)
    }
}

fn duration_ns(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}
