use tracing::{debug, info};

use super::matcher::{Algorithm, AlgorithmOptions, PatternMatcher};
use super::{stored_pattern, MatchRequest};
use crate::errors::SearchResult;
use crate::results::MatchResult;
use crate::store::SequenceStore;

/// Runs the requested algorithm once over the whole current sequence.
///
/// The pattern is uppercased to match the stored symbols.
pub fn search(
    store: &SequenceStore,
    request: &MatchRequest,
    options: &AlgorithmOptions,
) -> SearchResult<MatchResult> {
    let algorithm = Algorithm::from_selector(&request.algorithm);
    let sequence = store.read()?;

    info!(
        "Sequential {} over {} symbols (sequence v{})",
        algorithm,
        sequence.len(),
        sequence.version()
    );

    let pattern = stored_pattern(&request.pattern);
    let matcher = PatternMatcher::new(algorithm, pattern, *options);
    let result = matcher.find_matches(sequence.as_bytes())?;

    info!(
        "Search complete. Found {} matches in {:?}",
        result.match_count(),
        result.execution_time()
    );
    Ok(result)
}

/// Runs every algorithm once over the current sequence, in [`Algorithm::ALL`] order.
///
/// A variant that rejects the input (the nucleotide matcher on a
/// non-nucleotide sequence) is reported as a failure result rather than
/// aborting the comparison.
pub fn compare_all(
    store: &SequenceStore,
    pattern: &str,
    options: &AlgorithmOptions,
) -> SearchResult<Vec<MatchResult>> {
    let sequence = store.read()?;
    let pattern = stored_pattern(pattern);
    let mut results = Vec::with_capacity(Algorithm::ALL.len());

    for algorithm in Algorithm::ALL {
        let matcher = PatternMatcher::new(algorithm, pattern.as_bytes(), *options);
        let result = match matcher.find_matches(sequence.as_bytes()) {
            Ok(result) => result,
            Err(e) => {
                debug!("{} rejected the input: {}", algorithm, e);
                MatchResult {
                    algorithm: algorithm.tag().to_string(),
                    text_length: sequence.len(),
                    pattern_length: pattern.len(),
                    ..MatchResult::failure(e.to_string())
                }
            }
        };
        results.push(result);
    }

    Ok(results)
}
