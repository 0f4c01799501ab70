use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{trace, warn};

use super::algorithms;
use crate::config::{SeqMatchConfig, DEFAULT_SUFFIX_COMPARE_SLACK};
use crate::errors::SearchResult;
use crate::results::MatchResult;

/// The matching algorithms a request can select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    Naive,
    NaiveInstrumented,
    Kmp,
    BoyerMoore,
    SuffixArray,
    Nucleotide,
}

impl Algorithm {
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Naive,
        Algorithm::NaiveInstrumented,
        Algorithm::Kmp,
        Algorithm::BoyerMoore,
        Algorithm::SuffixArray,
        Algorithm::Nucleotide,
    ];

    /// Human-readable tag reported in results
    pub fn tag(&self) -> &'static str {
        match self {
            Algorithm::Naive => algorithms::NAIVE_TAG,
            Algorithm::NaiveInstrumented => algorithms::NAIVE_INSTRUMENTED_TAG,
            Algorithm::Kmp => algorithms::KMP_TAG,
            Algorithm::BoyerMoore => algorithms::BOYER_MOORE_TAG,
            Algorithm::SuffixArray => algorithms::SUFFIX_ARRAY_TAG,
            Algorithm::Nucleotide => algorithms::NUCLEOTIDE_TAG,
        }
    }

    /// Resolves a free-form selector by case-insensitive substring match.
    ///
    /// Recognized fragments: "instrumented"/"improvised", "kmp",
    /// "boyer"/"bm", "suffix", "nucleotide"/"dna"/"regex", "naive".
    pub fn parse(selector: &str) -> Option<Algorithm> {
        let selector = selector.to_lowercase();
        let has = |needle: &str| selector.contains(needle);

        if has("instrumented") || has("improvised") {
            Some(Algorithm::NaiveInstrumented)
        } else if has("kmp") {
            Some(Algorithm::Kmp)
        } else if has("boyer") || has("bm") {
            Some(Algorithm::BoyerMoore)
        } else if has("suffix") {
            Some(Algorithm::SuffixArray)
        } else if has("nucleotide") || has("dna") || has("regex") {
            Some(Algorithm::Nucleotide)
        } else if has("naive") {
            Some(Algorithm::Naive)
        } else {
            None
        }
    }

    /// Like [`Algorithm::parse`], falling back to `Naive` for unknown selectors
    pub fn from_selector(selector: &str) -> Algorithm {
        Self::parse(selector).unwrap_or_else(|| {
            warn!("Unknown algorithm '{}', falling back to naive search", selector);
            Algorithm::Naive
        })
    }

    /// Checks `pattern` against this algorithm's symbol set without searching
    pub fn validate_pattern(&self, pattern: &[u8]) -> SearchResult<()> {
        match self {
            Algorithm::Nucleotide => algorithms::validate_nucleotide_pattern(pattern),
            _ => Ok(()),
        }
    }

    /// Runs this algorithm once over `text`
    pub fn search(
        &self,
        text: &[u8],
        pattern: &[u8],
        options: &AlgorithmOptions,
    ) -> SearchResult<MatchResult> {
        let result = match self {
            Algorithm::Naive => algorithms::naive_search(text, pattern),
            Algorithm::NaiveInstrumented => algorithms::naive_search_instrumented(text, pattern),
            Algorithm::Kmp => algorithms::kmp_search(text, pattern),
            Algorithm::BoyerMoore => algorithms::boyer_moore_search(text, pattern),
            Algorithm::SuffixArray => algorithms::suffix_array_search_with_slack(
                text,
                pattern,
                options.suffix_compare_slack,
            ),
            Algorithm::Nucleotide => algorithms::nucleotide_search(text, pattern)?,
        };
        Ok(result)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Tuning knobs shared by all algorithm runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgorithmOptions {
    pub suffix_compare_slack: usize,
}

impl Default for AlgorithmOptions {
    fn default() -> Self {
        Self {
            suffix_compare_slack: DEFAULT_SUFFIX_COMPARE_SLACK,
        }
    }
}

impl From<&SeqMatchConfig> for AlgorithmOptions {
    fn from(config: &SeqMatchConfig) -> Self {
        Self {
            suffix_compare_slack: config.suffix_compare_slack,
        }
    }
}

/// A pattern bound to the algorithm that will search for it
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    algorithm: Algorithm,
    pattern: Vec<u8>,
    options: AlgorithmOptions,
    pattern_validated: bool,
}

impl PatternMatcher {
    pub fn new(algorithm: Algorithm, pattern: impl Into<Vec<u8>>, options: AlgorithmOptions) -> Self {
        Self {
            algorithm,
            pattern: pattern.into(),
            options,
            pattern_validated: false,
        }
    }

    /// Like [`PatternMatcher::new`], but rejects an invalid pattern up front so
    /// repeated [`find_matches`](Self::find_matches) calls only check the text
    pub fn validated(
        algorithm: Algorithm,
        pattern: impl Into<Vec<u8>>,
        options: AlgorithmOptions,
    ) -> SearchResult<Self> {
        let pattern = pattern.into();
        algorithm.validate_pattern(&pattern)?;
        Ok(Self {
            algorithm,
            pattern,
            options,
            pattern_validated: true,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    /// Finds all occurrences of the pattern in `text`
    pub fn find_matches(&self, text: &[u8]) -> SearchResult<MatchResult> {
        trace!(
            "{} over {} symbols for pattern of length {}",
            self.algorithm,
            text.len(),
            self.pattern.len()
        );
        match self.algorithm {
            Algorithm::Nucleotide if self.pattern_validated => {
                algorithms::nucleotide_search_validated(text, &self.pattern)
            }
            algorithm => algorithm.search(text, &self.pattern, &self.options),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_parsing() {
        assert_eq!(Algorithm::parse("naive"), Some(Algorithm::Naive));
        assert_eq!(Algorithm::parse("KMP"), Some(Algorithm::Kmp));
        assert_eq!(Algorithm::parse("bm"), Some(Algorithm::BoyerMoore));
        assert_eq!(Algorithm::parse("BoyerMoore"), Some(Algorithm::BoyerMoore));
        assert_eq!(Algorithm::parse("suffix"), Some(Algorithm::SuffixArray));
        assert_eq!(Algorithm::parse("SuffixTree"), Some(Algorithm::SuffixArray));
        assert_eq!(Algorithm::parse("Improvised Naive"), Some(Algorithm::NaiveInstrumented));
        assert_eq!(Algorithm::parse("dna"), Some(Algorithm::Nucleotide));
        assert_eq!(Algorithm::parse("kmp-search"), Some(Algorithm::Kmp));
        assert_eq!(Algorithm::parse("aho-corasick"), None);
    }

    #[test]
    fn test_unknown_selector_falls_back_to_naive() {
        assert_eq!(Algorithm::from_selector("quantum"), Algorithm::Naive);
        assert_eq!(Algorithm::from_selector(""), Algorithm::Naive);
        assert_eq!(Algorithm::from_selector("kmp"), Algorithm::Kmp);
    }

    #[test]
    fn test_every_algorithm_agrees() {
        let text = b"ACGTTGCAACGTACGTTTACGT";
        let options = AlgorithmOptions::default();
        for algorithm in Algorithm::ALL {
            let result = algorithm.search(text, b"ACGT", &options).unwrap();
            assert_eq!(result.match_indices, vec![0, 8, 12, 18], "{algorithm}");
            assert_eq!(result.algorithm, algorithm.tag());
        }
    }

    #[test]
    fn test_pattern_matcher() {
        let matcher = PatternMatcher::new(Algorithm::Kmp, "ABAB", AlgorithmOptions::default());
        let result = matcher.find_matches(b"ABABABAB").unwrap();
        assert_eq!(result.match_indices, vec![0, 2, 4]);
        assert_eq!(matcher.pattern(), b"ABAB");
        assert_eq!(matcher.algorithm(), Algorithm::Kmp);
    }

    #[test]
    fn test_validated_matcher_rejects_bad_pattern() {
        let options = AlgorithmOptions::default();
        assert!(matches!(
            PatternMatcher::validated(Algorithm::Nucleotide, "AC1", options),
            Err(crate::errors::SearchError::InvalidPattern(_))
        ));
        // Only the nucleotide matcher constrains symbols
        assert!(PatternMatcher::validated(Algorithm::Kmp, "AC1", options).is_ok());

        let matcher = PatternMatcher::validated(Algorithm::Nucleotide, "GT", options).unwrap();
        assert_eq!(matcher.find_matches(b"AGTCGT").unwrap().match_indices, vec![1, 4]);
        assert!(matches!(
            matcher.find_matches(b"AGTXGT"),
            Err(crate::errors::SearchError::InvalidText(_))
        ));
    }

    #[test]
    fn test_options_from_config() {
        let config = SeqMatchConfig {
            suffix_compare_slack: 7,
            ..SeqMatchConfig::default()
        };
        assert_eq!(AlgorithmOptions::from(&config).suffix_compare_slack, 7);
    }
}
