//! Exact-match algorithms over byte sequences.
//!
//! Every function reports all start offsets of `pattern` in `text`,
//! ascending and without duplicates, wrapped in a [`MatchResult`] carrying
//! the timing of the run. An empty pattern, or one longer than the text,
//! yields no matches. All variants agree on the positions they report for
//! the same input; they differ only in cost and in the counters they fill.
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use std::cmp::Ordering;
use std::time::{Duration, Instant};

use crate::config::DEFAULT_SUFFIX_COMPARE_SLACK;
use crate::errors::{SearchError, SearchResult};
use crate::results::MatchResult;

pub const NAIVE_TAG: &str = "Naive Search";
pub const NAIVE_INSTRUMENTED_TAG: &str = "Instrumented Naive Search";
pub const KMP_TAG: &str = "KMP Search";
pub const BOYER_MOORE_TAG: &str = "Boyer-Moore Search";
pub const SUFFIX_ARRAY_TAG: &str = "Suffix Array Search";
pub const NUCLEOTIDE_TAG: &str = "Nucleotide Regex Search";

/// Size of the bad-character table; one slot per byte value
const ALPHABET_SIZE: usize = 256;

/// IUPAC nucleotide codes accepted by [`nucleotide_search`]
pub const NUCLEOTIDE_CODES: &str = "ACGTURYSWKMBDHVN";

static NON_NUCLEOTIDE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i-u)[^ACGTURYSWKMBDHVN]").unwrap());

fn has_no_candidates(text: &[u8], pattern: &[u8]) -> bool {
    pattern.is_empty() || pattern.len() > text.len()
}

/// Brute-force scan, breaking out of each window at the first mismatch
pub fn naive_search(text: &[u8], pattern: &[u8]) -> MatchResult {
    let (n, m) = (text.len(), pattern.len());
    let start = Instant::now();
    let mut matches = Vec::new();

    if !has_no_candidates(text, pattern) {
        for i in 0..=n - m {
            let mut j = 0;
            while j < m && text[i + j] == pattern[j] {
                j += 1;
            }
            if j == m {
                matches.push(i);
            }
        }
    }

    MatchResult::new(NAIVE_TAG, matches, n, m, start.elapsed())
}

/// Naive scan that also counts every symbol comparison it performs
pub fn naive_search_instrumented(text: &[u8], pattern: &[u8]) -> MatchResult {
    let (n, m) = (text.len(), pattern.len());
    let start = Instant::now();
    let mut matches = Vec::new();
    let mut comparisons: u64 = 0;

    if !has_no_candidates(text, pattern) {
        for i in 0..=n - m {
            let mut j = 0;
            while j < m {
                comparisons += 1;
                if text[i + j] != pattern[j] {
                    break;
                }
                j += 1;
            }
            if j == m {
                matches.push(i);
            }
        }
    }

    MatchResult::new(NAIVE_INSTRUMENTED_TAG, matches, n, m, start.elapsed())
        .with_comparisons(comparisons)
}

/// Knuth-Morris-Pratt search.
///
/// Builds the failure function in O(m), then scans the text once in O(n),
/// never moving backwards in the text.
pub fn kmp_search(text: &[u8], pattern: &[u8]) -> MatchResult {
    let (n, m) = (text.len(), pattern.len());
    let start = Instant::now();
    let mut matches = Vec::new();

    if !has_no_candidates(text, pattern) {
        let failure = compute_failure_table(pattern);
        let mut j = 0; // length of the current matched prefix

        for (i, &c) in text.iter().enumerate() {
            while j > 0 && pattern[j] != c {
                j = failure[j - 1];
            }
            if pattern[j] == c {
                j += 1;
            }
            if j == m {
                matches.push(i + 1 - m);
                j = failure[j - 1];
            }
        }
    }

    MatchResult::new(KMP_TAG, matches, n, m, start.elapsed())
}

/// Longest proper prefix of `pattern[..=i]` that is also its suffix, per `i`
pub fn compute_failure_table(pattern: &[u8]) -> Vec<usize> {
    let m = pattern.len();
    let mut failure = vec![0; m];
    let mut len = 0;

    for i in 1..m {
        while len > 0 && pattern[len] != pattern[i] {
            len = failure[len - 1];
        }
        if pattern[len] == pattern[i] {
            len += 1;
        }
        failure[i] = len;
    }

    failure
}

/// Boyer-Moore search using the bad-character rule only.
///
/// Windows are compared right to left. On a mismatch at pattern index `j`
/// the window moves by `max(1, j - last[text symbol])`; after a full match it
/// moves so the symbol just past the window lines up with its last
/// occurrence in the pattern, or by one at the end of the text.
pub fn boyer_moore_search(text: &[u8], pattern: &[u8]) -> MatchResult {
    let (n, m) = (text.len(), pattern.len());
    let start = Instant::now();
    let mut matches = Vec::new();

    if !has_no_candidates(text, pattern) {
        let last = bad_character_table(pattern);
        let mut s = 0;

        while s <= n - m {
            let mut j = m as isize - 1;
            while j >= 0 && pattern[j as usize] == text[s + j as usize] {
                j -= 1;
            }

            if j < 0 {
                matches.push(s);
                s += if s + m < n {
                    (m as isize - last[text[s + m] as usize]) as usize
                } else {
                    1
                };
            } else {
                let shift = j - last[text[s + j as usize] as usize];
                s += shift.max(1) as usize;
            }
        }
    }

    MatchResult::new(BOYER_MOORE_TAG, matches, n, m, start.elapsed())
}

/// Last index of every byte value in `pattern`, -1 when absent
pub fn bad_character_table(pattern: &[u8]) -> [isize; ALPHABET_SIZE] {
    let mut last = [-1isize; ALPHABET_SIZE];
    for (i, &c) in pattern.iter().enumerate() {
        last[c as usize] = i as isize;
    }
    last
}

/// Suffix-array search with the default comparator bound
pub fn suffix_array_search(text: &[u8], pattern: &[u8]) -> MatchResult {
    suffix_array_search_with_slack(text, pattern, DEFAULT_SUFFIX_COMPARE_SLACK)
}

/// Builds a suffix array over `text`, binary-searches it for one suffix
/// starting with `pattern`, then expands to its neighbours.
///
/// Suffixes are ordered by their first `pattern.len() + slack` symbols, then
/// by length. Suffixes sharing a longer prefix than that keep an arbitrary
/// relative order, which never separates the suffixes starting with
/// `pattern`, so the reported positions are unaffected.
///
/// `overhead_time_ns` holds the construction time; `execution_time_ns`
/// covers construction and lookup.
pub fn suffix_array_search_with_slack(text: &[u8], pattern: &[u8], slack: usize) -> MatchResult {
    let (n, m) = (text.len(), pattern.len());

    if has_no_candidates(text, pattern) {
        return MatchResult::new(SUFFIX_ARRAY_TAG, Vec::new(), n, m, Duration::ZERO)
            .with_overhead(Duration::ZERO);
    }

    let start = Instant::now();
    let suffixes = build_suffix_array(text, m + slack);
    let construction = start.elapsed();

    let prefix_at = |pos: usize| &text[pos..(pos + m).min(n)];

    let mut matches = Vec::new();
    let (mut lo, mut hi) = (0, suffixes.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match prefix_at(suffixes[mid]).cmp(pattern) {
            Ordering::Equal => {
                let mut left = mid;
                while left > 0 && prefix_at(suffixes[left - 1]) == pattern {
                    left -= 1;
                }
                let mut right = mid + 1;
                while right < suffixes.len() && prefix_at(suffixes[right]) == pattern {
                    right += 1;
                }
                matches.extend_from_slice(&suffixes[left..right]);
                break;
            }
            Ordering::Less => lo = mid + 1,
            Ordering::Greater => hi = mid,
        }
    }

    matches.sort_unstable();
    matches.dedup();

    MatchResult::new(SUFFIX_ARRAY_TAG, matches, n, m, start.elapsed()).with_overhead(construction)
}

/// All suffix offsets of `text`, sorted by at most `compare_len` leading
/// symbols and then by suffix length
pub fn build_suffix_array(text: &[u8], compare_len: usize) -> Vec<usize> {
    let mut suffixes: Vec<usize> = (0..text.len()).collect();
    suffixes.sort_unstable_by(|&a, &b| compare_suffixes(text, a, b, compare_len));
    suffixes
}

#[inline]
fn compare_suffixes(text: &[u8], a: usize, b: usize, compare_len: usize) -> Ordering {
    let n = text.len();
    let len_a = (n - a).min(compare_len);
    let len_b = (n - b).min(compare_len);
    text[a..a + len_a]
        .cmp(&text[b..b + len_b])
        .then_with(|| (n - a).cmp(&(n - b)))
}

/// Validates both inputs against the IUPAC nucleotide codes, then searches
/// with the regex engine, restarting one symbol past each hit so
/// overlapping occurrences are reported too.
pub fn nucleotide_search(text: &[u8], pattern: &[u8]) -> SearchResult<MatchResult> {
    validate_nucleotide_pattern(pattern)?;
    nucleotide_search_validated(text, pattern)
}

/// Rejects patterns containing symbols outside [`NUCLEOTIDE_CODES`]
pub fn validate_nucleotide_pattern(pattern: &[u8]) -> SearchResult<()> {
    match NON_NUCLEOTIDE.find(pattern) {
        Some(bad) => Err(SearchError::invalid_pattern(format!(
            "symbol '{}' at offset {} is not a nucleotide code",
            String::from_utf8_lossy(bad.as_bytes()),
            bad.start()
        ))),
        None => Ok(()),
    }
}

/// [`nucleotide_search`] for a pattern that already passed
/// [`validate_nucleotide_pattern`]; only the text is checked.
pub fn nucleotide_search_validated(text: &[u8], pattern: &[u8]) -> SearchResult<MatchResult> {
    let (n, m) = (text.len(), pattern.len());
    let start = Instant::now();

    if has_no_candidates(text, pattern) {
        return Ok(MatchResult::new(NUCLEOTIDE_TAG, Vec::new(), n, m, start.elapsed()));
    }

    if let Some(bad) = NON_NUCLEOTIDE.find(text) {
        return Err(SearchError::invalid_text(format!(
            "symbol '{}' at offset {} is not a nucleotide code",
            String::from_utf8_lossy(bad.as_bytes()),
            bad.start()
        )));
    }

    // Validated, so the pattern is ASCII
    let literal = std::str::from_utf8(pattern).map_err(|e| SearchError::invalid_pattern(e.to_string()))?;
    let matcher = Regex::new(&regex::escape(literal))
        .map_err(|e| SearchError::invalid_pattern(e.to_string()))?;

    let mut matches = Vec::new();
    let mut at = 0;
    while let Some(found) = matcher.find_at(text, at) {
        matches.push(found.start());
        at = found.start() + 1;
    }

    Ok(MatchResult::new(NUCLEOTIDE_TAG, matches, n, m, start.elapsed()))
}
