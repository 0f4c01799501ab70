//! Deterministic synthetic sequence generation.
//!
//! The alphabet is derived from the pattern, symbols are drawn uniformly with
//! a `StdRng` seeded from [`FIXED_SEED`], and the pattern is then written over
//! three fixed windows so every generated sequence has known positive hits.
//! The same `(pattern, size)` always yields the same bytes within this
//! implementation; byte equality with other implementations is not a goal.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::errors::{SearchError, SearchResult};

/// Seed used for every generation
pub const FIXED_SEED: u64 = 42;

/// Offset of the first injected copy of the pattern
pub const NEAR_START_OFFSET: usize = 1000;

/// Distance of the last injected copy from the end of the sequence
pub const NEAR_END_MARGIN: usize = 1000;

/// Distinct uppercase symbols of `pattern`, in order of first appearance
pub fn derive_alphabet(pattern: &str) -> Vec<u8> {
    let mut alphabet = Vec::new();
    for byte in pattern.to_ascii_uppercase().bytes() {
        if !alphabet.contains(&byte) {
            alphabet.push(byte);
        }
    }
    alphabet
}

/// Rejects patterns that cannot seed a sequence: empty ones, and ones with
/// symbols outside ASCII, which would split into bytes that are not valid text
pub fn validate_pattern(pattern: &str) -> SearchResult<()> {
    if pattern.is_empty() {
        return Err(SearchError::invalid_pattern(
            "pattern must contain at least one symbol to derive an alphabet",
        ));
    }
    if let Some((offset, symbol)) = pattern.char_indices().find(|(_, c)| !c.is_ascii()) {
        return Err(SearchError::invalid_pattern(format!(
            "symbol '{}' at offset {} is not ASCII",
            symbol, offset
        )));
    }
    Ok(())
}

/// Offsets the pattern is written to, before bounds filtering
pub fn injection_points(size: usize, pattern_len: usize) -> [Option<usize>; 3] {
    [
        Some(NEAR_START_OFFSET),
        Some(size / 2),
        size.checked_sub(pattern_len + NEAR_END_MARGIN),
    ]
}

/// Builds `size` symbols over the pattern's alphabet and injects the pattern.
///
/// The pattern is uppercased before use. Fails with `InvalidPattern` when the
/// pattern is empty or not ASCII. Size limits are enforced by the caller.
pub fn generate_sequence(pattern: &str, size: usize) -> SearchResult<Vec<u8>> {
    validate_pattern(pattern)?;
    let alphabet = derive_alphabet(pattern);

    debug!(
        "Generating {} symbols over alphabet {:?}",
        size,
        String::from_utf8_lossy(&alphabet)
    );

    let mut rng = StdRng::seed_from_u64(FIXED_SEED);
    let mut sequence: Vec<u8> = (0..size)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
        .collect();

    let upper = pattern.to_ascii_uppercase();
    let pattern = upper.as_bytes();
    for offset in injection_points(size, pattern.len()).into_iter().flatten() {
        if offset + pattern.len() <= size {
            sequence[offset..offset + pattern.len()].copy_from_slice(pattern);
        }
    }

    Ok(sequence)
}
