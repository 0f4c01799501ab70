use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, info, trace, warn};

use super::matcher::{Algorithm, AlgorithmOptions, PatternMatcher};
use super::MatchRequest;
use crate::config::SeqMatchConfig;
use crate::errors::{SearchError, SearchResult};
use crate::host::HostInfo;
use crate::metrics::SearchMetrics;
use crate::results::MatchResult;
use crate::store::SequenceStore;

/// A `[start, end)` window of the sequence handed to one worker task.
///
/// `end` already includes the trailing overlap; `overlap` records how many of
/// those symbols belong to the next chunk's own range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub start: usize,
    pub end: usize,
    pub overlap: usize,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Splits `text_len` symbols into `chunk_count` chunks.
///
/// Each chunk but the last spans `text_len / chunk_count` symbols plus
/// `pattern_len - 1` of overlap, clamped to the text. The last chunk runs to
/// the end of the text and absorbs the division remainder.
pub fn plan_chunks(
    text_len: usize,
    pattern_len: usize,
    chunk_count: usize,
) -> SearchResult<Vec<Chunk>> {
    if chunk_count == 0 {
        return Err(SearchError::InvalidChunkCount(chunk_count));
    }

    let base = text_len / chunk_count;
    let overlap = pattern_len.saturating_sub(1);

    let chunks = (0..chunk_count)
        .map(|index| {
            let start = index * base;
            if index == chunk_count - 1 {
                Chunk {
                    index,
                    start,
                    end: text_len,
                    overlap: 0,
                }
            } else {
                let end = ((index + 1) * base + overlap).min(text_len);
                Chunk {
                    index,
                    start,
                    end,
                    overlap: end - (index + 1) * base,
                }
            }
        })
        .collect();

    Ok(chunks)
}

/// Fans one algorithm out over chunks of the sequence on a fixed-size pool
#[derive(Debug)]
pub struct ParallelSearcher {
    pool: ThreadPool,
    worker_count: usize,
    options: AlgorithmOptions,
    metrics: SearchMetrics,
}

impl ParallelSearcher {
    /// Creates a searcher backed by `worker_count` dedicated threads
    pub fn new(
        worker_count: NonZeroUsize,
        options: AlgorithmOptions,
        metrics: SearchMetrics,
    ) -> SearchResult<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(worker_count.get())
            .thread_name(|i| format!("seqmatch-worker-{}", i))
            .build()
            .map_err(|e| SearchError::config_error(format!("failed to build worker pool: {}", e)))?;

        debug!("Created worker pool with {} threads", worker_count);
        Ok(Self {
            pool,
            worker_count: worker_count.get(),
            options,
            metrics,
        })
    }

    pub fn from_config(config: &SeqMatchConfig, metrics: SearchMetrics) -> SearchResult<Self> {
        Self::new(config.worker_count, AlgorithmOptions::from(config), metrics)
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Searches the store's current sequence chunk by chunk.
    ///
    /// The pattern is uppercased to match the stored symbols.
    pub fn execute(&self, store: &SequenceStore, request: &MatchRequest) -> SearchResult<MatchResult> {
        if request.chunk_count == 0 {
            return Err(SearchError::InvalidChunkCount(request.chunk_count));
        }
        let request = request.for_stored_sequence();
        let sequence = store.read()?;
        self.search_text(sequence.as_bytes(), &request)
    }

    /// Searches `text` chunk by chunk and merges the per-chunk positions.
    ///
    /// The pattern is validated once before any chunk is dispatched. Any
    /// chunk failure fails the whole request once every task has resolved.
    /// No partial result is returned.
    pub fn search_text(&self, text: &[u8], request: &MatchRequest) -> SearchResult<MatchResult> {
        let algorithm = Algorithm::from_selector(&request.algorithm);
        let matcher = PatternMatcher::validated(algorithm, request.pattern.as_bytes(), self.options)?;
        let pattern_len = matcher.pattern().len();

        info!(
            "Parallel {} over {} symbols: {} chunks on {} workers",
            algorithm,
            text.len(),
            request.chunk_count,
            self.worker_count
        );

        let start_time = Instant::now();
        let chunks = plan_chunks(text.len(), pattern_len, request.chunk_count)?;

        let outcome: SearchResult<Vec<Vec<usize>>> = self.pool.install(|| {
            chunks
                .par_iter()
                .map(|chunk| self.run_chunk(&matcher, text, chunk))
                .collect()
        });
        let per_chunk = match outcome {
            Ok(per_chunk) => per_chunk,
            Err(e) => {
                warn!("Parallel search aborted: {}", e);
                return Err(e);
            }
        };

        let merged: BTreeSet<usize> = per_chunk.into_iter().flatten().collect();
        let elapsed = start_time.elapsed();

        let tag = format!(
            "{} Parallel (Chunks: {} | Threads: {})",
            algorithm.tag(),
            request.chunk_count,
            self.worker_count
        );
        info!(
            "Parallel search complete. Found {} matches in {:?}",
            merged.len(),
            elapsed
        );

        Ok(MatchResult::new(
            tag,
            merged.into_iter().collect(),
            text.len(),
            pattern_len,
            elapsed,
        )
        .with_host(HostInfo::current()))
    }

    /// Runs the matcher on one chunk and shifts its positions to global offsets
    fn run_chunk(
        &self,
        matcher: &PatternMatcher,
        text: &[u8],
        chunk: &Chunk,
    ) -> SearchResult<Vec<usize>> {
        trace!(
            "Chunk {} [{}, {}) overlap {}",
            chunk.index,
            chunk.start,
            chunk.end,
            chunk.overlap
        );
        self.metrics.record_chunk(chunk.len() as u64);

        let slice = &text[chunk.start..chunk.end];
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| matcher.find_matches(slice)));

        let local = match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                self.metrics.record_chunk_failure();
                return Err(SearchError::task_failure(chunk.index, e.to_string()));
            }
            Err(payload) => {
                self.metrics.record_chunk_failure();
                return Err(SearchError::task_failure(chunk.index, panic_message(&*payload)));
            }
        };

        Ok(local
            .match_indices
            .into_iter()
            .map(|pos| chunk.start + pos)
            .collect())
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "worker panicked".to_string()
    }
}
