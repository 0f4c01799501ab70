use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Tracks sequence cache and chunk dispatch counters.
///
/// Clones share the same counters, so the store and the parallel
/// coordinator can report into one instance.
#[derive(Debug, Clone)]
pub struct SearchMetrics {
    // Sequence cache
    cache_hits: Arc<AtomicU64>,
    cache_misses: Arc<AtomicU64>,
    sequences_generated: Arc<AtomicU64>,
    bytes_generated: Arc<AtomicU64>,

    // Parallel dispatch
    chunks_dispatched: Arc<AtomicU64>,
    chunk_failures: Arc<AtomicU64>,
    symbols_scanned: Arc<AtomicU64>,
}

impl SearchMetrics {
    /// Creates a new SearchMetrics instance
    pub fn new() -> Self {
        Self {
            cache_hits: Arc::new(AtomicU64::new(0)),
            cache_misses: Arc::new(AtomicU64::new(0)),
            sequences_generated: Arc::new(AtomicU64::new(0)),
            bytes_generated: Arc::new(AtomicU64::new(0)),
            chunks_dispatched: Arc::new(AtomicU64::new(0)),
            chunk_failures: Arc::new(AtomicU64::new(0)),
            symbols_scanned: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Records a sequence read; a miss means the sequence was loaded from disk
    pub fn record_cache_operation(&self, hit: bool) {
        if hit {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.cache_misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Records a completed generation
    pub fn record_generation(&self, bytes: u64) {
        self.sequences_generated.fetch_add(1, Ordering::Relaxed);
        let total = self.bytes_generated.fetch_add(bytes, Ordering::Relaxed) + bytes;
        debug!("Generated {} bytes, total generated: {} bytes", bytes, total);
    }

    /// Records one chunk task handed to the worker pool
    pub fn record_chunk(&self, symbols: u64) {
        self.chunks_dispatched.fetch_add(1, Ordering::Relaxed);
        self.symbols_scanned.fetch_add(symbols, Ordering::Relaxed);
    }

    /// Records a chunk task that returned an error or panicked
    pub fn record_chunk_failure(&self) {
        self.chunk_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> u64 {
        self.cache_misses.load(Ordering::Relaxed)
    }

    /// Gets a snapshot of all counters
    pub fn get_stats(&self) -> SearchStats {
        SearchStats {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            sequences_generated: self.sequences_generated.load(Ordering::Relaxed),
            bytes_generated: self.bytes_generated.load(Ordering::Relaxed),
            chunks_dispatched: self.chunks_dispatched.load(Ordering::Relaxed),
            chunk_failures: self.chunk_failures.load(Ordering::Relaxed),
            symbols_scanned: self.symbols_scanned.load(Ordering::Relaxed),
        }
    }

    /// Logs current statistics
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Search stats:\n\
             Sequence cache hits/misses: {}/{}\n\
             Sequences generated: {} ({} bytes)\n\
             Chunks dispatched/failed: {}/{}\n\
             Symbols scanned by chunks: {}",
            stats.cache_hits,
            stats.cache_misses,
            stats.sequences_generated,
            stats.bytes_generated,
            stats.chunks_dispatched,
            stats.chunk_failures,
            stats.symbols_scanned
        );
    }
}

impl Default for SearchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of [`SearchMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub sequences_generated: u64,
    pub bytes_generated: u64,
    pub chunks_dispatched: u64,
    pub chunk_failures: u64,
    pub symbols_scanned: u64,
}
