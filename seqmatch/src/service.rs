use std::path::PathBuf;
use tracing::info;

use crate::config::SeqMatchConfig;
use crate::errors::SearchResult;
use crate::metrics::SearchMetrics;
use crate::results::MatchResult;
use crate::search::{engine, AlgorithmOptions, MatchRequest, ParallelSearcher};
use crate::store::{SequenceHandle, SequenceStore};

/// Location and size of a freshly generated sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSequence {
    pub path: PathBuf,
    pub length: usize,
    pub version: u64,
}

/// Entry point bundling the store, the algorithms and the parallel coordinator
#[derive(Debug)]
pub struct MatchService {
    store: SequenceStore,
    searcher: ParallelSearcher,
    options: AlgorithmOptions,
    metrics: SearchMetrics,
}

impl MatchService {
    pub fn from_config(config: &SeqMatchConfig) -> SearchResult<Self> {
        config.validate()?;
        let metrics = SearchMetrics::new();
        Ok(Self {
            store: SequenceStore::from_config(config, metrics.clone()),
            searcher: ParallelSearcher::from_config(config, metrics.clone())?,
            options: AlgorithmOptions::from(config),
            metrics,
        })
    }

    /// Generates and persists a new sequence, replacing the current one
    pub fn generate(&self, pattern: &str, size: usize) -> SearchResult<GeneratedSequence> {
        let handle = self.store.generate(pattern, size)?;
        Ok(GeneratedSequence {
            path: handle.path().to_path_buf(),
            length: handle.len(),
            version: handle.version(),
        })
    }

    pub fn read(&self) -> SearchResult<SequenceHandle> {
        self.store.read()
    }

    /// Runs one algorithm over the whole sequence on the calling thread
    pub fn sequential_search(&self, pattern: &str, algorithm: &str) -> SearchResult<MatchResult> {
        let request = MatchRequest::new(pattern, algorithm);
        engine::search(&self.store, &request, &self.options)
    }

    /// Runs one algorithm over `chunk_count` chunks on the worker pool
    pub fn parallel_search(
        &self,
        pattern: &str,
        algorithm: &str,
        chunk_count: usize,
    ) -> SearchResult<MatchResult> {
        let request = MatchRequest::new(pattern, algorithm).with_chunks(chunk_count);
        self.searcher.execute(&self.store, &request)
    }

    /// Runs every algorithm once for a side-by-side benchmark
    pub fn compare(&self, pattern: &str) -> SearchResult<Vec<MatchResult>> {
        info!("Comparing all algorithms for pattern '{}'", pattern);
        engine::compare_all(&self.store, pattern, &self.options)
    }

    pub fn store(&self) -> &SequenceStore {
        &self.store
    }

    pub fn worker_count(&self) -> usize {
        self.searcher.worker_count()
    }

    pub fn metrics(&self) -> &SearchMetrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SearchError;
    use std::num::NonZeroUsize;
    use tempfile::tempdir;

    fn service_in(dir: &std::path::Path) -> MatchService {
        let config = SeqMatchConfig {
            sequence_path: dir.join("genome.txt"),
            worker_count: NonZeroUsize::new(2).unwrap(),
            ..SeqMatchConfig::default()
        };
        MatchService::from_config(&config).unwrap()
    }

    #[test]
    fn test_generate_then_search() {
        let dir = tempdir().unwrap();
        let service = service_in(dir.path());

        let generated = service.generate("AGCT", 2000).unwrap();
        assert_eq!(generated.length, 2000);
        assert_eq!(generated.path, dir.path().join("genome.txt"));

        let sequential = service.sequential_search("AGCT", "kmp").unwrap();
        let parallel = service.parallel_search("AGCT", "kmp", 7).unwrap();
        assert_eq!(sequential.match_indices, parallel.match_indices);
        assert_eq!(service.worker_count(), 2);
    }

    #[test]
    fn test_search_before_generate() {
        let dir = tempdir().unwrap();
        let service = service_in(dir.path());

        assert!(matches!(
            service.sequential_search("AGCT", "naive"),
            Err(SearchError::SequenceNotFound(_))
        ));
        assert!(matches!(
            service.parallel_search("AGCT", "naive", 2),
            Err(SearchError::SequenceNotFound(_))
        ));
    }

    #[test]
    fn test_metrics_are_shared() {
        let dir = tempdir().unwrap();
        let service = service_in(dir.path());

        service.generate("AC", 1000).unwrap();
        service.parallel_search("CA", "naive", 3).unwrap();

        let stats = service.metrics().get_stats();
        assert_eq!(stats.sequences_generated, 1);
        assert_eq!(stats.chunks_dispatched, 3);
        assert_eq!(stats.cache_hits, 1);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SeqMatchConfig {
            max_sequence_size: 0,
            ..SeqMatchConfig::default()
        };
        assert!(MatchService::from_config(&config).is_err());
    }
}
