//! Sequence store: generates, persists and caches the benchmark sequence.
//!
//! The store owns a single slot holding at most one materialized sequence.
//! Each successful `generate` produces a new version that replaces the slot
//! in one swap, after the file on disk has been fully written. Readers
//! either see the previous version or the new one, never a partial write.
//!
//! ```rust,ignore
//! let store = SequenceStore::new("genome_data.txt", 200_000_000);
//! let handle = store.generate("AGCT", 1_000_000)?;
//! assert_eq!(store.read()?.version(), handle.version());
//! ```
mod generator;

pub use generator::{
    derive_alphabet, generate_sequence, injection_points, validate_pattern, FIXED_SEED,
};

use memmap2::Mmap;
use parking_lot::{Mutex, RwLock};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::SeqMatchConfig;
use crate::errors::{SearchError, SearchResult};
use crate::metrics::SearchMetrics;

/// Backing bytes: freshly generated, or mapped from a file written by rename
#[derive(Debug)]
enum SequenceData {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

impl SequenceData {
    fn as_bytes(&self) -> &[u8] {
        match self {
            SequenceData::Owned(data) => data,
            SequenceData::Mapped(mmap) => mmap,
        }
    }
}

#[derive(Debug)]
struct Sequence {
    data: SequenceData,
    version: u64,
    path: PathBuf,
}

/// Shared, immutable view of one materialized sequence
#[derive(Debug, Clone)]
pub struct SequenceHandle {
    inner: Arc<Sequence>,
}

impl SequenceHandle {
    fn new(data: SequenceData, version: u64, path: PathBuf) -> Self {
        Self {
            inner: Arc::new(Sequence {
                data,
                version,
                path,
            }),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.inner.data.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// Whether the bytes are served from a memory map of the file
    pub fn is_mapped(&self) -> bool {
        matches!(self.inner.data, SequenceData::Mapped(_))
    }

    /// Monotonic version assigned when the sequence entered the store
    pub fn version(&self) -> u64 {
        self.inner.version
    }

    /// File the sequence was persisted to or loaded from
    pub fn path(&self) -> &Path {
        &self.inner.path
    }
}

/// Holds zero or one sequence, mirrored to a flat file
#[derive(Debug)]
pub struct SequenceStore {
    path: PathBuf,
    max_size: usize,
    slot: RwLock<Option<SequenceHandle>>,
    // Serializes writers (generate and disk loads); readers only touch `slot`
    write_lock: Mutex<()>,
    next_version: AtomicU64,
    metrics: SearchMetrics,
}

impl SequenceStore {
    /// Creates an empty store persisting to `path`
    pub fn new(path: impl Into<PathBuf>, max_size: usize) -> Self {
        Self::with_metrics(path, max_size, SearchMetrics::new())
    }

    /// Creates an empty store reporting into the given metrics
    pub fn with_metrics(path: impl Into<PathBuf>, max_size: usize, metrics: SearchMetrics) -> Self {
        Self {
            path: path.into(),
            max_size,
            slot: RwLock::new(None),
            write_lock: Mutex::new(()),
            next_version: AtomicU64::new(1),
            metrics,
        }
    }

    pub fn from_config(config: &SeqMatchConfig, metrics: SearchMetrics) -> Self {
        Self::with_metrics(&config.sequence_path, config.max_sequence_size, metrics)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn metrics(&self) -> &SearchMetrics {
        &self.metrics
    }

    /// Version of the cached sequence, if one is in memory
    pub fn current_version(&self) -> Option<u64> {
        self.slot.read().as_ref().map(SequenceHandle::version)
    }

    /// Generates `size` symbols from `pattern`'s alphabet, persists them and
    /// makes them the current sequence.
    ///
    /// Parameters are validated before anything is touched. If writing the
    /// file fails the previously cached sequence stays current.
    pub fn generate(&self, pattern: &str, size: usize) -> SearchResult<SequenceHandle> {
        if size == 0 || size > self.max_size {
            return Err(SearchError::invalid_size(size, self.max_size));
        }
        validate_pattern(pattern)?;

        info!(
            "Generating {} symbol sequence from pattern '{}'",
            size, pattern
        );

        let _guard = self.write_lock.lock();
        let data = generate_sequence(pattern, size)?;
        self.persist(&data)?;

        let version = self.next_version.fetch_add(1, Ordering::SeqCst);
        let handle = SequenceHandle::new(SequenceData::Owned(data), version, self.path.clone());
        *self.slot.write() = Some(handle.clone());

        self.metrics.record_generation(size as u64);
        info!(
            "Sequence v{} cached in memory and saved to {}",
            version,
            self.path.display()
        );
        Ok(handle)
    }

    /// Returns the current sequence.
    ///
    /// Served from memory when cached; otherwise a sequence persisted by an
    /// earlier process is loaded from disk. Fails with `SequenceNotFound`
    /// when nothing has ever been generated at this path.
    pub fn read(&self) -> SearchResult<SequenceHandle> {
        if let Some(handle) = self.slot.read().clone() {
            self.metrics.record_cache_operation(true);
            return Ok(handle);
        }

        let _guard = self.write_lock.lock();
        // A generate may have completed while we waited
        if let Some(handle) = self.slot.read().clone() {
            self.metrics.record_cache_operation(true);
            return Ok(handle);
        }

        if !self.path.exists() {
            return Err(SearchError::sequence_not_found(&self.path));
        }

        debug!("Cache miss: loading sequence from {}", self.path.display());
        let data = load_sequence(&self.path)?;
        let version = self.next_version.fetch_add(1, Ordering::SeqCst);
        let handle = SequenceHandle::new(data, version, self.path.clone());
        *self.slot.write() = Some(handle.clone());

        self.metrics.record_cache_operation(false);
        Ok(handle)
    }

    /// Writes the sequence next to its final path, then renames it into place
    fn persist(&self, data: &[u8]) -> SearchResult<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
        tmp.write_all(data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| SearchError::IoError(e.error))?;

        debug!("Persisted {} bytes to {}", data.len(), self.path.display());
        Ok(())
    }
}

fn load_sequence(path: &Path) -> SearchResult<SequenceData> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SearchError::sequence_not_found(path),
        _ => SearchError::IoError(e),
    })?;

    if file.metadata()?.len() == 0 {
        return Ok(SequenceData::Owned(Vec::new()));
    }

    // Writers replace the file by rename, so a mapping never sees it change
    let mmap = unsafe { Mmap::map(&file) }.map_err(SearchError::IoError)?;
    Ok(SequenceData::Mapped(mmap))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use tempfile::tempdir;

    #[test]
    fn test_read_before_generate_fails() {
        let dir = tempdir().unwrap();
        let store = SequenceStore::new(dir.path().join("seq.txt"), 10_000);
        assert!(matches!(
            store.read(),
            Err(SearchError::SequenceNotFound(_))
        ));
        assert_eq!(store.current_version(), None);
    }

    #[test]
    fn test_generate_then_read_from_memory() {
        let dir = tempdir().unwrap();
        let store = SequenceStore::new(dir.path().join("seq.txt"), 10_000);

        let generated = store.generate("AGCT", 2000).unwrap();
        let read = store.read().unwrap();

        assert_eq!(read.version(), generated.version());
        assert_eq!(read.as_bytes(), generated.as_bytes());
        assert_eq!(read.len(), 2000);
        assert_eq!(store.metrics().cache_hits(), 1);
        assert_eq!(store.metrics().cache_misses(), 0);
    }

    #[test]
    fn test_file_holds_raw_symbols_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seq.txt");
        let store = SequenceStore::new(&path, 10_000);

        let handle = store.generate("acgt", 1500).unwrap();
        let on_disk = std::fs::read(&path).unwrap();

        assert_eq!(on_disk, handle.as_bytes());
        assert!(on_disk.iter().all(|b| b"ACGT".contains(b)));
    }

    #[test]
    fn test_regeneration_replaces_sequence() {
        let dir = tempdir().unwrap();
        let store = SequenceStore::new(dir.path().join("seq.txt"), 10_000);

        let first = store.generate("AC", 3000).unwrap();
        let second = store.generate("GT", 1200).unwrap();

        assert!(second.version() > first.version());
        let current = store.read().unwrap();
        assert_eq!(current.version(), second.version());
        assert_eq!(current.len(), 1200);
        assert!(current.as_bytes().iter().all(|b| b"GT".contains(b)));
        // Old handles stay valid for readers that captured them
        assert_eq!(first.len(), 3000);
    }

    #[test]
    fn test_invalid_parameters_leave_cache_untouched() {
        let dir = tempdir().unwrap();
        let store = SequenceStore::new(dir.path().join("seq.txt"), 5000);
        let original = store.generate("AGCT", 2000).unwrap();

        assert!(matches!(
            store.generate("AGCT", 0),
            Err(SearchError::InvalidSize { .. })
        ));
        assert!(matches!(
            store.generate("AGCT", 5001),
            Err(SearchError::InvalidSize { .. })
        ));
        assert!(matches!(
            store.generate("", 100),
            Err(SearchError::InvalidPattern(_))
        ));

        assert_eq!(store.current_version(), Some(original.version()));
    }

    #[test]
    fn test_non_ascii_pattern_leaves_file_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seq.txt");
        let store = SequenceStore::new(&path, 5000);

        assert!(matches!(
            store.generate("ä", 64),
            Err(SearchError::InvalidPattern(_))
        ));
        assert!(!path.exists());
        assert_eq!(store.current_version(), None);

        let original = store.generate("AGCT", 1500).unwrap();
        assert!(matches!(
            store.generate("AGCTé", 64),
            Err(SearchError::InvalidPattern(_))
        ));
        assert_eq!(store.current_version(), Some(original.version()));

        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert_eq!(on_disk.as_bytes(), original.as_bytes());
    }

    #[test]
    fn test_failed_write_keeps_previous_sequence() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, b"file").unwrap();

        // Parent of the target path is a regular file, so persisting fails
        let store = SequenceStore::new(blocker.join("seq.txt"), 5000);
        assert!(matches!(
            store.generate("AGCT", 100),
            Err(SearchError::IoError(_))
        ));
        assert_eq!(store.current_version(), None);
    }

    #[test]
    fn test_new_store_loads_persisted_sequence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seq.txt");

        let generated = SequenceStore::new(&path, 10_000)
            .generate("AGCT", 4000)
            .unwrap();

        let fresh = SequenceStore::new(&path, 10_000);
        let loaded = fresh.read().unwrap();
        assert_eq!(loaded.as_bytes(), generated.as_bytes());
        assert!(loaded.is_mapped());
        assert!(!generated.is_mapped());
        assert_eq!(fresh.metrics().cache_misses(), 1);

        fresh.read().unwrap();
        assert_eq!(fresh.metrics().cache_hits(), 1);
    }

    #[test]
    fn test_mapped_sequence_survives_regeneration() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seq.txt");
        let writer = SequenceStore::new(&path, 10_000);
        let original = writer.generate("AC", 4000).unwrap();

        let mapped = SequenceStore::new(&path, 10_000).read().unwrap();
        assert!(mapped.is_mapped());

        writer.generate("GT", 2500).unwrap();

        assert_eq!(mapped.len(), 4000);
        assert_eq!(mapped.as_bytes(), original.as_bytes());
        assert_eq!(std::fs::read(&path).unwrap().len(), 2500);
    }

    #[test]
    fn test_empty_file_loads_as_empty_sequence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seq.txt");
        std::fs::write(&path, b"").unwrap();

        let loaded = SequenceStore::new(&path, 10_000).read().unwrap();
        assert!(loaded.is_empty());
        assert!(!loaded.is_mapped());
    }

    #[test]
    fn test_idempotent_generation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seq.txt");
        let store = SequenceStore::new(&path, 100_000);

        store.generate("AGCT", 50_000).unwrap();
        let first = std::fs::read(&path).unwrap();
        store.generate("AGCT", 50_000).unwrap();
        let second = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_concurrent_readers_see_whole_versions() {
        let dir = tempdir().unwrap();
        let store = Arc::new(SequenceStore::new(dir.path().join("seq.txt"), 100_000));
        store.generate("AC", 20_000).unwrap();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..50 {
                        let handle = store.read().unwrap();
                        let expected = if handle.len() == 20_000 { b"AC" } else { b"GT" };
                        assert!(handle.as_bytes().iter().all(|b| expected.contains(b)));
                    }
                })
            })
            .collect();

        for _ in 0..3 {
            store.generate("GT", 10_000).unwrap();
            store.generate("AC", 20_000).unwrap();
        }

        for reader in readers {
            reader.join().unwrap();
        }
    }
}
