pub mod config;
pub mod errors;
pub mod host;
pub mod metrics;
pub mod results;
pub mod search;
pub mod service;
pub mod store;

pub use config::{ConfigOverrides, SeqMatchConfig};
pub use errors::{SearchError, SearchResult};
pub use host::HostInfo;
pub use metrics::{SearchMetrics, SearchStats};
pub use results::MatchResult;
pub use search::{Algorithm, AlgorithmOptions, MatchRequest, ParallelSearcher};
pub use service::{GeneratedSequence, MatchService};
pub use store::{SequenceHandle, SequenceStore};
