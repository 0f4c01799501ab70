use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::errors::{SearchError, SearchResult};

/// Default location of the persisted benchmark sequence
pub const DEFAULT_SEQUENCE_PATH: &str = "genome_data.txt";

/// Largest sequence `generate` accepts unless configured otherwise
pub const DEFAULT_MAX_SEQUENCE_SIZE: usize = 200_000_000;

/// Extra symbols the suffix-array comparator looks at beyond the pattern length
pub const DEFAULT_SUFFIX_COMPARE_SLACK: usize = 50;

/// Runtime configuration for generation and search.
///
/// # Configuration Locations
///
/// Loaded from the following files, later entries overriding earlier ones:
/// 1. Global `$HOME/.config/seqmatch/config.yaml`
/// 2. Local `.seqmatch.yaml` in the current directory
/// 3. Custom config file specified via `--config`
///
/// # Configuration Format
///
/// ```yaml
/// # Where the generated sequence is persisted
/// sequence_path: "genome_data.txt"
///
/// # Upper bound accepted by `generate`
/// max_sequence_size: 200000000
///
/// # Worker pool size for parallel search (independent of chunk count)
/// worker_count: 4
///
/// # Suffix-array comparator bound beyond the pattern length
/// suffix_compare_slack: 50
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "warn"
/// ```
///
/// Every key is optional. Command-line flags take precedence over file
/// values, see [`SeqMatchConfig::merge_with_cli`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeqMatchConfig {
    /// Flat file holding the raw generated symbols
    #[serde(default = "default_sequence_path")]
    pub sequence_path: PathBuf,

    /// Maximum number of symbols `generate` will produce
    #[serde(default = "default_max_sequence_size")]
    pub max_sequence_size: usize,

    /// Number of threads in the parallel search pool
    #[serde(default = "default_worker_count")]
    pub worker_count: NonZeroUsize,

    /// Suffix comparisons stop after `pattern_len + suffix_compare_slack` symbols
    #[serde(default = "default_suffix_compare_slack")]
    pub suffix_compare_slack: usize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_sequence_path() -> PathBuf {
    PathBuf::from(DEFAULT_SEQUENCE_PATH)
}

fn default_max_sequence_size() -> usize {
    DEFAULT_MAX_SEQUENCE_SIZE
}

fn default_worker_count() -> NonZeroUsize {
    NonZeroUsize::new(4).unwrap()
}

fn default_suffix_compare_slack() -> usize {
    DEFAULT_SUFFIX_COMPARE_SLACK
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SeqMatchConfig {
    fn default() -> Self {
        Self {
            sequence_path: default_sequence_path(),
            max_sequence_size: default_max_sequence_size(),
            worker_count: default_worker_count(),
            suffix_compare_slack: default_suffix_compare_slack(),
            log_level: default_log_level(),
        }
    }
}

/// Values supplied on the command line; `None` keeps the file value
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub sequence_path: Option<PathBuf>,
    pub worker_count: Option<NonZeroUsize>,
    pub log_level: Option<String>,
}

impl SeqMatchConfig {
    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration from a specific file
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        // An explicit path that does not exist is a mistake, not a default
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.display().to_string()));
            }
        }

        let mut builder = ConfigBuilder::builder();

        let config_files = [
            dirs::config_dir().map(|p| p.join("seqmatch/config.yaml")),
            Some(PathBuf::from(".seqmatch.yaml")),
            config_path.map(PathBuf::from),
        ];

        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli: ConfigOverrides) -> Self {
        if let Some(path) = cli.sequence_path {
            self.sequence_path = path;
        }
        if let Some(workers) = cli.worker_count {
            self.worker_count = workers;
        }
        if let Some(level) = cli.log_level {
            self.log_level = level;
        }
        self
    }

    /// Rejects values no operation could work with
    pub fn validate(&self) -> SearchResult<()> {
        if self.max_sequence_size == 0 {
            return Err(SearchError::config_error(
                "max_sequence_size must be greater than zero",
            ));
        }
        if self.sequence_path.as_os_str().is_empty() {
            return Err(SearchError::config_error("sequence_path must not be empty"));
        }
        Ok(())
    }
}
