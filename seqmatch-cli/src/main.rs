use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use seqmatch::{
    ConfigOverrides, GeneratedSequence, MatchResult, MatchService, SearchError, SeqMatchConfig,
};
use std::{num::NonZeroUsize, path::PathBuf, time::Duration};
use tracing::debug;
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, SearchError>;

/// Positions listed in human output before eliding the rest
const POSITION_PREVIEW: usize = 10;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Sequence file to generate into and search from
    #[arg(long, global = true)]
    sequence: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic sequence from a pattern's alphabet
    Generate {
        /// Pattern whose symbols form the alphabet; also injected at fixed offsets
        #[arg(short = 'p', long)]
        pattern: String,

        /// Number of symbols to generate
        #[arg(short = 'n', long, default_value = "1000000")]
        size: usize,
    },

    /// Search the current sequence with one algorithm
    Search {
        /// Pattern to search for
        #[arg(short = 'p', long)]
        pattern: String,

        /// Algorithm (naive|instrumented|kmp|bm|suffix|nucleotide)
        #[arg(short = 'a', long, default_value = "naive")]
        algorithm: String,
    },

    /// Search the current sequence in overlapping chunks on a worker pool
    Parallel {
        /// Pattern to search for
        #[arg(short = 'p', long)]
        pattern: String,

        /// Algorithm (naive|instrumented|kmp|bm|suffix|nucleotide)
        #[arg(short = 'a', long, default_value = "naive")]
        algorithm: String,

        /// Number of chunks to split the sequence into
        #[arg(short = 'k', long)]
        chunks: usize,

        /// Worker threads (defaults to the configured worker count)
        #[arg(short = 'j', long)]
        threads: Option<NonZeroUsize>,
    },

    /// Run every algorithm once and report them side by side
    Compare {
        /// Pattern to search for
        #[arg(short = 'p', long)]
        pattern: String,
    },
}

fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(e) = run(cli) {
        if json {
            if let Ok(rendered) = to_json(&MatchResult::failure(e.to_string())) {
                println!("{}", rendered);
            }
        }
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let threads = match &cli.command {
        Commands::Parallel { threads, .. } => *threads,
        _ => None,
    };

    let config = SeqMatchConfig::load_from(cli.config.as_deref())?.merge_with_cli(ConfigOverrides {
        sequence_path: cli.sequence,
        worker_count: threads,
        log_level: cli.log_level,
    });
    init_tracing(&config.log_level);
    debug!("Effective configuration: {:?}", config);

    let service = MatchService::from_config(&config)?;

    match cli.command {
        Commands::Generate { pattern, size } => {
            let generated = generate_with_spinner(&service, &pattern, size, cli.json)?;
            if cli.json {
                let summary = serde_json::json!({
                    "path": generated.path,
                    "length": generated.length,
                });
                println!("{}", to_json(&summary)?);
            } else {
                println!(
                    "Generated {} symbols into {}",
                    generated.length.to_string().green(),
                    generated.path.display().to_string().blue()
                );
            }
        }
        Commands::Search { pattern, algorithm } => {
            let result = service.sequential_search(&pattern, &algorithm)?;
            print_result(&result, cli.json)?;
        }
        Commands::Parallel {
            pattern,
            algorithm,
            chunks,
            threads: _,
        } => {
            let result = service.parallel_search(&pattern, &algorithm, chunks)?;
            print_result(&result, cli.json)?;
        }
        Commands::Compare { pattern } => {
            let results = service.compare(&pattern)?;
            if cli.json {
                println!("{}", to_json(&results)?);
            } else {
                print_comparison(&results);
            }
        }
    }

    service.metrics().log_stats();
    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn generate_with_spinner(
    service: &MatchService,
    pattern: &str,
    size: usize,
    quiet: bool,
) -> Result<GeneratedSequence> {
    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Generating {} symbols", size));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let generated = service.generate(pattern, size);
    spinner.finish_and_clear();
    generated
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| SearchError::IoError(e.into()))
}

fn print_result(result: &MatchResult, json: bool) -> Result<()> {
    if json {
        println!("{}", to_json(result)?);
        return Ok(());
    }

    println!("{}", result.algorithm.bold().blue());
    println!(
        "  Found {} matches ({} symbols, pattern length {})",
        result.match_count().to_string().green(),
        result.text_length,
        result.pattern_length
    );
    println!(
        "  Time: {}",
        humantime::format_duration(result.execution_time())
    );
    if let Some(overhead) = result.overhead_time() {
        println!("  Construction: {}", humantime::format_duration(overhead));
    }
    if let Some(comparisons) = result.comparison_count {
        println!("  Comparisons: {}", comparisons);
    }
    if let Some(host) = &result.host {
        let memory = host
            .total_memory_mb
            .map(|mb| format!(", {} MB", mb))
            .unwrap_or_default();
        println!(
            "  Host: {} cores, {}/{}{}",
            host.available_cores, host.operating_system, host.cpu_architecture, memory
        );
    }

    if !result.match_indices.is_empty() {
        let preview: Vec<String> = result
            .match_indices
            .iter()
            .take(POSITION_PREVIEW)
            .map(|p| p.to_string())
            .collect();
        let more = result.match_count().saturating_sub(POSITION_PREVIEW);
        if more > 0 {
            println!("  Positions: {} ... (+{} more)", preview.join(", "), more);
        } else {
            println!("  Positions: {}", preview.join(", "));
        }
    }
    Ok(())
}

fn print_comparison(results: &[MatchResult]) {
    for result in results {
        match &result.error_message {
            Some(message) => println!(
                "{:<28} {} {}",
                result.algorithm,
                "failed:".red(),
                message
            ),
            None => println!(
                "{:<28} {:>8} matches  {}",
                result.algorithm,
                result.match_count(),
                humantime::format_duration(result.execution_time())
            ),
        }
    }
}
