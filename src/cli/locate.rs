use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::cli::OutputFormat;
use crate::formats::locations::write_locations_file;
use crate::formats::sequences::read_sequence_file;
use crate::index::{SeedIndex, SuffixIndex};
use crate::query::{
    ProgressMonitor, QueryConfig, QueryMode, QueryPipeline, QueryStats, RunCounters,
};
use crate::seeding::{generate, SeedingStrategy};
use crate::utils::timer::{format_duration, timed};
use crate::utils::validation::{resolve_strategy, validate_seed_len};

#[derive(Args)]
pub struct LocateArgs {
    /// Sequence file, one sequence per line (gzip allowed, '-' for stdin)
    #[arg(required = true, value_name = "SEQ_FILE")]
    pub seq_file: PathBuf,

    /// Index file
    #[arg(short = 'g', long = "gcsa", value_name = "INDEX")]
    pub index: PathBuf,

    /// Seed length
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub seed_len: u32,

    /// Distance between seeds [default: seed length given by -l]
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..),
        conflicts_with = "non_overlapping"
    )]
    pub distance: Option<u32>,

    /// Greedy non-overlapping seeds: adjacent seeds plus one right-aligned
    /// seed covering the tail of each sequence
    #[arg(short = 'n', long)]
    pub non_overlapping: bool,

    /// Write positions where seeds are matched
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Find all seeds before locating them, or locate each as it is found
    #[arg(long, value_enum, default_value = "two-phase")]
    pub mode: QueryMode,

    /// Collapse duplicate occurrences of a seed
    #[arg(long)]
    pub dedup: bool,

    /// Also log progress every SECS seconds (SIGUSR1 always triggers a report)
    #[arg(long, value_name = "SECS")]
    pub progress_interval: Option<u64>,
}

/// Everything reported about a finished run
#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    seq_file: &'a Path,
    index: &'a Path,
    output: &'a Path,
    seed_len: usize,
    strategy: SeedingStrategy,
    mode: QueryMode,
    dedup: bool,
    sequences: usize,
    short_sequences: usize,
    #[serde(flatten)]
    stats: QueryStats,
}

/// Execute a locate run
///
/// # Errors
///
/// Returns an error if the parameters are invalid, the index or sequence
/// file cannot be loaded, or the output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: LocateArgs, format: OutputFormat) -> anyhow::Result<()> {
    let seed_len = validate_seed_len(args.seed_len as usize)?;
    let strategy = resolve_strategy(
        seed_len,
        args.distance.map(|d| d as usize),
        args.non_overlapping,
    )?;
    check_output_dir(&args.output)?;

    // Reports requested before the patterns exist show an unknown total.
    let counters = Arc::new(RunCounters::new());
    let monitor = ProgressMonitor::spawn(
        Arc::clone(&counters),
        args.progress_interval.map(Duration::from_secs),
    )
    .context("Failed to start progress monitor")?;

    info!("Loading index...");
    let (index, load_time) = timed(|| SuffixIndex::load_from_file(&args.index));
    let index =
        index.with_context(|| format!("Failed to load index '{}'", args.index.display()))?;
    info!(
        "Loaded index with {} contigs in {}.",
        index.contigs().len(),
        format_duration(load_time)
    );

    info!("Loading sequences...");
    let (sequences, read_time) = timed(|| read_sequence_file(&args.seq_file));
    let sequences = sequences.with_context(|| {
        format!("Failed to read sequences from '{}'", args.seq_file.display())
    })?;
    info!(
        "Loaded {} sequences in {}.",
        sequences.len(),
        format_duration(read_time)
    );

    let short_sequences = sequences.iter().filter(|s| s.len() < seed_len).count();
    if short_sequences > 0 {
        info!("{short_sequences} sequences are shorter than the seed length and yield no seeds");
    }

    info!("Generating patterns...");
    let (patterns, seed_time) =
        timed(|| generate(&sequences, seed_len, strategy).collect::<Vec<_>>());
    info!(
        "Generated {} patterns ({strategy} seeding) in {}.",
        patterns.len(),
        format_duration(seed_time)
    );

    info!("Locating patterns...");
    let config = QueryConfig {
        mode: args.mode,
        dedup: args.dedup,
    };
    let pipeline = QueryPipeline::with_counters(&index, config, counters);
    let outcome = pipeline.run(&patterns);
    drop(monitor);
    info!(
        "Located {} occurrences in {}.",
        outcome.stats.occurrences,
        format_duration(outcome.stats.locate_time)
    );

    write_locations_file(&args.output, &outcome.locations)
        .with_context(|| format!("Failed to write output '{}'", args.output.display()))?;

    let summary = RunSummary {
        seq_file: &args.seq_file,
        index: &args.index,
        output: &args.output,
        seed_len,
        strategy,
        mode: args.mode,
        dedup: args.dedup,
        sequences: sequences.len(),
        short_sequences,
        stats: outcome.stats,
    };

    match format {
        OutputFormat::Text => print_text_summary(&summary),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    Ok(())
}

/// Fail before any work if the output could never be created
fn check_output_dir(output: &Path) -> anyhow::Result<()> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            anyhow::bail!("Output directory '{}' does not exist", parent.display());
        }
    }
    Ok(())
}

fn print_text_summary(summary: &RunSummary<'_>) {
    let stats = &summary.stats;
    println!("Sequences:        {}", summary.sequences);
    println!("Seeding:          {} (k = {})", summary.strategy, summary.seed_len);
    println!("Patterns:         {}", stats.patterns);
    println!("Matched patterns: {}", stats.matched_patterns);
    println!("Matching paths:   {}", stats.paths);
    println!("Occurrences:      {}", stats.occurrences);
    if let Some(find_time) = stats.find_time {
        println!("Find time:        {}", format_duration(find_time));
    }
    println!("Locate time:      {}", format_duration(stats.locate_time));
    println!("Output:           {}", summary.output.display());
}
