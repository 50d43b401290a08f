//! Command-line interface for kmer-locate.
//!
//! The tool takes a sequence file, cuts every sequence into seeds of a fixed
//! length, looks each seed up in an index and writes every occurrence found.
//!
//! ## Usage
//!
//! ```text
//! # Adjacent 32-mers of every read
//! kmer-locate reads.txt -g reference.kdx -l 32 -o hits.tsv
//!
//! # Every 32-mer (seeds one base apart)
//! kmer-locate reads.txt -g reference.kdx -l 32 -d 1 -o hits.tsv
//!
//! # Adjacent 32-mers, plus a right-aligned last seed covering each read's tail
//! kmer-locate reads.txt -g reference.kdx -l 32 -n -o hits.tsv
//!
//! # Ask a running job for its progress
//! kill -USR1 <pid>
//! ```

use clap::Parser;

pub mod locate;

#[derive(Parser)]
#[command(name = "kmer-locate")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Locate k-mers of a set of sequences in an indexed reference")]
#[command(
    long_about = "kmer-locate extracts fixed-length seeds (k-mers) from every sequence of a file and locates them in a precomputed index.\n\nEach occurrence is written as one 'contig_id<TAB>offset' line. Send SIGUSR1 to a running job to log its progress."
)]
pub struct Cli {
    #[command(flatten)]
    pub locate: locate::LocateArgs,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Format of the run summary printed on completion
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_minimal_arguments() {
        let cli = Cli::try_parse_from([
            "kmer-locate",
            "reads.txt",
            "-g",
            "ref.kdx",
            "-l",
            "16",
            "-o",
            "out.tsv",
        ])
        .unwrap();
        assert_eq!(cli.locate.seed_len, 16);
        assert_eq!(cli.locate.distance, None);
        assert!(!cli.locate.non_overlapping);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_distance_conflicts_with_non_overlapping() {
        let result = Cli::try_parse_from([
            "kmer-locate",
            "reads.txt",
            "--gcsa",
            "ref.kdx",
            "--seed-len",
            "16",
            "--output",
            "out.tsv",
            "--distance",
            "4",
            "--non-overlapping",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_seed_len_rejected() {
        let result = Cli::try_parse_from([
            "kmer-locate",
            "reads.txt",
            "-g",
            "ref.kdx",
            "-l",
            "0",
            "-o",
            "out.tsv",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_index_rejected() {
        let result =
            Cli::try_parse_from(["kmer-locate", "reads.txt", "-l", "16", "-o", "out.tsv"]);
        assert!(result.is_err());
    }
}
