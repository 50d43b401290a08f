//! # kmer-locate
//!
//! A library for anchoring sequencing reads in an indexed reference by exact
//! k-mer matches.
//!
//! Alignment against a reference (linear or graph) usually starts from short
//! exact matches. `kmer-locate` cuts every input sequence into fixed-length
//! seeds, looks each seed up in an index and resolves the matches into
//! concrete `(contig_id, offset)` occurrences.
//!
//! ## Features
//!
//! - **Seeding strategies**: overlapping, non-overlapping, greedy
//!   non-overlapping (full tail coverage) and fixed-distance seeds
//! - **Pluggable index**: any back end implementing [`SeedIndex`]; a
//!   suffix-array index is included
//! - **Two-phase or streaming queries**: find all seeds then locate, or
//!   locate each seed as it is found
//! - **Progress on demand**: `SIGUSR1` logs done/total, occurrences and
//!   elapsed time without pausing the run
//!
//! ## Example
//!
//! ```rust
//! use kmer_locate::{generate, QueryConfig, QueryPipeline, SeedingStrategy, SuffixIndex};
//!
//! let index = SuffixIndex::from_contigs(vec![(3u64, "chr3", "GGACGTACGTCC")]);
//! let reads = vec![b"ACGTACGT".to_vec()];
//! let patterns: Vec<&[u8]> = generate(&reads, 4, SeedingStrategy::GreedyOverlapping).collect();
//!
//! let outcome = QueryPipeline::new(&index, QueryConfig::default()).run(&patterns);
//! for location in &outcome.locations {
//!     println!("{location}");
//! }
//! ```
//!
//! ## Modules
//!
//! - [`seeding`]: Seed extraction strategies
//! - [`index`]: Index interface and the suffix-array back end
//! - [`query`]: Query pipeline, run counters and progress reporting
//! - [`formats`]: Sequence file reader and location writer
//! - [`core`]: Shared data types
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod formats;
pub mod index;
pub mod query;
pub mod seeding;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::types::*;
pub use index::{IndexError, SeedIndex, SuffixIndex};
pub use query::{QueryConfig, QueryMode, QueryOutcome, QueryPipeline, RunCounters};
pub use seeding::{generate, SeedingStrategy};
