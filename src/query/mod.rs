//! Seed lookup and location resolution against an index.
//!
//! - [`QueryPipeline`]: runs `find`, `count` and `locate` for every pattern
//! - [`RunCounters`]: progress shared with an out-of-band observer
//! - [`ProgressMonitor`]: logs progress reports on request
//!
//! ## Modes
//!
//! In **two-phase** mode (the default) every pattern is looked up first and
//! the non-empty ranges are kept; all of them are then located in a second
//! pass. In **streaming** mode each pattern is located right after its
//! lookup. Both modes produce the same locations in the same order.
//!
//! ## Example
//!
//! ```rust
//! use kmer_locate::index::SuffixIndex;
//! use kmer_locate::query::{QueryConfig, QueryPipeline};
//! use kmer_locate::seeding::{generate, SeedingStrategy};
//!
//! let index = SuffixIndex::from_contigs(vec![(0u64, "chr1", "ACGTACGTTT")]);
//! let reads = vec![b"ACGTACGT".to_vec()];
//! let patterns: Vec<&[u8]> = generate(&reads, 4, SeedingStrategy::NonOverlapping).collect();
//!
//! let outcome = QueryPipeline::new(&index, QueryConfig::default()).run(&patterns);
//! assert_eq!(outcome.locations.len(), 4);
//! ```

pub mod pipeline;
pub mod progress;

pub use pipeline::{QueryConfig, QueryMode, QueryOutcome, QueryPipeline, QueryStats};
pub use progress::{ProgressMonitor, ProgressReport, RunCounters};
