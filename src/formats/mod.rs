//! Plain-text input and output formats.
//!
//! - **Sequence files**: one sequence per line, optionally gzip-compressed
//! - **Location files**: tab-separated `contig_id`, `offset` per occurrence
//!
//! ## Example
//!
//! ```rust,no_run
//! use kmer_locate::core::types::Location;
//! use kmer_locate::formats::locations::write_locations_file;
//! use kmer_locate::formats::sequences::read_sequence_file;
//! use std::path::Path;
//!
//! let reads = read_sequence_file(Path::new("reads.txt")).unwrap();
//! write_locations_file(Path::new("hits.tsv"), &[Location::new(3, 10)]).unwrap();
//! ```

pub mod locations;
pub mod sequences;
