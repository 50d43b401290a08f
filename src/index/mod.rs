//! The indexed-search collaborator queried by the pipeline.
//!
//! The pipeline only ever talks to an index through [`SeedIndex`], so any
//! back end able to answer exact-match queries can be plugged in. A
//! suffix-array implementation, [`SuffixIndex`], ships with the crate.
//!
//! ## Example
//!
//! ```rust,no_run
//! use kmer_locate::index::{SeedIndex, SuffixIndex};
//! use std::path::Path;
//!
//! let index = SuffixIndex::load_from_file(Path::new("reference.kdx")).unwrap();
//! let range = index.find(b"ACGTACGT");
//! if !range.is_empty() {
//!     for location in index.locate(&range, false) {
//!         println!("{location}");
//!     }
//! }
//! ```

use std::io::Read;
use std::path::Path;

use thiserror::Error;

use crate::core::types::{Location, MatchRange};

pub mod suffix;

pub use suffix::SuffixIndex;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Failed to read index: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to decode index: {0}")]
    DecodeError(#[from] bincode::Error),

    #[error("Corrupt index: {0}")]
    Corrupt(String),
}

/// Exact-match search over an indexed reference.
///
/// Lookups never fail: a pattern that matches nothing yields an empty range.
/// Implementations must not mutate themselves while answering queries.
pub trait SeedIndex {
    /// Deserialize an index from a stream
    ///
    /// # Errors
    ///
    /// Returns an `IndexError` if the stream is unreadable or malformed.
    fn load<R: Read>(reader: R) -> Result<Self, IndexError>
    where
        Self: Sized;

    /// Range of index positions matching `pattern`.
    ///
    /// Equal patterns always produce equal ranges.
    fn find(&self, pattern: &[u8]) -> MatchRange;

    /// Number of matching paths in a range; zero for an empty range
    fn count(&self, range: &MatchRange) -> u64;

    /// Resolve a range into concrete occurrences.
    ///
    /// With `dedup`, occurrences reported more than once are collapsed.
    fn locate(&self, range: &MatchRange, dedup: bool) -> Vec<Location>;

    /// Load an index from a file path
    ///
    /// # Errors
    ///
    /// Returns `IndexError::ReadError` if the file cannot be opened, or any
    /// error raised by [`SeedIndex::load`].
    fn load_from_file(path: &Path) -> Result<Self, IndexError>
    where
        Self: Sized,
    {
        let file = std::fs::File::open(path)?;
        Self::load(std::io::BufReader::new(file))
    }
}
