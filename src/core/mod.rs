//! Core data types shared by the seeding, index and query layers.
//!
//! - [`Pattern`]: a seed queued for lookup, borrowed from its sequence
//! - [`MatchRange`]: opaque handle for the index positions matching a pattern
//! - [`Location`]: one concrete `(contig_id, offset)` occurrence

pub mod types;

pub use types::{Location, MatchRange, Pattern};
