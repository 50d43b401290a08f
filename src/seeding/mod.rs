//! Seed extraction from input sequences.
//!
//! A seeding strategy partitions each sequence into fixed-length substrings
//! (k-mers) that are then looked up in the index:
//!
//! - **Greedy overlapping**: every k-mer, one position apart
//! - **Non-overlapping**: k-mers at `0, k, 2k, ...`, a short tail is dropped
//! - **Greedy non-overlapping**: like non-overlapping, plus one right-aligned
//!   k-mer so the tail of the sequence is always covered
//! - **Distance**: k-mers at a fixed step, the general form of the first two
//!
//! No seed is ever shorter than `k`, and a sequence shorter than `k` yields
//! no seeds under any strategy.
//!
//! ## Example
//!
//! ```rust
//! use kmer_locate::seeding::{generate, SeedingStrategy};
//!
//! let sequences = [b"ACGTACGT".as_slice()];
//! let seeds: Vec<&[u8]> = generate(&sequences, 4, SeedingStrategy::NonOverlapping).collect();
//! assert_eq!(seeds, vec![b"ACGT".as_slice(), b"ACGT".as_slice()]);
//! ```

use std::iter::{Chain, StepBy};
use std::ops::Range;

use serde::Serialize;

use crate::core::types::Pattern;

/// Policy for partitioning a sequence into seeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedingStrategy {
    /// Every k-mer of the sequence (step 1)
    GreedyOverlapping,
    /// Adjacent k-mers (step k); residue shorter than k is dropped
    NonOverlapping,
    /// Adjacent k-mers plus one final k-mer anchored at `len - k`
    GreedyNonOverlapping,
    /// k-mers spaced `step` positions apart
    Distance(usize),
}

impl SeedingStrategy {
    /// Strategy for a given distance between seed starts.
    ///
    /// Distances of 1 and `k` map onto the named strategies so that logs and
    /// summaries report them by name.
    #[must_use]
    pub fn from_distance(seed_len: usize, distance: usize) -> Self {
        if distance == 1 {
            Self::GreedyOverlapping
        } else if distance == seed_len {
            Self::NonOverlapping
        } else {
            Self::Distance(distance)
        }
    }

    /// Distance between consecutive seed starts, `k` for the greedy
    /// non-overlapping strategy (its final seed excepted)
    #[must_use]
    pub fn step(&self, seed_len: usize) -> usize {
        match self {
            Self::GreedyOverlapping => 1,
            Self::NonOverlapping | Self::GreedyNonOverlapping => seed_len,
            Self::Distance(step) => *step,
        }
    }
}

impl std::fmt::Display for SeedingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GreedyOverlapping => write!(f, "greedy overlapping"),
            Self::NonOverlapping => write!(f, "non-overlapping"),
            Self::GreedyNonOverlapping => write!(f, "greedy non-overlapping"),
            Self::Distance(step) => write!(f, "distance {step}"),
        }
    }
}

/// Iterator over seed start offsets within one sequence
pub type SeedOffsets = Chain<StepBy<Range<usize>>, std::option::IntoIter<usize>>;

/// Start offsets of the seeds of a sequence of length `len`.
///
/// Offsets are strictly increasing except for the right-aligned tail seed of
/// the greedy non-overlapping strategy, which may overlap its predecessor.
#[must_use]
pub fn seed_offsets(len: usize, k: usize, strategy: SeedingStrategy) -> SeedOffsets {
    let step = strategy.step(k);

    // `len - k + 1` would wrap for short sequences, so guard it first.
    if k == 0 || step == 0 || len < k {
        return (0..0).step_by(1).chain(None);
    }

    let last = len - k;
    match strategy {
        SeedingStrategy::GreedyNonOverlapping => (0..last).step_by(step).chain(Some(last)),
        _ => (0..last + 1).step_by(step).chain(None),
    }
}

/// Seeds of a single sequence, left to right
pub fn seeds(
    sequence: &[u8],
    k: usize,
    strategy: SeedingStrategy,
) -> impl Iterator<Item = Pattern<'_>> {
    seed_offsets(sequence.len(), k, strategy).map(move |i| &sequence[i..i + k])
}

/// Seeds of every sequence in input order.
///
/// The iterator is lazy; patterns borrow from `sequences`.
pub fn generate<'a, S>(
    sequences: &'a [S],
    k: usize,
    strategy: SeedingStrategy,
) -> impl Iterator<Item = Pattern<'a>>
where
    S: AsRef<[u8]>,
{
    sequences
        .iter()
        .flat_map(move |sequence| seeds(sequence.as_ref(), k, strategy))
}

/// Number of seeds `strategy` produces for a sequence of length `len`
#[must_use]
pub fn seed_count(len: usize, k: usize, strategy: SeedingStrategy) -> usize {
    seed_offsets(len, k, strategy).count()
}
