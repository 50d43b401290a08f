//! Centralized validation of run parameters.

use crate::seeding::SeedingStrategy;

/// Seeds longer than this are almost certainly a typo on the command line
pub const MAX_SEED_LEN: usize = 1 << 20;

/// Parameter validation error types
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Seed length must be at least 1")]
    ZeroSeedLength,
    #[error("Seed length {0} exceeds maximum of {MAX_SEED_LEN}")]
    SeedLengthTooLarge(usize),
    #[error("Distance between seeds must be at least 1")]
    ZeroDistance,
    #[error("A seed distance cannot be combined with non-overlapping seeding")]
    ConflictingSeedingModes,
}

/// Validate the seed length `k`.
///
/// # Examples
///
/// ```
/// use kmer_locate::utils::validation::validate_seed_len;
///
/// assert!(validate_seed_len(16).is_ok());
/// assert!(validate_seed_len(0).is_err());
/// ```
///
/// # Errors
///
/// Returns `ValidationError::ZeroSeedLength` for zero, or
/// `ValidationError::SeedLengthTooLarge` above [`MAX_SEED_LEN`].
pub fn validate_seed_len(seed_len: usize) -> Result<usize, ValidationError> {
    if seed_len == 0 {
        return Err(ValidationError::ZeroSeedLength);
    }
    if seed_len > MAX_SEED_LEN {
        return Err(ValidationError::SeedLengthTooLarge(seed_len));
    }
    Ok(seed_len)
}

/// Resolve the seeding strategy from the seeding options.
///
/// Without a distance, seeds are adjacent (`distance == seed_len`).
///
/// # Errors
///
/// Returns `ValidationError::ZeroDistance` for a zero distance, or
/// `ValidationError::ConflictingSeedingModes` if both a distance and
/// non-overlapping seeding are requested.
pub fn resolve_strategy(
    seed_len: usize,
    distance: Option<usize>,
    non_overlapping: bool,
) -> Result<SeedingStrategy, ValidationError> {
    match (distance, non_overlapping) {
        (Some(_), true) => Err(ValidationError::ConflictingSeedingModes),
        (Some(0), false) => Err(ValidationError::ZeroDistance),
        (Some(d), false) => Ok(SeedingStrategy::from_distance(seed_len, d)),
        (None, true) => Ok(SeedingStrategy::GreedyNonOverlapping),
        (None, false) => Ok(SeedingStrategy::NonOverlapping),
    }
}
