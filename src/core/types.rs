use serde::{Deserialize, Serialize};

/// A seed queued for lookup against the index.
///
/// Patterns borrow from the sequences they were cut from; nothing downstream
/// needs to know which sequence that was.
pub type Pattern<'a> = &'a [u8];

/// One concrete occurrence of a pattern in the indexed reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Numeric identifier of the contig (or graph node) holding the occurrence
    pub contig_id: u64,

    /// Zero-based offset within the contig
    pub offset: u64,
}

impl Location {
    pub fn new(contig_id: u64, offset: u64) -> Self {
        Self { contig_id, offset }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{}", self.contig_id, self.offset)
    }
}

impl From<(u64, u64)> for Location {
    fn from((contig_id, offset): (u64, u64)) -> Self {
        Self::new(contig_id, offset)
    }
}

/// Half-open interval of index positions consistent with a pattern.
///
/// Callers treat it as an opaque handle: the only things they may ask of it
/// directly are whether it is empty and how wide it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MatchRange {
    pub(crate) start: u64,
    pub(crate) end: u64,
}

impl MatchRange {
    pub fn new(start: u64, end: u64) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// The range matching nothing
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display_is_tab_separated() {
        assert_eq!(Location::new(3, 10).to_string(), "3\t10");
    }

    #[test]
    fn test_locations_order_by_contig_then_offset() {
        let mut locs = vec![
            Location::new(7, 2),
            Location::new(3, 15),
            Location::new(3, 10),
        ];
        locs.sort();
        assert_eq!(
            locs,
            vec![
                Location::new(3, 10),
                Location::new(3, 15),
                Location::new(7, 2)
            ]
        );
    }

    #[test]
    fn test_match_range_empty() {
        assert!(MatchRange::empty().is_empty());
        assert!(MatchRange::new(5, 5).is_empty());
        // Inverted bounds collapse to empty rather than underflowing
        let inverted = MatchRange::new(9, 4);
        assert!(inverted.is_empty());
        assert_eq!(inverted.len(), 0);
    }

    #[test]
    fn test_match_range_len() {
        let range = MatchRange::new(2, 6);
        assert!(!range.is_empty());
        assert_eq!(range.len(), 4);
    }
}
