//! Suffix-array index over a set of contigs.
//!
//! Contigs are concatenated into one text, each followed by a sentinel byte,
//! and every suffix starting inside a contig is sorted lexicographically. A
//! pattern's occurrences then form one contiguous interval of the suffix
//! array, which is exactly the [`MatchRange`] handed back to the pipeline.

use std::io::{Read, Write};
use std::path::Path;

use bincode::Options;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{IndexError, SeedIndex};
use crate::core::types::{Location, MatchRange};

/// Index format version for compatibility checking
pub const INDEX_VERSION: &str = "1.0.0";

/// Separates contigs in the concatenated text; never part of a valid pattern
const SENTINEL: u8 = 0;

/// A contig stored in the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedContig {
    /// Identifier reported in locations
    pub id: u64,

    /// Human-readable name, kept for diagnostics only
    pub name: String,

    pub length: u64,
}

/// Serializable index format
#[derive(Debug, Deserialize)]
struct IndexData {
    version: String,
    created_at: String,
    contigs: Vec<IndexedContig>,
    text: Vec<u8>,
    suffix_array: Vec<u64>,
}

/// Borrowed twin of `IndexData`; encodes to identical bytes
#[derive(Serialize)]
struct IndexDataRef<'a> {
    version: &'a str,
    created_at: &'a str,
    contigs: &'a [IndexedContig],
    text: &'a [u8],
    suffix_array: &'a [u64],
}

#[derive(Debug)]
pub struct SuffixIndex {
    contigs: Vec<IndexedContig>,

    /// Offset of each contig's first base in `text`
    starts: Vec<u64>,

    text: Vec<u8>,

    /// Text positions sorted by the suffix starting there
    suffix_array: Vec<u64>,

    created_at: Option<String>,
}

impl SuffixIndex {
    /// Build an index from `(id, name, sequence)` triples
    pub fn from_contigs<I, N, S>(contigs: I) -> Self
    where
        I: IntoIterator<Item = (u64, N, S)>,
        N: Into<String>,
        S: AsRef<[u8]>,
    {
        let mut entries = Vec::new();
        let mut starts = Vec::new();
        let mut text = Vec::new();

        for (id, name, sequence) in contigs {
            let sequence = sequence.as_ref();
            starts.push(text.len() as u64);
            entries.push(IndexedContig {
                id,
                name: name.into(),
                length: sequence.len() as u64,
            });
            text.extend_from_slice(sequence);
            text.push(SENTINEL);
        }

        let mut suffix_array: Vec<u64> = (0..text.len())
            .filter(|&i| text[i] != SENTINEL)
            .map(|i| i as u64)
            .collect();
        suffix_array.sort_unstable_by(|&a, &b| text[a as usize..].cmp(&text[b as usize..]));

        debug!(
            "Built suffix index over {} contigs ({} suffixes)",
            entries.len(),
            suffix_array.len()
        );

        Self {
            contigs: entries,
            starts,
            text,
            suffix_array,
            created_at: None,
        }
    }

    /// Serialize the index to a stream
    ///
    /// # Errors
    ///
    /// Returns `IndexError::DecodeError` if encoding or writing fails.
    pub fn save<W: Write>(&self, writer: W) -> Result<(), IndexError> {
        let created_at = chrono::Utc::now().to_rfc3339();
        let data = IndexDataRef {
            version: INDEX_VERSION,
            created_at: &created_at,
            contigs: &self.contigs,
            text: &self.text,
            suffix_array: &self.suffix_array,
        };
        bincode::serialize_into(writer, &data)?;
        Ok(())
    }

    /// Serialize the index to a file, replacing any existing file
    ///
    /// # Errors
    ///
    /// Returns an `IndexError` if the file cannot be created or written.
    pub fn save_to_file(&self, path: &Path) -> Result<(), IndexError> {
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        self.save(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn contigs(&self) -> &[IndexedContig] {
        &self.contigs
    }

    /// Timestamp recorded when the index was saved, if loaded from disk
    pub fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    /// Number of indexed suffixes
    pub fn len(&self) -> usize {
        self.suffix_array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suffix_array.is_empty()
    }

    fn from_data(data: IndexData) -> Result<Self, IndexError> {
        if data.version != INDEX_VERSION {
            warn!(
                "Index version mismatch (expected {}, found {})",
                INDEX_VERSION, data.version
            );
        }

        let mut starts = Vec::with_capacity(data.contigs.len());
        let mut offset = 0u64;
        for contig in &data.contigs {
            starts.push(offset);
            offset = offset
                .checked_add(contig.length)
                .and_then(|end| end.checked_add(1))
                .ok_or_else(|| {
                    IndexError::Corrupt(format!(
                        "length {} of contig {} overflows the text",
                        contig.length, contig.id
                    ))
                })?;
        }
        if offset != data.text.len() as u64 {
            return Err(IndexError::Corrupt(format!(
                "contig lengths cover {offset} bytes but text has {}",
                data.text.len()
            )));
        }
        if let Some(&pos) = data
            .suffix_array
            .iter()
            .find(|&&pos| pos >= data.text.len() as u64)
        {
            return Err(IndexError::Corrupt(format!(
                "suffix array entry {pos} lies outside the text"
            )));
        }

        Ok(Self {
            contigs: data.contigs,
            starts,
            text: data.text,
            suffix_array: data.suffix_array,
            created_at: Some(data.created_at),
        })
    }

    fn suffix(&self, sa_index: usize) -> &[u8] {
        &self.text[self.suffix_array[sa_index] as usize..]
    }

    /// Map a text position to the contig holding it
    fn location_of(&self, pos: u64) -> Location {
        let idx = self.starts.partition_point(|&start| start <= pos) - 1;
        Location::new(self.contigs[idx].id, pos - self.starts[idx])
    }

    fn clamp(&self, range: &MatchRange) -> (usize, usize) {
        let len = self.suffix_array.len();
        let end = (range.end() as usize).min(len);
        let start = (range.start() as usize).min(end);
        (start, end)
    }
}

impl SeedIndex for SuffixIndex {
    fn load<R: Read>(mut reader: R) -> Result<Self, IndexError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        // Same layout as `bincode::serialize`, but no length read from the
        // input may claim more bytes than the input holds.
        let data: IndexData = bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .allow_trailing_bytes()
            .with_limit(bytes.len() as u64)
            .deserialize(&bytes)?;
        Self::from_data(data)
    }

    fn find(&self, pattern: &[u8]) -> MatchRange {
        if pattern.is_empty() || pattern.contains(&SENTINEL) {
            return MatchRange::empty();
        }

        let prefix = move |i: usize| {
            let suffix = self.suffix(i);
            &suffix[..suffix.len().min(pattern.len())]
        };

        let lower = partition_point(self.suffix_array.len(), |i| prefix(i) < pattern);
        let upper = partition_point(self.suffix_array.len(), |i| prefix(i) <= pattern);

        MatchRange::new(lower as u64, upper as u64)
    }

    fn count(&self, range: &MatchRange) -> u64 {
        let (start, end) = self.clamp(range);
        (end - start) as u64
    }

    fn locate(&self, range: &MatchRange, dedup: bool) -> Vec<Location> {
        let (start, end) = self.clamp(range);
        let mut locations: Vec<Location> = self.suffix_array[start..end]
            .iter()
            .map(|&pos| self.location_of(pos))
            .collect();

        locations.sort_unstable();
        if dedup {
            locations.dedup();
        }
        locations
    }
}

/// First index in `0..len` for which `pred` is false; `pred` must be
/// true on a prefix of the range and false afterwards
fn partition_point(len: usize, pred: impl Fn(usize) -> bool) -> usize {
    let (mut lo, mut hi) = (0, len);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if pred(mid) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}
