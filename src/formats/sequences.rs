//! Reader for plain-text sequence files: one sequence per line, no header.
//!
//! Files ending in `.gz` or `.bgz` are decompressed on the fly, and `-`
//! reads from standard input.

use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SequenceError {
    #[error("Failed to read sequences: {0}")]
    ReadError(#[from] std::io::Error),
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Read every sequence of a file, in file order.
///
/// # Errors
///
/// Returns `SequenceError::ReadError` if the file cannot be opened, read, or
/// decompressed.
pub fn read_sequence_file(path: &Path) -> Result<Vec<Vec<u8>>, SequenceError> {
    if path.to_string_lossy() == "-" {
        return read_sequences(std::io::stdin().lock());
    }

    let file = std::fs::File::open(path)?;
    if is_gzipped(path) {
        read_sequences(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        read_sequences(BufReader::new(file))
    }
}

/// Read one sequence per line from a reader.
///
/// A trailing carriage return is stripped from each line. Empty lines are
/// kept as empty sequences, which simply yield no seeds.
///
/// # Errors
///
/// Returns `SequenceError::ReadError` on any read failure.
pub fn read_sequences<R: BufRead>(reader: R) -> Result<Vec<Vec<u8>>, SequenceError> {
    let mut sequences = Vec::new();
    for line in reader.split(b'\n') {
        let mut line = line?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        sequences.push(line);
    }

    debug!("Read {} sequences", sequences.len());
    Ok(sequences)
}
