//! Writer for located occurrences.
//!
//! One line per occurrence, `contig_id<TAB>offset`, in the order the
//! occurrences were produced. No header and no trailing summary.

use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::types::Location;

/// Write locations to any writer
///
/// # Errors
///
/// Returns any I/O error raised while writing or flushing.
pub fn write_locations<W: Write>(writer: W, locations: &[Location]) -> std::io::Result<()> {
    let mut writer = BufWriter::new(writer);
    for location in locations {
        writeln!(writer, "{}\t{}", location.contig_id, location.offset)?;
    }
    writer.flush()
}

/// Write locations to a file, creating or truncating it
///
/// # Errors
///
/// Returns an I/O error if the file cannot be created or written.
pub fn write_locations_file(path: &Path, locations: &[Location]) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    write_locations(file, locations)
}
