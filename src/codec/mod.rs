//! Marker file reading and writing
//!
//! Three file generations exist:
//!
//! | Generation | First line          | Data line                                   |
//! |------------|---------------------|---------------------------------------------|
//! | 1          | CSV header          | `frame,x,y`                                 |
//! | 2          | CSV header          | `ant,antType,markerType,x,y,frame`          |
//! | 3          | `File version,3`    | see [`v3`]                                  |
//!
//! Reading accepts all three and migrates older records on the fly. Writing
//! always produces version 3, replacing the target atomically.
//!
//! ```
//! use antmark::codec;
//!
//! let store = codec::read_str("frame,x,y\n12,40,41\n", None).unwrap();
//! assert_eq!(store.records_for(12).len(), 1);
//! assert!(codec::to_string(&store).starts_with("File version,3\n"));
//! ```

mod legacy;
mod migrate;
pub mod v3;

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Error, IoOperation, ParseCause, Result};
use crate::model::MarkerRecord;
use crate::store::FrameRecordStore;

pub use legacy::parse_legacy_line;
pub use migrate::migrate;

/// Which grammar a file's data lines use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileGeneration {
    /// Version 1 or 2: no version header
    Legacy,
    /// Version 3
    V3,
}

/// Numbered, non-blank lines of `text`, ignoring a leading byte order mark.
/// `lines()` already strips `\r\n`.
fn numbered_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.strip_prefix('\u{feff}')
        .unwrap_or(text)
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line))
        .filter(|(_, line)| !line.trim().is_empty())
}

/// Inspect the first line of `text` to find its generation.
///
/// Fails with [`Error::UnsupportedVersion`] when a version header names a
/// version other than 3.
pub fn detect_version(text: &str) -> Result<FileGeneration> {
    let Some((line_number, first)) = numbered_lines(text).next() else {
        return Ok(FileGeneration::Legacy);
    };
    match v3::parse_version(first) {
        None => Ok(FileGeneration::Legacy),
        Some(Ok(v3::VERSION)) => Ok(FileGeneration::V3),
        Some(Ok(found)) => Err(Error::UnsupportedVersion { found }),
        Some(Err(cause)) => Err(cause.at(line_number, first, None)),
    }
}

/// Read a marker file from disk
pub fn read_file(path: impl AsRef<Path>) -> Result<FrameRecordStore> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(Error::io(IoOperation::Read, path))?;
    let store = read_str(&text, Some(path))?;
    info!(
        "Loaded {} markers for {} ants from {}",
        store.record_count(),
        store.subject_ids().len(),
        path.display()
    );
    Ok(store)
}

/// Parse marker file contents.
///
/// `file` is only used to name the source in parse errors. Any malformed
/// line aborts the read.
pub fn read_str(text: &str, file: Option<&Path>) -> Result<FrameRecordStore> {
    let file: Option<PathBuf> = file.map(Path::to_path_buf);
    let mut lines = numbered_lines(text);
    let Some((line_number, first)) = lines.next() else {
        return Ok(FrameRecordStore::new());
    };

    let mut store = FrameRecordStore::new();
    match v3::parse_version(first) {
        Some(Ok(v3::VERSION)) => {
            if let Some((line_number, header)) = lines.next() {
                if !v3::is_column_header(header) {
                    return Err(ParseCause::MissingColumnHeader.at(line_number, header, file));
                }
            }
            for (line_number, line) in lines {
                let record = v3::parse_line(line).map_err(|cause| cause.at(line_number, line, file.clone()))?;
                store.push(record.frame, record);
            }
        }
        Some(Ok(found)) => return Err(Error::UnsupportedVersion { found }),
        Some(Err(cause)) => return Err(cause.at(line_number, first, file)),
        None => {
            let mut migrated = 0usize;
            for (line_number, line) in lines {
                let record = parse_legacy_line(line)
                    .and_then(|legacy| migrate(&legacy).map_err(ParseCause::from))
                    .map_err(|cause| cause.at(line_number, line, file.clone()))?;
                store.push(record.frame, record);
                migrated += 1;
            }
            debug!("Migrated {migrated} legacy markers to version 3");
        }
    }
    Ok(store)
}

/// Records sorted by ant id, then frame
fn sorted_records(store: &FrameRecordStore) -> Vec<&MarkerRecord> {
    let mut records: Vec<&MarkerRecord> = store.records().collect();
    records.sort_by_key(|record| (record.subject_id, record.frame));
    records
}

/// Serialize `store` as a version 3 file into `writer`
pub fn write_to<W: Write>(mut writer: W, store: &FrameRecordStore) -> io::Result<()> {
    writeln!(writer, "{}", v3::VERSION_LINE)?;
    writeln!(writer, "{}", v3::COLUMN_HEADER)?;
    for record in sorted_records(store) {
        writeln!(writer, "{}", v3::format_line(record))?;
    }
    writer.flush()
}

/// Serialize `store` as version 3 text
#[must_use]
pub fn to_string(store: &FrameRecordStore) -> String {
    let mut text = format!("{}\n{}\n", v3::VERSION_LINE, v3::COLUMN_HEADER);
    for record in sorted_records(store) {
        text.push_str(&v3::format_line(record));
        text.push('\n');
    }
    text
}

/// Write `store` to `path` as version 3.
///
/// The file is written next to the target and renamed over it, so on failure
/// the previous contents are left in place.
pub fn write_file(path: impl AsRef<Path>, store: &FrameRecordStore) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(Error::io(IoOperation::Create, dir))?;
    write_to(BufWriter::new(&mut temp), store).map_err(Error::io(IoOperation::Write, temp.path()))?;
    temp.as_file()
        .sync_all()
        .map_err(Error::io(IoOperation::Write, temp.path()))?;
    temp.persist(path)
        .map_err(|err| Error::io(IoOperation::Replace, path)(err.error))?;

    info!("Saved {} markers to {}", store.record_count(), path.display());
    Ok(())
}
