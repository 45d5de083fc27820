//! Writers for derived tables and exports.
//!
//! All outputs are UTF-8. CSV records end with `\r\n` and quote only
//! when needed. Parent directories are created on demand.

use serde::Serialize;
use std::fs::{self, File};
use std::path::Path;

use crate::error::{WriteError, WriteResult};
use crate::models::{FlattenedRow, FLAT_HEADERS};
use crate::parser::TABLE_DELIMITER;

fn io_error(path: &Path, source: std::io::Error) -> WriteError {
    WriteError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn csv_error(path: &Path, source: csv::Error) -> WriteError {
    WriteError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

fn create(path: &Path) -> WriteResult<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_error(path, e))?;
    }
    File::create(path).map_err(|e| io_error(path, e))
}

fn csv_writer(path: &Path) -> WriteResult<csv::Writer<File>> {
    let file = create(path)?;
    Ok(csv::WriterBuilder::new()
        .delimiter(TABLE_DELIMITER)
        .terminator(csv::Terminator::CRLF)
        .has_headers(false)
        .from_writer(file))
}

/// Write a header row followed by `rows`.
///
/// Rows shorter than the header are padded with empty cells.
pub fn write_table<S: AsRef<str>>(path: &Path, headers: &[S], rows: &[Vec<String>]) -> WriteResult<()> {
    let header: Vec<&str> = headers.iter().map(|h| h.as_ref()).collect();
    let mut writer = csv_writer(path)?;
    writer.write_record(&header).map_err(|e| csv_error(path, e))?;
    for row in rows {
        let missing = header.len().saturating_sub(row.len());
        let record = row
            .iter()
            .map(String::as_str)
            .chain(std::iter::repeat("").take(missing));
        writer.write_record(record).map_err(|e| csv_error(path, e))?;
    }
    writer.flush().map_err(|e| io_error(path, e))
}

/// Write the flattened activity table.
pub fn write_flattened(path: &Path, rows: &[FlattenedRow]) -> WriteResult<()> {
    let mut writer = csv_writer(path)?;
    writer.write_record(FLAT_HEADERS).map_err(|e| csv_error(path, e))?;
    for row in rows {
        writer.serialize(row).map_err(|e| csv_error(path, e))?;
    }
    writer.flush().map_err(|e| io_error(path, e))
}

/// Write `value` as pretty-printed JSON.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> WriteResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_text(path, &json)
}

/// Write text as is.
pub fn write_text(path: &Path, content: &str) -> WriteResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_error(path, e))?;
    }
    fs::write(path, content).map_err(|e| io_error(path, e))
}
