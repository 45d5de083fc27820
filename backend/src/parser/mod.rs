//! CSV readers for the project report and the derived tables.
//!
//! The report is a `;`-delimited export whose encoding varies between
//! machines (UTF-8, Latin-1, Windows-1252). It is read as raw bytes, the
//! encoding is detected, and undecodable sequences are replaced instead
//! of failing. Derived tables are always `,`-delimited UTF-8.

use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::io;
use std::path::Path;

use crate::error::{ReadError, ReadResult};
use crate::models::{RawRow, Table};

/// Delimiter of the source report.
pub const REPORT_DELIMITER: u8 = b';';

/// Delimiter of every derived table.
pub const TABLE_DELIMITER: u8 = b',';

/// A decoded source report.
#[derive(Debug, Clone)]
pub struct Report {
    /// Data rows keyed by header
    pub rows: Vec<RawRow>,
    /// Column headers in file order
    pub headers: Vec<String>,
    /// Detected encoding
    pub encoding: String,
}

impl Report {
    /// Rows as JSON objects, keys in header order.
    pub fn to_json_records(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                let mut obj = Map::new();
                for header in &self.headers {
                    if let Some(v) = row.get(header) {
                        obj.insert(header.clone(), json!(v));
                    }
                }
                Value::Object(obj)
            })
            .collect()
    }
}

/// Detect the encoding of raw bytes. Valid UTF-8 is taken as is;
/// anything else is left to chardet, falling back to windows-1252.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }
    let (charset, _confidence, _language) = chardet::detect(bytes);

    match charset.to_lowercase().as_str() {
        // Not valid UTF-8 whatever chardet says.
        "" | "ascii" | "utf-8" | "utf8" => "windows-1252".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes with the given encoding label, replacing malformed
/// sequences. Unknown labels fall back to lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoded = match encoding_rs::Encoding::for_label(encoding.as_bytes()) {
        Some(enc) => enc.decode(bytes).0.into_owned(),
        None => String::from_utf8_lossy(bytes).into_owned(),
    };
    match decoded.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => decoded,
    }
}

fn read_bytes(path: &Path) -> ReadResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ReadError::FileNotFound(path.to_path_buf()),
        _ => ReadError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })
}

fn csv_reader(content: &str, delimiter: u8) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes())
}

fn read_headers(reader: &mut csv::Reader<&[u8]>, path: &Path) -> ReadResult<Vec<String>> {
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ReadError::Csv {
            path: path.to_path_buf(),
            source: e,
        })?
        .iter()
        .map(String::from)
        .collect();

    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(ReadError::NoHeaders(path.to_path_buf()));
    }
    Ok(headers)
}

/// Parse decoded report text. `source` only labels errors.
///
/// Header names are trimmed so column lookups survive stray padding.
/// Rows shorter than the header lack the trailing columns entirely, so
/// mandatory lookups on them fail instead of reading `""`.
pub fn parse_report(content: &str, delimiter: u8, source: &Path) -> ReadResult<(Vec<String>, Vec<RawRow>)> {
    let mut reader = csv_reader(content, delimiter);
    let headers: Vec<String> = read_headers(&mut reader, source)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| ReadError::Csv {
            path: source.to_path_buf(),
            source: e,
        })?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);

        let fields: HashMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        rows.push(RawRow::new(line, fields));
    }

    Ok((headers, rows))
}

/// Read a report file with encoding auto-detection.
pub fn read_report(path: impl AsRef<Path>) -> ReadResult<Report> {
    let path = path.as_ref();
    let bytes = read_bytes(path)?;
    parse_report_bytes(&bytes, path)
}

/// Parse report bytes with encoding auto-detection.
pub fn parse_report_bytes(bytes: &[u8], source: &Path) -> ReadResult<Report> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let (headers, rows) = parse_report(&content, REPORT_DELIMITER, source)?;

    Ok(Report {
        rows,
        headers,
        encoding,
    })
}

/// Parse a derived table from text. Headers are kept as written.
pub fn parse_table(content: &str, delimiter: u8, source: &Path) -> ReadResult<Table> {
    let mut reader = csv_reader(content, delimiter);
    let headers = read_headers(&mut reader, source)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| ReadError::Csv {
            path: source.to_path_buf(),
            source: e,
        })?;
        rows.push(record.iter().map(String::from).collect());
    }

    Ok(Table::new(headers, rows))
}

/// Read a UTF-8 text file. Invalid UTF-8 is an error here; only the
/// source report gets lossy decoding.
pub fn read_text(path: impl AsRef<Path>) -> ReadResult<String> {
    let path = path.as_ref();
    let bytes = read_bytes(path)?;
    String::from_utf8(bytes).map_err(|e| ReadError::Io {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidData, e),
    })
}

/// Read a UTF-8, comma-delimited table.
pub fn read_table(path: impl AsRef<Path>) -> ReadResult<Table> {
    let path = path.as_ref();
    let content = read_text(path)?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
    parse_table(content, TABLE_DELIMITER, path)
}
