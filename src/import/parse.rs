//! Reads a bank export into `RawRecord`s.
//!
//! The export is `;`-delimited text in the Windows-1250 encoding. It starts with
//! `METADATA_LINES` lines describing the account and the query, followed by a header line, the
//! transactions (newest first), and a single summary line at the end.

use crate::error::ImportError;
use crate::model::{RawRecord, SOURCE_COLUMNS};
use crate::{utils, Result};
use encoding_rs::WINDOWS_1250;
use std::path::Path;
use tracing::{debug, warn};

/// The number of account and query description lines before the header line.
pub const METADATA_LINES: usize = 20;

/// The number of summary lines after the last transaction.
pub const SUMMARY_LINES: usize = 1;

const DELIMITER: u8 = b';';

/// Reads the bank export at `path`.
///
/// # Errors
/// - `ImportError::Parse` if the file cannot be read or contains no usable rows.
pub fn read_file(path: &Path) -> Result<Vec<RawRecord>> {
    let source_name = path.display().to_string();
    let bytes = utils::read_bytes(path).map_err(|e| ImportError::Parse {
        source_name: source_name.clone(),
        reason: format!("{e:#}"),
    })?;
    read_bytes(&bytes, &source_name)
}

/// Reads a bank export from its raw bytes. `source_name` is only used in messages.
pub fn read_bytes(bytes: &[u8], source_name: &str) -> Result<Vec<RawRecord>> {
    let (text, _, had_errors) = WINDOWS_1250.decode(bytes);
    if had_errors {
        warn!("{source_name} contains bytes that are not valid Windows-1250");
    }

    let mut lines: Vec<&str> = text.lines().collect();
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    if lines.len() <= METADATA_LINES + SUMMARY_LINES {
        return Err(parse_error(source_name, "the file has no transaction lines"));
    }
    let table = lines[METADATA_LINES..lines.len() - SUMMARY_LINES].join("\n");

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(true)
        .from_reader(table.as_bytes());

    let width = reader
        .headers()
        .map_err(|e| parse_error(source_name, format!("unreadable header line: {e}")))?
        .len();
    check_headers(reader.headers().ok(), source_name);

    let mut records = Vec::new();
    for (ix, result) in reader.records().enumerate() {
        // Lines are counted from 1 and the header line precedes the first record.
        let line = METADATA_LINES + ix + 2;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping malformed line {line} of {source_name}: {e}");
                continue;
            }
        };
        if record.len() > width {
            warn!(
                "Skipping line {line} of {source_name}: expected {width} fields, found {}",
                record.len()
            );
            continue;
        }
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        records.push(RawRecord::from_fields(record.iter()));
    }

    if records.is_empty() {
        return Err(parse_error(source_name, "the file has no usable transaction rows"));
    }
    debug!("Read {} rows from {source_name}", records.len());
    Ok(records)
}

/// Warns when the header line does not name the expected columns at the expected positions.
fn check_headers(headers: Option<&csv::StringRecord>, source_name: &str) {
    let Some(headers) = headers else {
        return;
    };
    for column in SOURCE_COLUMNS {
        let found = headers.get(column.index()).map(str::trim);
        if found != Some(column.header()) {
            warn!(
                "Column {} of {source_name} is {:?}, expected '{}'",
                column.index(),
                found.unwrap_or_default(),
                column.header()
            );
        }
    }
}

fn parse_error(source_name: &str, reason: impl Into<String>) -> anyhow::Error {
    ImportError::Parse {
        source_name: source_name.to_string(),
        reason: reason.into(),
    }
    .into()
}
