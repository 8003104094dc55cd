//! Supported tickers filtering
//!
//! Keeps the header of the supported tickers file plus every row listed on
//! NASDAQ or an NYSE market whose fields 4 and 5 are filled in. The file is
//! read completely before it is reopened for writing.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use tracing::{debug, info};

use crate::error::{FixtureError, Result};
use crate::models::{FilterReport, TickerRow, EXCHANGE_FIELD};

/// Fields that must be non-empty for a listed ticker to be kept
pub const REQUIRED_FIELDS: [usize; 2] = [4, 5];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const BOM_CHAR: char = '\u{feff}';

/// Whether the exchange name belongs to a supported market
pub fn is_supported_exchange(exchange: &str) -> bool {
    exchange == "NASDAQ" || exchange.contains("NYSE")
}

/// Evaluate the filter predicate for a data row.
///
/// The exchange is checked first; required fields are only inspected for rows
/// on a supported exchange, so short rows from other markets are dropped
/// rather than rejected.
pub fn is_supported(row: &TickerRow, row_number: usize) -> Result<bool> {
    let exchange = field_or_short(row, row_number, EXCHANGE_FIELD)?;
    if !is_supported_exchange(exchange) {
        return Ok(false);
    }

    for index in REQUIRED_FIELDS {
        if field_or_short(row, row_number, index)?.is_empty() {
            return Ok(false);
        }
    }

    Ok(true)
}

fn field_or_short(row: &TickerRow, row_number: usize, index: usize) -> Result<&str> {
    row.field(index).ok_or_else(|| FixtureError::ShortRow {
        row: row_number,
        len: row.len(),
        needed: index,
    })
}

/// Keep the first record unconditionally and every later record passing [`is_supported`]
pub fn filter_records<I>(records: I) -> Result<Vec<StringRecord>>
where
    I: IntoIterator<Item = csv::Result<StringRecord>>,
{
    let mut valid_rows = Vec::new();

    for (num, record) in records.into_iter().enumerate() {
        let row = TickerRow::new(record?);
        if num == 0 || is_supported(&row, num)? {
            valid_rows.push(row.into_record());
        } else {
            debug!("Dropping row {}: {:?}", num, row.exchange());
        }
    }

    Ok(valid_rows)
}

/// Read the whole tickers file into memory and filter it.
///
/// A UTF-8 byte order mark stays part of the header's first field, so it is
/// written back out by [`write_rows`]. Blank lines are skipped by the CSV
/// reader and never count as rows.
pub fn read_supported_rows(path: &Path) -> Result<Vec<StringRecord>> {
    let bytes = fs::read(path).map_err(|e| FixtureError::io(path, e))?;
    let (has_bom, body) = match bytes.strip_prefix(UTF8_BOM) {
        Some(rest) => (true, rest),
        None => (false, &bytes[..]),
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body);

    let mut rows = filter_records(reader.records())?;
    if has_bom {
        if let Some(header) = rows.first_mut() {
            *header = with_bom(header);
        }
    }

    debug!("Read {} retained rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn with_bom(header: &StringRecord) -> StringRecord {
    header
        .iter()
        .enumerate()
        .map(|(i, field)| {
            if i == 0 {
                format!("{}{}", BOM_CHAR, field)
            } else {
                field.to_string()
            }
        })
        .collect()
}

/// Truncate `path` and write `rows` with minimal quoting and CRLF line endings
pub fn write_rows(path: &Path, rows: &[StringRecord]) -> Result<()> {
    let file = File::create(path).map_err(|e| FixtureError::io(path, e))?;
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .terminator(Terminator::CRLF)
        .from_writer(file);

    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush().map_err(|e| FixtureError::io(path, e))?;

    Ok(())
}

/// Rewrite the tickers file in place, keeping the header and supported rows.
///
/// The retained row count (header included) is announced on `out` before the
/// file is rewritten, followed by the destination name.
pub fn filter_file<W: Write>(path: &Path, out: &mut W) -> Result<FilterReport> {
    let rows = read_supported_rows(path)?;
    writeln!(out, "Valid Tickers Found:{}", rows.len()).map_err(FixtureError::Report)?;

    writeln!(out, "Writing to file {}", path.display()).map_err(FixtureError::Report)?;
    write_rows(path, &rows)?;
    info!("Wrote {} rows to {}", rows.len(), path.display());

    Ok(FilterReport {
        retained: rows.len(),
        path: path.to_path_buf(),
    })
}
