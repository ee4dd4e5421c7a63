//! Header-keyed rows read from an exported CSV.
//!
//! Exports arrive comma- or semicolon-separated, sometimes with a UTF-8 BOM.
//! Quoting and embedded delimiters are handled by the `csv` reader.

use csv::{ReaderBuilder, Trim};
use std::collections::HashMap;
use std::io::Read;

use crate::error::{IngestError, Result};

/// One data row, keyed by (trimmed) header name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: HashMap<String, String>,
}

impl RawRow {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            cells: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Value of a single column, empty when absent.
    pub fn get(&self, column: &str) -> &str {
        self.cells.get(column).map(|s| s.trim()).unwrap_or("")
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }

    /// First non-empty value among alternative column names.
    pub fn first_of(&self, aliases: &[&str]) -> &str {
        aliases
            .iter()
            .map(|a| self.get(a))
            .find(|v| !v.is_empty())
            .unwrap_or("")
    }

    pub fn is_blank(&self) -> bool {
        self.cells.values().all(|v| v.trim().is_empty())
    }
}

/// `;` when the header line has more semicolons than commas, `,` otherwise.
pub fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or("");
    let semis = header.matches(';').count();
    let commas = header.matches(',').count();
    if semis > commas { b';' } else { b',' }
}

/// Read an export into header-keyed rows, skipping blank lines.
pub fn read_rows(text: &str) -> Result<Vec<RawRow>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let delimiter = sniff_delimiter(text);
    read_rows_from(text.as_bytes(), delimiter)
}

/// Read rows from any reader with a known delimiter.
pub fn read_rows_from<R: Read>(reader: R, delimiter: u8) -> Result<Vec<RawRow>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(IngestError::MissingHeader);
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let row = RawRow::from_pairs(
            headers
                .iter()
                .enumerate()
                .map(|(i, h)| (h, record.get(i).unwrap_or(""))),
        );
        if row.is_blank() {
            continue;
        }
        rows.push(row);
    }

    Ok(rows)
}
