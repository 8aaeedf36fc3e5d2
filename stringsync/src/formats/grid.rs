//! Support for the tabular layout used by workbook sheets.
//!
//! Row 0 is the header: `key`, then one column per locale. Every other row is one entry:
//! the key in column 0, then its text for each locale column.
//! The same grid is written to and read from CSV files by [`Parser`].
use std::io::BufRead;

use crate::{error::Error, traits::Parser, types::Source};

/// Header cell of the key column.
pub const KEY_HEADER: &str = "key";

/// A sheet's cells, row by row. Rows may have different lengths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    pub rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Grid { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Lays `source` out as a full sheet: header `key` + locales in canonical order, then
    /// one row per entry with `""` for missing translations.
    pub fn from_source(source: &Source) -> Self {
        let locales = source.locales_in_use();

        let mut header = Vec::with_capacity(locales.len() + 1);
        header.push(KEY_HEADER.to_string());
        header.extend(locales.iter().cloned());

        let mut rows = Vec::with_capacity(source.len() + 1);
        rows.push(header);
        for entry in source.entries() {
            let mut row = Vec::with_capacity(locales.len() + 1);
            row.push(entry.key.clone());
            row.extend(
                locales
                    .iter()
                    .map(|locale| entry.get(locale).unwrap_or_default().to_string()),
            );
            rows.push(row);
        }

        Grid { rows }
    }

    /// Reads the grid back as a source called `name`.
    ///
    /// Locale columns are taken from the header in whatever order it has. Cells missing
    /// at the end of a short row add nothing; rows without a key are skipped.
    pub fn to_source(&self, name: &str) -> Source {
        let mut source = Source::new(name);
        let Some((header, rows)) = self.rows.split_first() else {
            return source;
        };

        let locales: Vec<Option<&str>> = header
            .iter()
            .map(|cell| {
                let cell = cell.trim();
                (cell != KEY_HEADER && !cell.is_empty()).then_some(cell)
            })
            .collect();

        for row in rows {
            let Some((key, cells)) = row.split_first() else {
                continue;
            };
            if key.is_empty() {
                continue;
            }
            for (index, text) in cells.iter().enumerate() {
                if let Some(Some(locale)) = locales.get(index + 1) {
                    source.add_translation(key.as_str(), *locale, text.as_str());
                }
            }
        }

        source
    }

    /// Writes `other` over this grid starting at the first cell. Cells outside `other`
    /// keep their content.
    pub fn overlay(&mut self, other: &Grid) {
        for (index, row) in other.rows.iter().enumerate() {
            match self.rows.get_mut(index) {
                Some(existing) => {
                    if existing.len() < row.len() {
                        existing.resize(row.len(), String::new());
                    }
                    existing[..row.len()].clone_from_slice(row);
                }
                None => self.rows.push(row.clone()),
            }
        }
    }

    /// Drops empty cells at the end of every row, the way the remote store reports rows.
    pub fn trim_trailing_blanks(mut self) -> Self {
        for row in &mut self.rows {
            while row.last().is_some_and(String::is_empty) {
                row.pop();
            }
        }
        self
    }
}

impl Parser for Grid {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(Error::CsvParse)?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Grid { rows })
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: std::io::Write>(&self, writer: W) -> Result<(), Error> {
        let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
