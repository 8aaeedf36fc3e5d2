//! The tabular store: a workbook made of titled sheets.
//!
//! [`Workbook`] is the narrow boundary a remote spreadsheet client sits behind. Two
//! implementations live here: [`MemoryWorkbook`] keeps sheets in memory, and
//! [`CsvWorkbook`] keeps one `<title>.csv` file per sheet in a directory, which serves as
//! a local mirror of the remote workbook.

use std::{fs, path::PathBuf};

use tracing::debug;

use crate::{error::Error, formats::Grid, traits::Parser};

const CSV_EXTENSION: &str = "csv";

/// A set of titled sheets.
///
/// Reading a sheet never reports blank cells at the end of a row, matching what a
/// spreadsheet service returns for unset cells.
pub trait Workbook {
    /// Titles of all sheets, in workbook order.
    fn sheet_titles(&self) -> Result<Vec<String>, Error>;

    fn read_sheet(&self, title: &str) -> Result<Grid, Error>;

    /// Adds an empty sheet. Adding a title that already exists leaves it untouched.
    fn add_sheet(&mut self, title: &str) -> Result<(), Error>;

    /// Removes every cell of the sheet.
    fn clear_sheet(&mut self, title: &str) -> Result<(), Error>;

    /// Writes `grid` into the sheet starting at its first cell.
    fn write_sheet(&mut self, title: &str, grid: &Grid) -> Result<(), Error>;

    fn has_sheet(&self, title: &str) -> Result<bool, Error> {
        Ok(self.sheet_titles()?.iter().any(|existing| existing == title))
    }
}

/// A workbook held in memory. Sheets keep the order they were added in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryWorkbook {
    sheets: Vec<(String, Grid)>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper adding a sheet with content.
    pub fn with_sheet(mut self, title: impl Into<String>, grid: Grid) -> Self {
        self.sheets.push((title.into(), grid));
        self
    }

    fn sheet_mut(&mut self, title: &str) -> Result<&mut Grid, Error> {
        self.sheets
            .iter_mut()
            .find(|(existing, _)| existing == title)
            .map(|(_, grid)| grid)
            .ok_or_else(|| Error::SheetNotFound(title.to_string()))
    }
}

impl Workbook for MemoryWorkbook {
    fn sheet_titles(&self) -> Result<Vec<String>, Error> {
        Ok(self.sheets.iter().map(|(title, _)| title.clone()).collect())
    }

    fn read_sheet(&self, title: &str) -> Result<Grid, Error> {
        self.sheets
            .iter()
            .find(|(existing, _)| existing == title)
            .map(|(_, grid)| grid.clone().trim_trailing_blanks())
            .ok_or_else(|| Error::SheetNotFound(title.to_string()))
    }

    fn add_sheet(&mut self, title: &str) -> Result<(), Error> {
        if !self.has_sheet(title)? {
            self.sheets.push((title.to_string(), Grid::default()));
        }
        Ok(())
    }

    fn clear_sheet(&mut self, title: &str) -> Result<(), Error> {
        self.sheet_mut(title)?.rows.clear();
        Ok(())
    }

    fn write_sheet(&mut self, title: &str, grid: &Grid) -> Result<(), Error> {
        self.sheet_mut(title)?.overlay(grid);
        Ok(())
    }
}

/// A workbook stored as a directory with one CSV file per sheet.
#[derive(Debug, Clone)]
pub struct CsvWorkbook {
    dir: PathBuf,
}

impl CsvWorkbook {
    /// Opens the workbook directory at `dir`.
    ///
    /// Fails with [`Error::NotADirectory`] if `dir` does not exist or is a file.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, Error> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(Error::NotADirectory(dir));
        }
        Ok(CsvWorkbook { dir })
    }

    fn sheet_path(&self, title: &str) -> PathBuf {
        self.dir.join(format!("{title}.{CSV_EXTENSION}"))
    }

    fn existing_sheet_path(&self, title: &str) -> Result<PathBuf, Error> {
        let path = self.sheet_path(title);
        if !path.is_file() {
            return Err(Error::SheetNotFound(title.to_string()));
        }
        Ok(path)
    }
}

impl Workbook for CsvWorkbook {
    /// Sheet files sorted by title.
    fn sheet_titles(&self) -> Result<Vec<String>, Error> {
        let mut titles = Vec::new();
        for dir_entry in fs::read_dir(&self.dir)? {
            let path = dir_entry?.path();
            if !path.is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(CSV_EXTENSION)
            {
                continue;
            }
            if let Some(title) = path.file_stem().and_then(|stem| stem.to_str()) {
                titles.push(title.to_string());
            }
        }
        titles.sort();
        Ok(titles)
    }

    fn read_sheet(&self, title: &str) -> Result<Grid, Error> {
        let path = self.existing_sheet_path(title)?;
        debug!(path = %path.display(), "Reading sheet");
        Ok(Grid::read_from(&path)?.trim_trailing_blanks())
    }

    fn add_sheet(&mut self, title: &str) -> Result<(), Error> {
        let path = self.sheet_path(title);
        if !path.exists() {
            debug!(path = %path.display(), "Adding sheet");
            fs::write(&path, "")?;
        }
        Ok(())
    }

    fn clear_sheet(&mut self, title: &str) -> Result<(), Error> {
        let path = self.existing_sheet_path(title)?;
        fs::write(&path, "")?;
        Ok(())
    }

    fn write_sheet(&mut self, title: &str, grid: &Grid) -> Result<(), Error> {
        let path = self.existing_sheet_path(title)?;
        let mut sheet = Grid::read_from(&path)?;
        sheet.overlay(grid);
        debug!(path = %path.display(), rows = sheet.rows.len(), "Writing sheet");
        sheet.write_to(&path)
    }
}
