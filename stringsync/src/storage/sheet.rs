//! Storage over a [`Workbook`]: one sheet per source, titled with the source name.

use tracing::debug;

use crate::{
    error::Error, formats::Grid, storage::workbook::Workbook, traits::Storage, types::Source,
};

/// Reads and writes sources as sheets of a workbook.
#[derive(Debug, Clone)]
pub struct SheetStorage<W> {
    workbook: W,
}

impl<W: Workbook> SheetStorage<W> {
    pub fn new(workbook: W) -> Self {
        SheetStorage { workbook }
    }

    pub fn workbook(&self) -> &W {
        &self.workbook
    }
}

impl<W: Workbook> Storage for SheetStorage<W> {
    /// Sources come out in workbook sheet order.
    fn get_all(&self, names: Option<&[String]>) -> Result<Vec<Source>, Error> {
        let mut sources = Vec::new();
        for title in self.workbook.sheet_titles()? {
            if names.is_some_and(|names| !names.contains(&title)) {
                continue;
            }
            debug!(sheet = %title, "Reading source from sheet");
            let grid = self.workbook.read_sheet(&title)?;
            sources.push(grid.to_source(&title));
        }
        Ok(sources)
    }

    fn save(&mut self, source: &Source) -> Result<(), Error> {
        let title = source.name();

        let merged = match self.get_by(title)? {
            Some(existing) => {
                self.workbook.clear_sheet(title)?;
                existing.merge(source)
            }
            None => {
                self.workbook.add_sheet(title)?;
                source.clone()
            }
        };

        let grid = Grid::from_source(&merged);
        debug!(sheet = %title, rows = grid.rows.len(), "Writing source to sheet");
        self.workbook.write_sheet(title, &grid)
    }

    fn update_existing(&mut self, source: &Source) -> Result<(), Error> {
        Err(Error::unsupported(format!(
            "updating existing keys of sheet `{}`; use save instead",
            source.name()
        )))
    }

    fn delete_all(&mut self, name: &str) -> Result<(), Error> {
        if self.workbook.has_sheet(name)? {
            debug!(sheet = %name, "Clearing sheet");
            self.workbook.clear_sheet(name)?;
        }
        Ok(())
    }
}
