//! Traits shared by the codecs and the storage backends.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Cursor, Write},
    path::Path,
};

use crate::{error::Error, types::Source};

/// A trait for parsing and writing one file (or any reader/writer) of a format.
///
/// # Example
///
/// ```rust,no_run
/// use stringsync::traits::Parser;
/// let format = stringsync::formats::strings::Format::read_from("en.lproj/Main.strings")?;
/// format.write_to("en.lproj/Main-copy.strings")?;
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from file path.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let file = File::open(path).map_err(Error::Io)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Write to file path.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        self.to_writer(writer)
    }

    /// Parse from a string.
    fn from_str(s: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(s))
    }

    /// Parse from bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(bytes))
    }
}

/// A backend holding a set of named [`Source`]s.
///
/// Implemented once per backend: [`crate::storage::LprojStorage`] for a directory of
/// `.lproj` folders and [`crate::storage::SheetStorage`] for a workbook with one sheet
/// per source.
pub trait Storage {
    /// Returns every source, or only those whose name is in `names`.
    fn get_all(&self, names: Option<&[String]>) -> Result<Vec<Source>, Error>;

    /// Returns the source called `name`, or `None` when the backend has no such source.
    fn get_by(&self, name: &str) -> Result<Option<Source>, Error> {
        let names = [name.to_string()];
        Ok(self.get_all(Some(&names))?.into_iter().next())
    }

    /// Merges `source` into whatever the backend already holds under its name and
    /// writes the result, replacing any previous formatting.
    fn save(&mut self, source: &Source) -> Result<(), Error>;

    /// Updates the values of keys the backend already has, leaving everything else
    /// (including comments and layout) untouched. Never adds keys.
    fn update_existing(&mut self, source: &Source) -> Result<(), Error>;

    /// Removes all content stored for the source called `name`.
    fn delete_all(&mut self, name: &str) -> Result<(), Error>;
}
