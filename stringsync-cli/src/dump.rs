use std::io;

use stringsync::{CsvWorkbook, LprojStorage, Parser, SheetStorage, Source, Storage};

use crate::config::Settings;

/// Storage `dump` reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DumpFrom {
    /// The `.lproj` project directory
    Project,
    /// The workbook directory
    Workbook,
}

/// Prints the sources of one storage as a JSON array on stdout.
pub fn run_dump_command(
    settings: &Settings,
    from: DumpFrom,
    sources: Vec<String>,
) -> Result<(), String> {
    let names = (!sources.is_empty()).then_some(sources.as_slice());

    let storage: Box<dyn Storage> = match from {
        DumpFrom::Project => {
            Box::new(LprojStorage::new(settings.project_dir()?).map_err(|e| e.to_string())?)
        }
        DumpFrom::Workbook => Box::new(SheetStorage::new(
            CsvWorkbook::new(settings.workbook_dir()?).map_err(|e| e.to_string())?,
        )),
    };

    let sources: Vec<Source> = storage.get_all(names).map_err(|e| e.to_string())?;
    tracing::debug!("Dumping {} source(s)", sources.len());

    sources
        .to_writer(io::stdout().lock())
        .map_err(|e| format!("Error writing output: {}", e))?;
    println!();
    Ok(())
}
