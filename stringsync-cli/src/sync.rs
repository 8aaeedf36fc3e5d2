use std::fs;
use std::path::Path;

use stringsync::{CopyReport, CsvWorkbook, LprojStorage, SheetStorage, copier};

use crate::config::Settings;

/// Which way `run_sync_command` copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Project → workbook.
    Push,
    /// Workbook → project.
    Pull,
}

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub direction: Direction,
    /// Only these sources; all of them when empty.
    pub sources: Vec<String>,
    /// Patch existing project files instead of rewriting them. Ignored by push.
    pub update_existing: bool,
}

pub fn run_sync_command(settings: &Settings, opts: SyncOptions) -> Result<(), String> {
    let project = LprojStorage::new(settings.project_dir()?).map_err(|e| e.to_string())?;
    let project_root = project.root().to_path_buf();
    let workbook_dir = settings.workbook_dir()?;
    let names = (!opts.sources.is_empty()).then_some(opts.sources.as_slice());

    let report = match opts.direction {
        Direction::Push => {
            if settings.credentials.is_some() {
                fs::create_dir_all(&workbook_dir).map_err(|e| {
                    format!("Cannot create workbook {}: {}", workbook_dir.display(), e)
                })?;
            }
            let mut sheets = open_sheets(&workbook_dir)?;
            copier::copy(&project, &mut sheets, names)
        }
        Direction::Pull => {
            let sheets = open_sheets(&workbook_dir)?;
            let mut project = project;
            if opts.update_existing {
                copier::update_existing(&sheets, &mut project, names)
            } else {
                copier::copy(&sheets, &mut project, names)
            }
        }
    }
    .map_err(|e| e.to_string())?;

    print_report(&report, opts.direction, &workbook_dir, &project_root);
    Ok(())
}

fn open_sheets(dir: &Path) -> Result<SheetStorage<CsvWorkbook>, String> {
    CsvWorkbook::new(dir)
        .map(SheetStorage::new)
        .map_err(|e| e.to_string())
}

fn print_report(report: &CopyReport, direction: Direction, workbook: &Path, project: &Path) {
    let (verb, target) = match direction {
        Direction::Push => ("Pushed", workbook),
        Direction::Pull => ("Pulled", project),
    };
    if report.is_empty() {
        println!("No sources to copy into {}", target.display());
        return;
    }
    println!(
        "✅ {} {} source(s) into {}: {}",
        verb,
        report.len(),
        target.display(),
        report.sources.join(", ")
    );
}
