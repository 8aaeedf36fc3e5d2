#![forbid(unsafe_code)]
//! Keep Apple `.strings` translations and a spreadsheet-like workbook in sync.
//!
//! Translations live in two very different shapes:
//! - an Xcode project, with one `<locale>.lproj/<Source>.strings` file per source and locale;
//! - a workbook, with one sheet per source, one row per key and one column per locale.
//!
//! Both are read into the same [`Source`] model and written back from it, so copying in
//! either direction is `get_all` on one [`Storage`] followed by `save` on the other.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use stringsync::{CsvWorkbook, LprojStorage, SheetStorage, copier};
//!
//! let project = LprojStorage::new("ios/App")?;
//! let mut sheets = SheetStorage::new(CsvWorkbook::new("translations")?);
//!
//! // Push every source of the project into the workbook.
//! copier::copy(&project, &mut sheets, None)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Write modes
//!
//! - [`Storage::save`] merges the incoming source into the stored one (incoming values
//!   win per locale) and rewrites it completely.
//! - [`Storage::update_existing`] only replaces the values of keys already present,
//!   keeping comments and layout of `.strings` files intact.

pub mod config;
pub mod copier;
pub mod error;
pub mod formats;
pub mod storage;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    config::SheetCredentials,
    copier::CopyReport,
    error::Error,
    formats::{Grid, StringsFormat},
    storage::{CsvWorkbook, LprojStorage, MemoryWorkbook, SheetStorage, Workbook},
    traits::{Parser, Storage},
    types::{Entry, Source, sort_locales},
};
