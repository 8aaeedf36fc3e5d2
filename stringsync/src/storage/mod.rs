//! Storage backends implementing [`crate::traits::Storage`].

pub mod lproj;
pub mod sheet;
pub mod workbook;

pub use lproj::LprojStorage;
pub use sheet::SheetStorage;
pub use workbook::{CsvWorkbook, MemoryWorkbook, Workbook};
