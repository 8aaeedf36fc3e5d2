//! The two textual layouts a [`crate::Source`] is stored in.
//!
//! - [`strings`]: Apple `.strings` files, one per source and locale.
//! - [`grid`]: a header + rows table, one per source, with a column per locale.

pub mod grid;
pub mod strings;

// Short names used by the storages
pub use grid::Grid;
pub use strings::Format as StringsFormat;
