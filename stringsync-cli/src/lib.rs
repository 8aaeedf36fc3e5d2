//! CLI library for testing purposes

pub mod config;
pub mod dump;
pub mod sync;

pub use config::{FileConfig, Overrides, Settings};
