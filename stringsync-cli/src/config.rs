//! Run configuration: `stringsync.toml` plus command line overrides.
//!
//! ```toml
//! [project]
//! path = "ios/App"
//!
//! [workbook]
//! path = "translations"
//! credentials = "google-storage.config"
//! ```
//!
//! Relative paths in the file are resolved against the directory holding the file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use stringsync::SheetCredentials;

/// Name of the configuration file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "stringsync.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub project: ProjectSection,
    #[serde(default)]
    pub workbook: WorkbookSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectSection {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkbookSection {
    pub path: Option<PathBuf>,
    pub credentials: Option<PathBuf>,
}

/// Values given on the command line. They win over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub project: Option<PathBuf>,
    pub workbook: Option<PathBuf>,
    pub credentials: Option<PathBuf>,
}

/// Where the project and the workbook live for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub project: Option<PathBuf>,
    pub workbook: Option<PathBuf>,
    pub credentials: Option<SheetCredentials>,
}

impl FileConfig {
    /// Reads `path`. A missing file is `Ok(None)`.
    pub fn load(path: &Path) -> Result<Option<FileConfig>, String> {
        if !path.exists() {
            tracing::debug!("Configuration file not found: {}", path.display());
            return Ok(None);
        }

        tracing::debug!("Loading configuration from: {}", path.display());
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
        let mut config: FileConfig = toml::from_str(&content)
            .map_err(|e| format!("Invalid config {}: {}", path.display(), e))?;

        if let Some(base) = path.parent() {
            config.rebase(base);
        }
        Ok(Some(config))
    }

    fn rebase(&mut self, base: &Path) {
        for path in [
            &mut self.project.path,
            &mut self.workbook.path,
            &mut self.workbook.credentials,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

impl Settings {
    /// Combines the file (if any) with the command line and loads the credentials.
    pub fn resolve(file: Option<FileConfig>, overrides: Overrides) -> Result<Settings, String> {
        let file = file.unwrap_or_default();

        let credentials = match overrides.credentials.or(file.workbook.credentials) {
            Some(path) => Some(SheetCredentials::from_file(&path).map_err(|e| e.to_string())?),
            None => None,
        };

        Ok(Settings {
            project: overrides.project.or(file.project.path),
            workbook: overrides.workbook.or(file.workbook.path),
            credentials,
        })
    }

    pub fn project_dir(&self) -> Result<&Path, String> {
        self.project.as_deref().ok_or_else(|| {
            format!(
                "No project directory; pass --project or set [project] path in {}",
                DEFAULT_CONFIG_FILE
            )
        })
    }

    /// The directory holding the sheets. With credentials, every spreadsheet gets its own
    /// subdirectory named after the spreadsheet id.
    pub fn workbook_dir(&self) -> Result<PathBuf, String> {
        let base = self.workbook.as_deref().ok_or_else(|| {
            format!(
                "No workbook directory; pass --workbook or set [workbook] path in {}",
                DEFAULT_CONFIG_FILE
            )
        })?;
        Ok(match &self.credentials {
            Some(credentials) => base.join(&credentials.spreadsheet_id),
            None => base.to_path_buf(),
        })
    }
}
