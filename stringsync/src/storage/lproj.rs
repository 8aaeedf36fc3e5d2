//! Storage over an Xcode project directory: `<root>/<locale>.lproj/<Source>.strings`.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use crate::{
    error::Error,
    formats::{StringsFormat, strings},
    traits::{Parser, Storage},
    types::{Source, sort_locales},
};

lazy_static! {
    // Two-character locale code followed by the bundle suffix, e.g. `en.lproj`.
    static ref LOCALE_DIR_REGEX: Regex = Regex::new(r"^(.{2})\.lproj$").unwrap();
}

const STRINGS_EXTENSION: &str = "strings";

/// Reads and writes sources as Apple `.strings` files, one directory per locale.
#[derive(Debug, Clone)]
pub struct LprojStorage {
    root: PathBuf,
}

impl LprojStorage {
    /// Opens the project directory at `root`.
    ///
    /// Fails with [`Error::NotADirectory`] if `root` does not exist or is a file.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, Error> {
        let storage = LprojStorage { root: root.into() };
        storage.project_dir()?;
        Ok(storage)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn project_dir(&self) -> Result<&Path, Error> {
        if !self.root.is_dir() {
            return Err(Error::NotADirectory(self.root.clone()));
        }
        Ok(&self.root)
    }

    /// Existing locale directories, `en` first and the rest ascending.
    fn locale_dirs(&self) -> Result<Vec<(String, PathBuf)>, Error> {
        let mut dirs = BTreeMap::new();
        for dir_entry in fs::read_dir(self.project_dir()?)? {
            let path = dir_entry?.path();
            if !path.is_dir() {
                continue;
            }
            let Some(dir_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if let Some(captures) = LOCALE_DIR_REGEX.captures(dir_name) {
                dirs.insert(captures[1].to_string(), path.clone());
            }
        }

        Ok(sort_locales(dirs.keys())
            .into_iter()
            .filter_map(|locale| dirs.remove(&locale).map(|path| (locale, path)))
            .collect())
    }

    fn strings_path(root: &Path, locale: &str, name: &str) -> PathBuf {
        root.join(format!("{locale}.lproj"))
            .join(format!("{name}.{STRINGS_EXTENSION}"))
    }
}

/// `.strings` files of a locale directory, sorted by file name.
fn strings_files(dir: &Path) -> Result<Vec<(String, PathBuf)>, Error> {
    let mut files = Vec::new();
    for dir_entry in fs::read_dir(dir)? {
        let path = dir_entry?.path();
        if !path.is_file()
            || path.extension().and_then(|ext| ext.to_str()) != Some(STRINGS_EXTENSION)
        {
            continue;
        }
        if let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) {
            files.push((name.to_string(), path.clone()));
        }
    }
    files.sort();
    Ok(files)
}

impl Storage for LprojStorage {
    /// Sources come out in the order they are first found, walking locale directories
    /// with `en` first; a file without any pairs still yields an empty source.
    fn get_all(&self, names: Option<&[String]>) -> Result<Vec<Source>, Error> {
        let mut sources: Vec<Source> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for (locale, dir) in self.locale_dirs()? {
            for (name, path) in strings_files(&dir)? {
                if names.is_some_and(|names| !names.contains(&name)) {
                    continue;
                }

                debug!(path = %path.display(), %locale, "Reading strings file");
                let format = StringsFormat::read_from(&path)?;

                let position = *positions.entry(name.clone()).or_insert_with(|| {
                    sources.push(Source::new(name.as_str()));
                    sources.len() - 1
                });
                format.add_to(&mut sources[position], &locale);
            }
        }

        Ok(sources)
    }

    fn save(&mut self, source: &Source) -> Result<(), Error> {
        let root = self.project_dir()?;

        let merged = match self.get_by(source.name())? {
            Some(existing) => existing.merge(source),
            None => source.clone(),
        };

        for locale in merged.locales_in_use() {
            let path = Self::strings_path(root, &locale, merged.name());
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            debug!(path = %path.display(), entries = merged.len(), "Writing strings file");
            StringsFormat::from_source(&merged, &locale).write_to(&path)?;
        }

        Ok(())
    }

    /// Locales without an existing file for the source are skipped; no file is created.
    fn update_existing(&mut self, source: &Source) -> Result<(), Error> {
        let root = self.project_dir()?;

        for locale in source.locales_in_use() {
            let path = Self::strings_path(root, &locale, source.name());
            if !path.is_file() {
                debug!(path = %path.display(), "No strings file to update, skipping");
                continue;
            }

            let updates: Vec<(&str, &str)> = source
                .entries()
                .iter()
                .filter_map(|entry| entry.get(&locale).map(|text| (entry.key.as_str(), text)))
                .collect();

            let patched = strings::patch_lines(&strings::read_text(&path)?, &updates);
            fs::write(&path, patched.content)?;
            debug!(
                path = %path.display(),
                updated = patched.updated,
                skipped = patched.skipped.len(),
                "Patched strings file"
            );
            if !patched.skipped.is_empty() {
                warn!(
                    path = %path.display(),
                    keys = ?patched.skipped,
                    "Keys not present in strings file were not added"
                );
            }
        }

        Ok(())
    }

    fn delete_all(&mut self, name: &str) -> Result<(), Error> {
        for (locale, _) in self.locale_dirs()? {
            let path = Self::strings_path(self.project_dir()?, &locale, name);
            if path.is_file() {
                debug!(path = %path.display(), "Removing strings file");
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_dir_regex() {
        assert!(LOCALE_DIR_REGEX.is_match("en.lproj"));
        assert!(LOCALE_DIR_REGEX.is_match("ru.lproj"));
        assert!(!LOCALE_DIR_REGEX.is_match("Base.lproj"));
        assert!(!LOCALE_DIR_REGEX.is_match("pt-BR.lproj"));
        assert!(!LOCALE_DIR_REGEX.is_match("en.lproj.bak"));
    }

    #[test]
    fn test_new_rejects_missing_directory() {
        let error = LprojStorage::new("/definitely/not/here").unwrap_err();
        assert!(matches!(error, Error::NotADirectory(_)));
    }

    #[test]
    fn test_strings_path() {
        assert_eq!(
            LprojStorage::strings_path(Path::new("/app"), "de", "Main"),
            PathBuf::from("/app/de.lproj/Main.strings")
        );
    }
}
