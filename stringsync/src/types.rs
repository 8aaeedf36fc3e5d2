//! Core, backend-agnostic types for stringsync.
//! Codecs decode into these; storages serialize these.

use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet, HashMap},
    fmt::Display,
};

use serde::{Deserialize, Serialize};

use crate::{error::Error, traits::Parser};

/// The locale that always comes first when locales are enumerated.
pub const PRIMARY_LOCALE: &str = "en";

impl Parser for Vec<Source> {
    /// Parse from any reader.
    fn from_reader<R: std::io::BufRead>(reader: R) -> Result<Self, Error> {
        serde_json::from_reader(reader).map_err(Error::Json)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: std::io::Write>(&self, mut writer: W) -> Result<(), Error> {
        serde_json::to_writer_pretty(&mut writer, self).map_err(Error::Json)
    }
}

/// One localizable resource (a screen, a storyboard, `Localizable`, ...) and all of its
/// entries across every locale.
///
/// Entries keep the order in which they were first added. Keys are unique: adding a
/// translation for a known key updates the existing entry in place.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "SourceData", into = "SourceData")]
pub struct Source {
    name: String,
    entries: Vec<Entry>,
    positions: HashMap<String, usize>,
}

#[derive(Clone, Deserialize, Serialize)]
struct SourceData {
    name: String,
    #[serde(default)]
    entries: Vec<Entry>,
}

impl From<SourceData> for Source {
    fn from(value: SourceData) -> Self {
        Source::with_entries(value.name, value.entries)
    }
}

impl From<Source> for SourceData {
    fn from(value: Source) -> Self {
        SourceData {
            name: value.name,
            entries: value.entries,
        }
    }
}

impl Source {
    /// Creates an empty source.
    pub fn new(name: impl Into<String>) -> Self {
        Source {
            name: name.into(),
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Creates a source from a list of entries. Entries sharing a key are folded into
    /// the first one, later values winning per locale.
    pub fn with_entries(name: impl Into<String>, entries: impl IntoIterator<Item = Entry>) -> Self {
        let mut source = Source::new(name);
        for entry in entries {
            let slot = source.slot(entry.key);
            source.entries[slot].translations.extend(entry.translations);
        }
        source
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.positions.get(key).map(|&position| &self.entries[position])
    }

    pub fn translation(&self, key: &str, locale: &str) -> Option<&str> {
        self.entry(key).and_then(|entry| entry.get(locale))
    }

    /// Sets the `locale` text of `key`, appending a new entry if the key is unknown.
    pub fn add_translation(
        &mut self,
        key: impl Into<String>,
        locale: impl Into<String>,
        text: impl Into<String>,
    ) {
        let slot = self.slot(key.into());
        self.entries[slot]
            .translations
            .insert(locale.into(), text.into());
    }

    /// Every locale used by at least one entry, `en` first and the rest ascending.
    pub fn locales_in_use(&self) -> Vec<String> {
        let locales: BTreeSet<&str> = self
            .entries
            .iter()
            .flat_map(|entry| entry.translations.keys().map(String::as_str))
            .collect();
        sort_locales(locales)
    }

    /// Returns `self ⊕ other`: entries matched by key, `other` winning per locale.
    ///
    /// The result lists all of `self`'s entries in their order, followed by the entries
    /// only `other` has, in their order. Neither input is modified.
    pub fn merge(&self, other: &Source) -> Source {
        let mut merged = self.clone();
        for entry in &other.entries {
            let slot = merged.slot(entry.key.clone());
            merged.entries[slot].translations.extend(
                entry
                    .translations
                    .iter()
                    .map(|(locale, text)| (locale.clone(), text.clone())),
            );
        }
        merged
    }

    /// Every `(key, locale, text)` triple, in entry order.
    pub fn triples(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.entries.iter().flat_map(|entry| {
            entry
                .translations
                .iter()
                .map(move |(locale, text)| (entry.key.as_str(), locale.as_str(), text.as_str()))
        })
    }

    fn slot(&mut self, key: String) -> usize {
        if let Some(&position) = self.positions.get(&key) {
            return position;
        }
        let position = self.entries.len();
        self.positions.insert(key.clone(), position);
        self.entries.push(Entry::new(key));
        position
    }
}

impl Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Source {{ name: {}, entries: {}, locales: [{}] }}",
            self.name,
            self.entries.len(),
            self.locales_in_use().join(", ")
        )
    }
}

/// A single translation key and its text in every locale that has one.
///
/// A locale missing from `translations` has no translation; an empty string is a
/// translation that happens to be empty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Entry {
    pub key: String,
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
}

impl Entry {
    pub fn new(key: impl Into<String>) -> Self {
        Entry {
            key: key.into(),
            translations: BTreeMap::new(),
        }
    }

    /// Builder-style helper setting one translation.
    pub fn with(mut self, locale: impl Into<String>, text: impl Into<String>) -> Self {
        self.translations.insert(locale.into(), text.into());
        self
    }

    pub fn get(&self, locale: &str) -> Option<&str> {
        self.translations.get(locale).map(String::as_str)
    }
}

impl Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Entry {{ key: {}, locales: {} }}",
            self.key,
            self.translations.len()
        )
    }
}

/// Sorts locales for display and serialization: `en` first, then ascending.
/// Duplicates are removed.
pub fn sort_locales<I, S>(locales: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut sorted: Vec<String> = locales
        .into_iter()
        .map(|locale| locale.as_ref().to_string())
        .collect();
    sorted.sort_by(|a, b| compare_locales(a, b));
    sorted.dedup();
    sorted
}

fn compare_locales(a: &str, b: &str) -> Ordering {
    match (a == PRIMARY_LOCALE, b == PRIMARY_LOCALE) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}
