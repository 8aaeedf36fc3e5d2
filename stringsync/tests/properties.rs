use std::collections::BTreeSet;

use proptest::prelude::*;
use stringsync::{
    Entry, Grid, LprojStorage, MemoryWorkbook, Parser, SheetStorage, Source, Storage,
    StringsFormat, formats::strings::patch_lines, sort_locales,
};
use tempfile::TempDir;

const LOCALES: &[&str] = &["en", "de", "ru", "fr", "ja"];

fn key() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_.]{0,10}").expect("valid key regex")
}

fn text() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 _\\-\\.,!\\?]{0,16}").expect("valid text regex")
}

fn locale() -> impl Strategy<Value = String> {
    prop::sample::select(LOCALES).prop_map(str::to_string)
}

fn entry() -> impl Strategy<Value = Entry> {
    (key(), prop::collection::btree_map(locale(), text(), 0..4)).prop_map(
        |(key, translations)| Entry { key, translations },
    )
}

fn source() -> impl Strategy<Value = Source> {
    prop::collection::vec(entry(), 0..8)
        .prop_map(|entries| Source::with_entries("Localizable", entries))
}

/// Sources where every entry has a text in every locale used by the source.
fn dense_source() -> impl Strategy<Value = Source> {
    (
        prop::collection::btree_set(locale(), 1..4),
        prop::collection::btree_set(key(), 0..8),
    )
        .prop_flat_map(|(locales, keys)| {
            let cells = locales.len() * keys.len();
            prop::collection::vec(text(), cells..=cells).prop_map(move |texts| {
                let mut texts = texts.into_iter();
                let entries = keys.iter().map(|key| {
                    locales.iter().fold(Entry::new(key.as_str()), |entry, locale| {
                        entry.with(locale.as_str(), texts.next().unwrap_or_default())
                    })
                });
                Source::with_entries("Localizable", entries.collect::<Vec<_>>())
            })
        })
}

fn keys_of(source: &Source) -> Vec<String> {
    source.entries().iter().map(|entry| entry.key.clone()).collect()
}

fn triples_of(source: &Source) -> BTreeSet<(String, String, String)> {
    source
        .triples()
        .map(|(key, locale, text)| (key.to_string(), locale.to_string(), text.to_string()))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn merge_prefers_right_then_left(left in source(), right in source()) {
        let merged = left.merge(&right);

        let keys: BTreeSet<&str> = left
            .entries()
            .iter()
            .chain(right.entries())
            .map(|entry| entry.key.as_str())
            .collect();
        prop_assert_eq!(merged.len(), keys.len());

        for key in keys {
            for locale in LOCALES {
                let expected = right
                    .translation(key, locale)
                    .or_else(|| left.translation(key, locale));
                prop_assert_eq!(merged.translation(key, locale), expected);
            }
        }
    }

    #[test]
    fn merge_keeps_left_order_then_appends(left in source(), right in source()) {
        let merged = left.merge(&right);
        let merged_keys = keys_of(&merged);
        let left_keys = keys_of(&left);

        prop_assert_eq!(&merged_keys[..left_keys.len()], left_keys.as_slice());
        let appended: Vec<String> = keys_of(&right)
            .into_iter()
            .filter(|key| left.entry(key).is_none())
            .collect();
        prop_assert_eq!(&merged_keys[left_keys.len()..], appended.as_slice());
    }

    #[test]
    fn merge_with_empty_is_identity(source in source()) {
        let empty = Source::new("Localizable");
        prop_assert_eq!(&source.merge(&empty), &source);
        prop_assert_eq!(triples_of(&empty.merge(&source)), triples_of(&source));
    }

    #[test]
    fn sorted_locales_put_en_first(locales in prop::collection::vec(locale(), 0..8)) {
        let sorted = sort_locales(&locales);

        let unique: BTreeSet<&String> = locales.iter().collect();
        prop_assert_eq!(sorted.len(), unique.len());
        if unique.iter().any(|locale| locale.as_str() == "en") {
            prop_assert_eq!(sorted[0].as_str(), "en");
        }
        let rest: Vec<&String> = sorted.iter().filter(|locale| locale.as_str() != "en").collect();
        prop_assert!(rest.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn strings_file_round_trips(source in dense_source()) {
        for locale in source.locales_in_use() {
            let mut written = Vec::new();
            StringsFormat::from_source(&source, &locale).to_writer(&mut written).unwrap();

            let mut read = Source::new("Localizable");
            StringsFormat::from_bytes(&written).unwrap().add_to(&mut read, &locale);

            for entry in source.entries() {
                prop_assert_eq!(read.translation(&entry.key, &locale), entry.get(&locale));
            }
        }
    }

    #[test]
    fn patch_never_changes_key_set(
        existing in prop::collection::btree_map(key(), text(), 0..6),
        updates in prop::collection::vec((key(), text()), 0..6),
    ) {
        let content: String = existing
            .iter()
            .map(|(key, text)| format!("// {key}\n\"{key}\" = \"{text}\";\n"))
            .collect();

        let patched = patch_lines(&content, &updates);
        let parsed = StringsFormat::from_str(&patched.content).unwrap();

        let keys: BTreeSet<&String> = parsed.pairs.iter().map(|pair| &pair.key).collect();
        prop_assert_eq!(keys, existing.keys().collect::<BTreeSet<_>>());
        prop_assert_eq!(patched.content.lines().count(), content.lines().count());

        for (key, text) in &updates {
            if existing.contains_key(key) {
                let last = updates.iter().rev().find(|(k, _)| k == key).map(|(_, t)| t);
                let pair = parsed.pairs.iter().find(|pair| &pair.key == key).unwrap();
                prop_assert_eq!(Some(&pair.value), last);
            } else {
                prop_assert!(patched.skipped.contains(key), "{} = {}", key, text);
            }
        }
    }

    // Blank cells read back as empty text, and blank cells at the end of a row are not
    // read back at all.
    #[test]
    fn sheet_storage_keeps_every_non_empty_text(source in source()) {
        let mut storage = SheetStorage::new(MemoryWorkbook::new());
        storage.save(&source).unwrap();

        let read = storage.get_by("Localizable").unwrap().unwrap();
        let written = triples_of(&source);
        let read_back = triples_of(&read);

        for triple in written.iter().filter(|(_, _, text)| !text.is_empty()) {
            prop_assert!(read_back.contains(triple), "{:?} was lost", triple);
        }
        for triple in read_back.difference(&written) {
            prop_assert_eq!(triple.2.as_str(), "");
        }

        let translated: Vec<String> = source
            .entries()
            .iter()
            .filter(|entry| entry.translations.values().any(|text| !text.is_empty()))
            .map(|entry| entry.key.clone())
            .collect();
        let read_keys = keys_of(&read);
        prop_assert!(translated.iter().all(|key| read_keys.contains(key)));
    }

    #[test]
    fn grid_round_trips_dense_sources(source in dense_source()) {
        let read = Grid::from_source(&source).to_source("Localizable");
        prop_assert_eq!(&read, &source);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn lproj_storage_round_trips_dense_sources(source in dense_source()) {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = LprojStorage::new(temp_dir.path()).unwrap();
        storage.save(&source).unwrap();

        match storage.get_by("Localizable").unwrap() {
            Some(read) => prop_assert_eq!(triples_of(&read), triples_of(&source)),
            None => prop_assert!(source.is_empty()),
        }
    }
}
