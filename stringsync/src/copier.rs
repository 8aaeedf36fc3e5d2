//! Bulk transfer of sources from one storage to another.
//!
//! Both operations run source by source and stop at the first error. Sources written
//! before the failure stay written.

use tracing::info;

use crate::{error::Error, traits::Storage};

/// Names of the sources a copy handed to the destination, in transfer order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    pub sources: Vec<String>,
}

impl CopyReport {
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Saves every source of `from` (or the ones named in `names`) into `to`, merging with
/// what `to` already has.
pub fn copy<F, T>(from: &F, to: &mut T, names: Option<&[String]>) -> Result<CopyReport, Error>
where
    F: Storage + ?Sized,
    T: Storage + ?Sized,
{
    let mut report = CopyReport::default();
    for source in from.get_all(names)? {
        info!(source = %source.name(), entries = source.len(), "Copying source");
        to.save(&source)?;
        report.sources.push(source.name().to_string());
    }
    Ok(report)
}

/// Updates keys `to` already has with the values from every source of `from` (or the
/// ones named in `names`). Never adds keys to `to`.
pub fn update_existing<F, T>(
    from: &F,
    to: &mut T,
    names: Option<&[String]>,
) -> Result<CopyReport, Error>
where
    F: Storage + ?Sized,
    T: Storage + ?Sized,
{
    let mut report = CopyReport::default();
    for source in from.get_all(names)? {
        info!(source = %source.name(), entries = source.len(), "Updating existing keys");
        to.update_existing(&source)?;
        report.sources.push(source.name().to_string());
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        storage::{MemoryWorkbook, SheetStorage},
        types::{Entry, Source},
    };

    /// Records calls; fails `save` for one source name.
    #[derive(Default)]
    struct Recorder {
        sources: Vec<Source>,
        saved: Vec<String>,
        updated: Vec<String>,
        fail_on: Option<String>,
    }

    impl Storage for Recorder {
        fn get_all(&self, names: Option<&[String]>) -> Result<Vec<Source>, Error> {
            Ok(self
                .sources
                .iter()
                .filter(|source| names.is_none_or(|names| names.iter().any(|n| n == source.name())))
                .cloned()
                .collect())
        }

        fn save(&mut self, source: &Source) -> Result<(), Error> {
            if self.fail_on.as_deref() == Some(source.name()) {
                return Err(Error::unsupported("save"));
            }
            self.saved.push(source.name().to_string());
            Ok(())
        }

        fn update_existing(&mut self, source: &Source) -> Result<(), Error> {
            self.updated.push(source.name().to_string());
            Ok(())
        }

        fn delete_all(&mut self, _name: &str) -> Result<(), Error> {
            Ok(())
        }
    }

    fn recorder_with(names: &[&str]) -> Recorder {
        Recorder {
            sources: names
                .iter()
                .map(|name| Source::with_entries(*name, vec![Entry::new("k").with("en", *name)]))
                .collect(),
            ..Recorder::default()
        }
    }

    #[test]
    fn test_copy_saves_every_source_in_order() {
        let from = recorder_with(&["Main", "Localizable", "InfoPlist"]);
        let mut to = Recorder::default();

        let report = copy(&from, &mut to, None).unwrap();

        assert_eq!(to.saved, vec!["Main", "Localizable", "InfoPlist"]);
        assert_eq!(report.sources, to.saved);
    }

    #[test]
    fn test_copy_respects_name_filter() {
        let from = recorder_with(&["Main", "Localizable"]);
        let mut to = Recorder::default();
        let names = vec!["Localizable".to_string()];

        let report = copy(&from, &mut to, Some(&names)).unwrap();

        assert_eq!(report.len(), 1);
        assert_eq!(to.saved, vec!["Localizable"]);
    }

    #[test]
    fn test_copy_aborts_on_first_error() {
        let from = recorder_with(&["Main", "Localizable", "InfoPlist"]);
        let mut to = Recorder {
            fail_on: Some("Localizable".to_string()),
            ..Recorder::default()
        };

        assert!(copy(&from, &mut to, None).is_err());
        assert_eq!(to.saved, vec!["Main"]);
    }

    #[test]
    fn test_update_existing_delegates_to_destination() {
        let from = recorder_with(&["Main", "Localizable"]);
        let mut to = Recorder::default();

        let report = update_existing(&from, &mut to, None).unwrap();

        assert_eq!(to.updated, vec!["Main", "Localizable"]);
        assert!(to.saved.is_empty());
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_copy_between_workbooks_through_trait_objects() {
        let from = SheetStorage::new(MemoryWorkbook::new());
        let mut to = SheetStorage::new(MemoryWorkbook::new());
        let from: &dyn Storage = &from;
        let to: &mut dyn Storage = &mut to;

        let report = copy(from, to, None).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_update_existing_into_workbook_is_unsupported() {
        let from = recorder_with(&["Main"]);
        let mut to = SheetStorage::new(MemoryWorkbook::new());
        assert!(matches!(
            update_existing(&from, &mut to, None),
            Err(Error::Unsupported(_))
        ));
    }
}
