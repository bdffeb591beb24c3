use chrono::NaiveDate;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};
use crate::store::ContactStore;

pub mod csv;
pub mod ics;
pub mod json;

/// A contact as read from an import file, before it has an identity in
/// the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Imported {
    pub name: String,
    pub dob: NaiveDate,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Json,
    Ics,
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Format::Csv),
            "json" => Ok(Format::Json),
            "ics" => Ok(Format::Ics),
            other => Err(Error::new(
                ErrorKind::UnknownFormat,
                &format!("'{}' is not one of csv, json, ics", other),
            )),
        }
    }
}

impl Format {
    pub fn from_path(path: &Path) -> Option<Format> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportOutcome {
    pub added: usize,
    pub updated: usize,
}

/// Folds imported entries into the store. An entry matching an existing
/// contact by name and date of birth updates that contact's phone number;
/// anything else is added as a new contact.
pub fn merge_imported(store: &mut ContactStore, imported: Vec<Imported>) -> Result<ImportOutcome> {
    let mut outcome = ImportOutcome::default();

    for entry in imported {
        match store.find_by_name_dob(&entry.name, entry.dob) {
            Some(existing) => {
                let mut updated = existing.clone();
                if entry.phone.is_some() {
                    updated.phone = entry.phone;
                }
                store.update(updated)?;
                outcome.updated += 1;
            }
            None => {
                store.add(entry.name, Some(entry.dob), entry.phone)?;
                outcome.added += 1;
            }
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn scratch_store() -> (ContactStore, PathBuf) {
        let path = std::env::temp_dir().join(format!("natalis-merge-{}.json", Uuid::new_v4()));
        (ContactStore::open(&path).unwrap(), path)
    }

    #[test]
    fn format_from_str_and_path() {
        assert_eq!("CSV".parse::<Format>().unwrap(), Format::Csv);
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        assert!("xml".parse::<Format>().is_err());
        assert_eq!(
            Format::from_path(Path::new("birthdays_export.ics")),
            Some(Format::Ics)
        );
        assert_eq!(Format::from_path(Path::new("birthdays")), None);
    }

    #[test]
    fn merge_adds_new_and_updates_matching() {
        let (mut store, path) = scratch_store();
        store
            .add("Amara".to_owned(), Some(date(1990, 7, 15)), None)
            .unwrap();

        let outcome = merge_imported(
            &mut store,
            vec![
                Imported {
                    name: "Amara".to_owned(),
                    dob: date(1990, 7, 15),
                    phone: Some("+995 555 111111".to_owned()),
                },
                Imported {
                    name: "Beka".to_owned(),
                    dob: date(1985, 12, 24),
                    phone: None,
                },
            ],
        )
        .unwrap();

        assert_eq!(outcome, ImportOutcome { added: 1, updated: 1 });
        assert_eq!(store.len(), 2);
        assert_eq!(
            store
                .find_by_name_dob("Amara", date(1990, 7, 15))
                .unwrap()
                .phone
                .as_deref(),
            Some("+995 555 111111")
        );
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn merge_keeps_existing_phone_when_import_has_none() {
        let (mut store, path) = scratch_store();
        store
            .add(
                "Amara".to_owned(),
                Some(date(1990, 7, 15)),
                Some("+995 555 000000".to_owned()),
            )
            .unwrap();

        merge_imported(
            &mut store,
            vec![Imported {
                name: "Amara".to_owned(),
                dob: date(1990, 7, 15),
                phone: None,
            }],
        )
        .unwrap();

        assert_eq!(
            store
                .find_by_name_dob("Amara", date(1990, 7, 15))
                .unwrap()
                .phone
                .as_deref(),
            Some("+995 555 000000")
        );
        let _ = fs::remove_file(&path);
    }
}
