use chrono::NaiveDate;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::contact::Contact;
use crate::error::{Error, ErrorKind, Result};

/// Contacts persisted as a JSON file. A snapshot of the last good state is
/// kept next to it and used for recovery when the main file is unreadable.
pub struct ContactStore {
    path: PathBuf,
    contacts: Vec<Contact>,
}

impl ContactStore {
    pub fn open(path: &Path) -> Result<Self> {
        let contacts = match fs::read_to_string(path) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err.into()),
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(contacts) => contacts,
                Err(err) => {
                    log::warn!(
                        "contact file {} is unreadable ({}), trying backup",
                        path.display(),
                        err
                    );
                    Self::recover_from_backup(path)?
                }
            },
        };

        let store = ContactStore {
            path: path.to_path_buf(),
            contacts,
        };

        if let Err(err) = store.write_backup() {
            log::warn!("failed to write backup of {}: {}", path.display(), err);
        }

        Ok(store)
    }

    fn backup_path(path: &Path) -> PathBuf {
        PathBuf::from(format!("{}.bak", path.display()))
    }

    fn recover_from_backup(path: &Path) -> Result<Vec<Contact>> {
        let backup = Self::backup_path(path);
        let raw = fs::read_to_string(&backup).map_err(|err| {
            Error::new(
                ErrorKind::StoreCorrupt,
                &format!("no usable backup at {}: {}", backup.display(), err),
            )
        })?;
        let contacts: Vec<Contact> = serde_json::from_str(&raw).map_err(|err| {
            Error::new(
                ErrorKind::StoreCorrupt,
                &format!("backup {} is unreadable too: {}", backup.display(), err),
            )
        })?;

        log::warn!(
            "recovered {} contacts from backup {}",
            contacts.len(),
            backup.display()
        );
        Ok(contacts)
    }

    fn write_backup(&self) -> Result<()> {
        if self.contacts.is_empty() {
            return Ok(());
        }
        let backup = Self::backup_path(&self.path);
        fs::write(&backup, serde_json::to_string_pretty(&self.contacts)?)?;
        Ok(())
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write-then-rename so a failed write never clobbers the store.
        let tmp = PathBuf::from(format!("{}.tmp", self.path.display()));
        fs::write(&tmp, serde_json::to_string_pretty(&self.contacts)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn all(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Contact> {
        self.contacts.iter().find(|contact| contact.id == id)
    }

    pub fn find_by_name_dob(&self, name: &str, dob: NaiveDate) -> Option<&Contact> {
        self.contacts
            .iter()
            .find(|contact| contact.name == name && contact.dob == Some(dob))
    }

    pub fn add(
        &mut self,
        name: String,
        dob: Option<NaiveDate>,
        phone: Option<String>,
    ) -> Result<Contact> {
        let contact = Contact::new(name, dob, phone);
        self.contacts.push(contact.clone());
        self.save()?;
        Ok(contact)
    }

    pub fn update(&mut self, contact: Contact) -> Result<()> {
        match self.contacts.iter_mut().find(|c| c.id == contact.id) {
            Some(slot) => {
                *slot = contact;
                self.save()
            }
            None => Err(Error::new(
                ErrorKind::UnknownContact,
                &format!("no contact with id {}", contact.id),
            )),
        }
    }

    pub fn remove(&mut self, id: Uuid) -> Result<Contact> {
        match self.contacts.iter().position(|contact| contact.id == id) {
            Some(index) => {
                let removed = self.contacts.remove(index);
                self.save()?;
                Ok(removed)
            }
            None => Err(Error::new(
                ErrorKind::UnknownContact,
                &format!("no contact with id {}", id),
            )),
        }
    }
}
