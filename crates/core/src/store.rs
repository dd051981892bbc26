//! Per-user medication persistence.
//!
//! Each user's collection is a single JSON document stored in a sharded directory derived from
//! the user id:
//!
//! ```text
//! <data_dir>/users/
//!   <s1>/
//!     <s2>/
//!       <user_id>/
//!         medications.json
//! ```
//!
//! where `s1` and `s2` are the first four hex characters of the user id. Writes go to a sibling
//! temp file first and are renamed into place, so a crash mid-write leaves the previous document
//! intact.

use crate::config::CoreConfig;
use crate::constants::MEDICATIONS_JSON_FILENAME;
use crate::medication::Medication;
use crate::validation::ensure_unique_ids;
use crate::{MedicationError, MedicationResult};
use medtrack_uuid::UserId;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Reads and writes medication collections keyed by user id.
#[derive(Clone, Debug)]
pub struct MedicationStore {
    cfg: Arc<CoreConfig>,
}

impl MedicationStore {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    /// Directory holding `user`'s record.
    pub fn user_dir(&self, user: &UserId) -> PathBuf {
        user.sharded_dir(&self.cfg.users_dir())
    }

    /// Path of `user`'s medications document.
    pub fn medications_path(&self, user: &UserId) -> PathBuf {
        self.user_dir(user).join(MEDICATIONS_JSON_FILENAME)
    }

    /// Loads `user`'s collection.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if the user has no stored record yet.
    ///
    /// # Errors
    ///
    /// Returns [`MedicationError::FileRead`] if the file exists but cannot be read, or
    /// [`MedicationError::Deserialization`] if its contents are not a valid collection, or
    /// [`MedicationError::InvalidInput`] if two records share an id.
    pub fn load(&self, user: &UserId) -> MedicationResult<Option<Vec<Medication>>> {
        let path = self.medications_path(user);
        let contents = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(MedicationError::FileRead(e)),
        };

        let medications: Vec<Medication> =
            serde_json::from_str(&contents).map_err(MedicationError::Deserialization)?;
        ensure_unique_ids(&medications)?;
        tracing::debug!(
            user = %user,
            count = medications.len(),
            "loaded medications from {}",
            path.display()
        );
        Ok(Some(medications))
    }

    /// Replaces `user`'s stored collection with `medications`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the directory cannot be created or the file cannot be written.
    pub fn save(&self, user: &UserId, medications: &[Medication]) -> MedicationResult<()> {
        let dir = self.user_dir(user);
        fs::create_dir_all(&dir).map_err(MedicationError::StorageDirCreation)?;

        let json =
            serde_json::to_string_pretty(medications).map_err(MedicationError::Serialization)?;
        let path = dir.join(MEDICATIONS_JSON_FILENAME);
        write_atomically(&path, json.as_bytes())?;

        tracing::debug!(user = %user, count = medications.len(), "saved medications");
        Ok(())
    }

    /// Lists user ids that have a stored record.
    ///
    /// Entries that do not look like sharded user directories are skipped.
    pub fn list_users(&self) -> Vec<UserId> {
        let mut users = Vec::new();
        let Ok(s1_iter) = fs::read_dir(self.cfg.users_dir()) else {
            return users;
        };

        for s1 in s1_iter.flatten() {
            let Ok(s2_iter) = fs::read_dir(s1.path()) else {
                continue;
            };
            for s2 in s2_iter.flatten() {
                let Ok(id_iter) = fs::read_dir(s2.path()) else {
                    continue;
                };
                for id_ent in id_iter.flatten() {
                    let id_path = id_ent.path();
                    if !id_path.join(MEDICATIONS_JSON_FILENAME).is_file() {
                        continue;
                    }
                    let parsed = id_path
                        .file_name()
                        .and_then(|os| os.to_str())
                        .map(UserId::parse);
                    match parsed {
                        Some(Ok(user)) => users.push(user),
                        _ => tracing::warn!("skipping unexpected entry: {}", id_path.display()),
                    }
                }
            }
        }

        users
    }

    /// The only user with a stored record, if there is exactly one.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if no user has a record yet.
    ///
    /// # Errors
    ///
    /// Returns [`MedicationError::InvalidInput`] if several users have records, since none of
    /// them is an obvious default.
    pub fn sole_user(&self) -> MedicationResult<Option<UserId>> {
        let mut users = self.list_users();
        match users.len() {
            0 | 1 => Ok(users.pop()),
            n => Err(MedicationError::InvalidInput(format!(
                "{} users have stored records, pick one explicitly",
                n
            ))),
        }
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> MedicationResult<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes).map_err(MedicationError::FileWrite)?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        MedicationError::FileWrite(e)
    })
}
