//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services as an
//! `Arc<CoreConfig>`. Core code never reads environment variables itself; the binaries do that
//! and hand the resolved values to [`CoreConfig::new`].

use crate::constants::{DEFAULT_DATA_DIR, USERS_DIR_NAME};
use crate::{MedicationError, MedicationResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    seed_new_users: bool,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`MedicationError::InvalidInput`] if `data_dir` is empty.
    pub fn new(data_dir: PathBuf, seed_new_users: bool) -> MedicationResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(MedicationError::InvalidInput(
                "data_dir cannot be empty".into(),
            ));
        }

        Ok(Self {
            data_dir,
            seed_new_users,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn users_dir(&self) -> PathBuf {
        self.data_dir.join(USERS_DIR_NAME)
    }

    /// Whether a user with no stored record starts with the seed medications.
    pub fn seed_new_users(&self) -> bool {
        self.seed_new_users
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            seed_new_users: true,
        }
    }
}

/// Parse a boolean flag from an optional environment value.
///
/// Accepts `1/0`, `true/false`, `yes/no`, `on/off` in any case. Missing or blank values yield
/// `default`.
pub fn bool_from_env_value(value: Option<String>, default: bool) -> MedicationResult<bool> {
    let value = value
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty());

    match value.as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(MedicationError::InvalidInput(format!(
            "expected a boolean flag, got '{}'",
            other
        ))),
    }
}

/// Resolve the data directory from an optional override, falling back to the default.
pub fn data_dir_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_data_dir() {
        let result = CoreConfig::new(PathBuf::new(), true);
        assert!(matches!(result, Err(MedicationError::InvalidInput(_))));
    }

    #[test]
    fn test_users_dir_is_under_data_dir() {
        let cfg = CoreConfig::new(PathBuf::from("/tmp/medtrack"), false).unwrap();
        assert_eq!(cfg.users_dir(), PathBuf::from("/tmp/medtrack/users"));
        assert!(!cfg.seed_new_users());
    }

    #[test]
    fn test_bool_from_env_value() {
        assert!(bool_from_env_value(None, true).unwrap());
        assert!(!bool_from_env_value(Some("  ".into()), false).unwrap());
        assert!(bool_from_env_value(Some("YES".into()), false).unwrap());
        assert!(!bool_from_env_value(Some("off".into()), true).unwrap());
        assert!(bool_from_env_value(Some("maybe".into()), true).is_err());
    }

    #[test]
    fn test_data_dir_from_env_value_defaults() {
        assert_eq!(data_dir_from_env_value(None), PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(
            data_dir_from_env_value(Some(" /srv/meds ".into())),
            PathBuf::from("/srv/meds")
        );
    }
}
