//! Constants used throughout the MedTrack core crate.

/// Default directory for persisted data when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "medtrack_data";

/// Directory under the data dir holding per-user sharded records.
pub const USERS_DIR_NAME: &str = "users";

/// Filename for a user's serialised medication collection.
pub const MEDICATIONS_JSON_FILENAME: &str = "medications.json";

/// Number of upcoming doses shown when the caller does not ask for a specific count.
pub const DEFAULT_UPCOMING_LIMIT: usize = 3;

/// Frequency labels offered by the add-medication form. Free text is still accepted.
pub const FREQUENCY_PRESETS: [&str; 5] = [
    "Once daily",
    "Twice daily",
    "Three times daily",
    "Four times daily",
    "As needed",
];
