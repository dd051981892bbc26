//! Input validation utilities.
//!
//! These functions turn raw caller input into the validated types the tracker works with. They
//! run before any mutation, so a rejected request leaves the tracker untouched.

use crate::medication::Medication;
use crate::schedule::DoseTime;
use crate::{MedicationError, MedicationResult};
use medtrack_types::NonEmptyText;
use std::collections::HashSet;

/// Validates a required text field, naming the field in the error.
///
/// # Errors
///
/// Returns [`MedicationError::InvalidInput`] if `value` is empty or whitespace.
pub fn required_text(field: &str, value: &str) -> MedicationResult<NonEmptyText> {
    NonEmptyText::new(value)
        .map_err(|_| MedicationError::InvalidInput(format!("{} is required", field)))
}

/// Parses a schedule of dose times.
///
/// Every entry must be a valid `HH:MM` time and at least one entry is required. Blank entries
/// are rejected here; callers collecting raw form input drop them first.
///
/// # Errors
///
/// Returns [`MedicationError::InvalidInput`] if the schedule is empty or any entry is invalid.
pub fn parse_dose_times<S: AsRef<str>>(times: &[S]) -> MedicationResult<Vec<DoseTime>> {
    if times.is_empty() {
        return Err(MedicationError::InvalidInput(
            "at least one dose time is required".into(),
        ));
    }

    times.iter().map(|t| DoseTime::parse(t.as_ref())).collect()
}

/// Drops blank entries from a raw list of time inputs.
pub fn non_blank_times(times: &[String]) -> Vec<&str> {
    times
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Checks that no two medications in a collection share an id.
///
/// # Errors
///
/// Returns [`MedicationError::InvalidInput`] naming the first repeated id.
pub fn ensure_unique_ids(medications: &[Medication]) -> MedicationResult<()> {
    let mut seen = HashSet::with_capacity(medications.len());
    for med in medications {
        if !seen.insert(med.id()) {
            return Err(MedicationError::InvalidInput(format!(
                "duplicate medication id: {}",
                med.id()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_names_field() {
        match required_text("dosage", "  ") {
            Err(MedicationError::InvalidInput(msg)) => assert_eq!(msg, "dosage is required"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
        assert_eq!(required_text("name", "Aspirin").unwrap().as_str(), "Aspirin");
    }

    #[test]
    fn test_parse_dose_times_requires_at_least_one() {
        let empty: [&str; 0] = [];
        assert!(parse_dose_times(&empty).is_err());
    }

    #[test]
    fn test_parse_dose_times_rejects_blank_entry() {
        assert!(parse_dose_times(&["08:00", ""]).is_err());
    }

    #[test]
    fn test_parse_dose_times_keeps_order() {
        let parsed = parse_dose_times(&["20:00", "08:00"]).unwrap();
        let rendered: Vec<String> = parsed.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["20:00", "08:00"]);
    }

    #[test]
    fn test_non_blank_times_filters_and_trims() {
        let raw = vec!["08:00".to_string(), "  ".to_string(), " 20:00".to_string(), String::new()];
        assert_eq!(non_blank_times(&raw), vec!["08:00", "20:00"]);
    }
}
