//! Medication records and the inputs used to create them.
//!
//! A [`Medication`] keeps its dose schedule (`times`) and its per-slot completion flags (`taken`)
//! index-aligned: slot `i` is scheduled at `times[i]` and has been taken today iff `taken[i]`.
//! Fields are private so that alignment can only be changed through the tracker.

use chrono::NaiveTime;
use medtrack_types::NonEmptyText;
use medtrack_uuid::MedicationId;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::schedule::DoseTime;
use crate::validation::{non_blank_times, parse_dose_times, required_text};
use crate::{MedicationError, MedicationResult};

// ============================================================================
// COLOUR PALETTE
// ============================================================================

/// UI colour tag for a medication.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colour {
    #[default]
    Blue,
    Red,
    Green,
    Purple,
    Yellow,
    Pink,
    Indigo,
    Orange,
}

impl Colour {
    pub const ALL: [Colour; 8] = [
        Colour::Blue,
        Colour::Red,
        Colour::Green,
        Colour::Purple,
        Colour::Yellow,
        Colour::Pink,
        Colour::Indigo,
        Colour::Orange,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Colour::Blue => "blue",
            Colour::Red => "red",
            Colour::Green => "green",
            Colour::Purple => "purple",
            Colour::Yellow => "yellow",
            Colour::Pink => "pink",
            Colour::Indigo => "indigo",
            Colour::Orange => "orange",
        }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Colour {
    type Err = MedicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Colour::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| MedicationError::InvalidInput(format!("unknown colour: '{}'", s)))
    }
}

// ============================================================================
// MEDICATION
// ============================================================================

/// One prescribed drug regimen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredMedication")]
pub struct Medication {
    id: MedicationId,
    name: NonEmptyText,
    dosage: NonEmptyText,
    frequency: NonEmptyText,
    times: Vec<DoseTime>,
    taken: Vec<bool>,
    #[serde(rename = "color")]
    colour: Colour,
    reminder_enabled: bool,
}

/// Unchecked shape of a persisted medication, validated into [`Medication`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredMedication {
    id: MedicationId,
    name: NonEmptyText,
    dosage: NonEmptyText,
    frequency: NonEmptyText,
    times: Vec<DoseTime>,
    taken: Vec<bool>,
    #[serde(rename = "color", default)]
    colour: Colour,
    #[serde(default = "default_reminder")]
    reminder_enabled: bool,
}

fn default_reminder() -> bool {
    true
}

impl TryFrom<StoredMedication> for Medication {
    type Error = MedicationError;

    fn try_from(stored: StoredMedication) -> Result<Self, Self::Error> {
        if stored.times.is_empty() {
            return Err(MedicationError::InvalidInput(format!(
                "medication {} has no dose times",
                stored.id
            )));
        }
        if stored.taken.len() != stored.times.len() {
            return Err(MedicationError::InvalidInput(format!(
                "medication {} has {} taken flags for {} dose times",
                stored.id,
                stored.taken.len(),
                stored.times.len()
            )));
        }

        Ok(Self {
            id: stored.id,
            name: stored.name,
            dosage: stored.dosage,
            frequency: stored.frequency,
            times: stored.times,
            taken: stored.taken,
            colour: stored.colour,
            reminder_enabled: stored.reminder_enabled,
        })
    }
}

impl Medication {
    /// Builds a fresh record with every slot not yet taken.
    pub(crate) fn create(id: MedicationId, new: NewMedication) -> Self {
        let taken = vec![false; new.times.len()];
        Self {
            id,
            name: new.name,
            dosage: new.dosage,
            frequency: new.frequency,
            times: new.times,
            taken,
            colour: new.colour,
            reminder_enabled: new.reminder_enabled,
        }
    }

    /// Marks `slot` taken. Returns whether the flag changed, or `None` if the slot does not exist.
    pub(crate) fn mark_slot_taken(&mut self, slot: usize) -> Option<bool> {
        let flag = self.taken.get_mut(slot)?;
        let changed = !*flag;
        *flag = true;
        Some(changed)
    }

    pub fn id(&self) -> MedicationId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn dosage(&self) -> &str {
        self.dosage.as_str()
    }

    pub fn frequency(&self) -> &str {
        self.frequency.as_str()
    }

    pub fn times(&self) -> &[DoseTime] {
        &self.times
    }

    pub fn taken(&self) -> &[bool] {
        &self.taken
    }

    pub fn colour(&self) -> Colour {
        self.colour
    }

    pub fn reminder_enabled(&self) -> bool {
        self.reminder_enabled
    }

    pub fn slot_count(&self) -> usize {
        self.times.len()
    }

    pub fn taken_count(&self) -> usize {
        self.taken.iter().filter(|t| **t).count()
    }

    /// Whether the dose at `slot` has been taken, or `None` for an unknown slot.
    pub fn is_slot_taken(&self, slot: usize) -> Option<bool> {
        self.taken.get(slot).copied()
    }

    /// Whether the dose at `slot` is due at `now`. `None` for an unknown slot.
    pub fn is_slot_due(&self, slot: usize, now: NaiveTime) -> Option<bool> {
        self.times.get(slot).map(|t| t.is_due_at(now))
    }

    /// Iterates `(slot_index, time, taken)` for every slot.
    pub fn slots(&self) -> impl Iterator<Item = (usize, DoseTime, bool)> + '_ {
        self.times
            .iter()
            .zip(&self.taken)
            .enumerate()
            .map(|(i, (time, taken))| (i, *time, *taken))
    }
}

// ============================================================================
// NEW MEDICATION
// ============================================================================

/// Validated input for adding a medication.
///
/// Holding one of these means name, dosage and frequency are non-empty and the schedule has at
/// least one valid time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMedication {
    name: NonEmptyText,
    dosage: NonEmptyText,
    frequency: NonEmptyText,
    times: Vec<DoseTime>,
    colour: Colour,
    reminder_enabled: bool,
}

impl NewMedication {
    /// Creates a validated request with the default colour and reminders enabled.
    ///
    /// # Errors
    ///
    /// Returns [`MedicationError::InvalidInput`] if `times` is empty.
    pub fn new(
        name: NonEmptyText,
        dosage: NonEmptyText,
        frequency: NonEmptyText,
        times: Vec<DoseTime>,
    ) -> MedicationResult<Self> {
        if times.is_empty() {
            return Err(MedicationError::InvalidInput(
                "at least one dose time is required".into(),
            ));
        }

        Ok(Self {
            name,
            dosage,
            frequency,
            times,
            colour: Colour::default(),
            reminder_enabled: true,
        })
    }

    /// Validates raw strings into a request.
    ///
    /// # Errors
    ///
    /// Returns [`MedicationError::InvalidInput`] for a blank text field, an empty schedule or a
    /// time that is not `HH:MM`.
    pub fn parse<S: AsRef<str>>(
        name: &str,
        dosage: &str,
        frequency: &str,
        times: &[S],
    ) -> MedicationResult<Self> {
        let name = required_text("name", name)?;
        let dosage = required_text("dosage", dosage)?;
        let frequency = required_text("frequency", frequency)?;
        let times = parse_dose_times(times)?;
        Self::new(name, dosage, frequency, times)
    }

    pub fn with_colour(mut self, colour: Colour) -> Self {
        self.colour = colour;
        self
    }

    pub fn with_reminder(mut self, enabled: bool) -> Self {
        self.reminder_enabled = enabled;
        self
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn times(&self) -> &[DoseTime] {
        &self.times
    }
}

/// Raw add-medication form input.
///
/// Mirrors what a form collects: every field is a plain string, the time list may contain blank
/// rows the user never filled in, and colour/reminder may be left at their defaults.
#[derive(Clone, Debug, Default)]
pub struct MedicationForm {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub times: Vec<String>,
    pub color: Option<String>,
    pub reminder_enabled: Option<bool>,
}

impl MedicationForm {
    /// Drops blank time rows and validates the rest into a [`NewMedication`].
    ///
    /// # Errors
    ///
    /// Returns [`MedicationError::InvalidInput`] if any field fails validation, including the case
    /// where every time row was blank.
    pub fn into_new_medication(self) -> MedicationResult<NewMedication> {
        let times = non_blank_times(&self.times);
        let colour = match self.color.as_deref().map(str::trim) {
            None | Some("") => Colour::default(),
            Some(c) => c.parse()?,
        };

        Ok(
            NewMedication::parse(&self.name, &self.dosage, &self.frequency, &times)?
                .with_colour(colour)
                .with_reminder(self.reminder_enabled.unwrap_or(true)),
        )
    }
}

// ============================================================================
// READ VIEWS
// ============================================================================

/// One not-yet-taken dose slot, flattened for "what's next" displays.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingDose {
    pub medication_id: MedicationId,
    pub name: String,
    pub dosage: String,
    pub color: Colour,
    pub slot_index: usize,
    pub time: DoseTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_med(times: &[&str]) -> NewMedication {
        NewMedication::parse("Metformin", "500mg", "Twice daily", times).unwrap()
    }

    #[test]
    fn test_create_starts_all_untaken() {
        let med = Medication::create(MedicationId::new(), new_med(&["08:00", "14:00", "20:00"]));

        assert_eq!(med.taken(), &[false, false, false]);
        assert_eq!(med.slot_count(), 3);
        assert_eq!(med.taken_count(), 0);
        assert_eq!(med.colour(), Colour::Blue);
        assert!(med.reminder_enabled());
    }

    #[test]
    fn test_mark_slot_taken_reports_change() {
        let mut med = Medication::create(MedicationId::new(), new_med(&["08:00", "20:00"]));

        assert_eq!(med.mark_slot_taken(1), Some(true));
        assert_eq!(med.mark_slot_taken(1), Some(false));
        assert_eq!(med.mark_slot_taken(2), None);
        assert_eq!(med.taken(), &[false, true]);
    }

    #[test]
    fn test_slot_queries_handle_unknown_slots() {
        let mut med = Medication::create(MedicationId::new(), new_med(&["08:00", "20:00"]));
        med.mark_slot_taken(0);
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();

        assert_eq!(med.is_slot_taken(0), Some(true));
        assert_eq!(med.is_slot_taken(2), None);
        assert_eq!(med.is_slot_due(0, noon), Some(true));
        assert_eq!(med.is_slot_due(1, noon), Some(false));
        assert_eq!(med.is_slot_due(5, noon), None);
    }

    #[test]
    fn test_parse_rejects_blank_fields() {
        assert!(NewMedication::parse("", "500mg", "Once daily", &["08:00"]).is_err());
        assert!(NewMedication::parse("Aspirin", " ", "Once daily", &["08:00"]).is_err());
        assert!(NewMedication::parse("Aspirin", "81mg", "", &["08:00"]).is_err());
        let none: [&str; 0] = [];
        assert!(NewMedication::parse("Aspirin", "81mg", "Once daily", &none).is_err());
    }

    #[test]
    fn test_colour_parse_is_case_insensitive() {
        assert_eq!("Purple".parse::<Colour>().unwrap(), Colour::Purple);
        assert_eq!(" orange ".parse::<Colour>().unwrap(), Colour::Orange);
        assert!("teal".parse::<Colour>().is_err());
    }

    #[test]
    fn test_form_drops_blank_time_rows() {
        let form = MedicationForm {
            name: "Lisinopril".into(),
            dosage: "10mg".into(),
            frequency: "Once daily".into(),
            times: vec!["".into(), "08:00".into(), "   ".into()],
            color: Some("red".into()),
            reminder_enabled: Some(false),
        };

        let new = form.into_new_medication().unwrap();
        assert_eq!(new.times().len(), 1);
        assert_eq!(new.times()[0].to_string(), "08:00");
        assert_eq!(new.colour, Colour::Red);
        assert!(!new.reminder_enabled);
    }

    #[test]
    fn test_form_with_only_blank_times_is_rejected() {
        let form = MedicationForm {
            name: "Lisinopril".into(),
            dosage: "10mg".into(),
            frequency: "Once daily".into(),
            times: vec!["".into()],
            ..Default::default()
        };

        assert!(matches!(
            form.into_new_medication(),
            Err(MedicationError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_serialized_shape_uses_camel_case() {
        let id = MedicationId::parse("0123456789abcdef0123456789abcdef").unwrap();
        let med = Medication::create(id, new_med(&["08:00"]));
        let value = serde_json::to_value(&med).unwrap();

        assert_eq!(value["id"], "0123456789abcdef0123456789abcdef");
        assert_eq!(value["times"], serde_json::json!(["08:00"]));
        assert_eq!(value["taken"], serde_json::json!([false]));
        assert_eq!(value["color"], "blue");
        assert_eq!(value["reminderEnabled"], true);
    }

    #[test]
    fn test_deserialize_rejects_misaligned_taken() {
        let json = r#"{
            "id": "0123456789abcdef0123456789abcdef",
            "name": "Metformin",
            "dosage": "500mg",
            "frequency": "Twice daily",
            "times": ["08:00", "20:00"],
            "taken": [true],
            "color": "blue",
            "reminderEnabled": true
        }"#;

        let result: Result<Medication, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
