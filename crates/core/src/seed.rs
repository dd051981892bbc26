//! Seed medications.
//!
//! The fixed starting collection a new user sees before adding anything. It is also the standard
//! fixture for adherence tests: six dose slots, three of them taken.

use medtrack_uuid::MedicationId;

use crate::medication::{Colour, Medication, NewMedication};
use crate::tracker::MedicationTracker;
use crate::MedicationResult;

struct SeedEntry {
    name: &'static str,
    dosage: &'static str,
    frequency: &'static str,
    times: &'static [&'static str],
    taken: &'static [bool],
    colour: Colour,
}

const SEED: [SeedEntry; 5] = [
    SeedEntry {
        name: "Metformin",
        dosage: "500mg",
        frequency: "Twice daily",
        times: &["08:00", "20:00"],
        taken: &[true, false],
        colour: Colour::Blue,
    },
    SeedEntry {
        name: "Lisinopril",
        dosage: "10mg",
        frequency: "Once daily",
        times: &["08:00"],
        taken: &[false],
        colour: Colour::Red,
    },
    SeedEntry {
        name: "Atorvastatin",
        dosage: "20mg",
        frequency: "Once daily",
        times: &["22:00"],
        taken: &[false],
        colour: Colour::Green,
    },
    SeedEntry {
        name: "Aspirin",
        dosage: "81mg",
        frequency: "Once daily",
        times: &["08:00"],
        taken: &[true],
        colour: Colour::Purple,
    },
    SeedEntry {
        name: "Vitamin D",
        dosage: "1000 IU",
        frequency: "Once daily",
        times: &["08:00"],
        taken: &[true],
        colour: Colour::Yellow,
    },
];

/// Builds the seed collection with fresh ids.
pub fn seed_medications() -> MedicationResult<Vec<Medication>> {
    SEED.iter()
        .map(|entry| {
            let new = NewMedication::parse(entry.name, entry.dosage, entry.frequency, entry.times)?
                .with_colour(entry.colour);
            let mut medication = Medication::create(MedicationId::new(), new);
            for (slot, taken) in entry.taken.iter().enumerate() {
                if *taken {
                    medication.mark_slot_taken(slot);
                }
            }
            Ok(medication)
        })
        .collect()
}

impl MedicationTracker {
    /// A tracker holding the seed medications.
    ///
    /// # Errors
    ///
    /// Only if the seed table itself is malformed.
    pub fn seeded() -> MedicationResult<Self> {
        seed_medications().and_then(Self::from_medications)
    }
}

#[cfg(test)]
pub(crate) fn seeded_tracker() -> MedicationTracker {
    MedicationTracker::seeded().expect("seed data is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_matches_fixture() {
        let meds = seed_medications().unwrap();

        let summary: Vec<(&str, Vec<String>, Vec<bool>)> = meds
            .iter()
            .map(|m| {
                (
                    m.name(),
                    m.times().iter().map(ToString::to_string).collect(),
                    m.taken().to_vec(),
                )
            })
            .collect();

        let expected: Vec<(&str, Vec<String>, Vec<bool>)> = vec![
            ("Metformin", vec!["08:00".into(), "20:00".into()], vec![true, false]),
            ("Lisinopril", vec!["08:00".into()], vec![false]),
            ("Atorvastatin", vec!["22:00".into()], vec![false]),
            ("Aspirin", vec!["08:00".into()], vec![true]),
            ("Vitamin D", vec!["08:00".into()], vec![true]),
        ];
        assert_eq!(summary, expected);
    }

    #[test]
    fn test_seed_ids_are_distinct() {
        let meds = seed_medications().unwrap();
        let mut ids: Vec<_> = meds.iter().map(Medication::id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }
}
