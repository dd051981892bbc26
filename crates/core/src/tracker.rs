//! The medication adherence tracker.
//!
//! [`MedicationTracker`] is the authoritative owner of a user's medication collection and the
//! only place where per-slot taken flags change. Consumers get shared references to the records
//! and call back into the tracker to mutate them.
//!
//! State is "today only": there is no midnight rollover and no history. A slot moves from not
//! taken to taken exactly once and never back.

use chrono::NaiveTime;
use medtrack_uuid::MedicationId;

use crate::medication::{Medication, NewMedication, UpcomingDose};
use crate::validation::ensure_unique_ids;
use crate::{MedicationError, MedicationResult};

/// Aggregate adherence for the current day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DailyProgress {
    pub taken_doses: usize,
    pub total_doses: usize,
    pub progress_percentage: u8,
}

impl DailyProgress {
    /// Builds the aggregate from raw counts, rounding the percentage half-up.
    ///
    /// Uses integer arithmetic so that results are exact: `1/3` gives 33, `2/3` gives 67, and
    /// `1/8` (12.5%) gives 13.
    pub fn from_counts(taken_doses: usize, total_doses: usize) -> Self {
        let progress_percentage = if total_doses == 0 {
            0
        } else {
            let taken = taken_doses.min(total_doses) as u64;
            let total = total_doses as u64;
            ((taken * 200 + total) / (total * 2)) as u8
        };

        Self {
            taken_doses,
            total_doses,
            progress_percentage,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total_doses > 0 && self.taken_doses == self.total_doses
    }
}

/// Owns the medication collection and its per-slot completion state.
#[derive(Clone, Debug, Default)]
pub struct MedicationTracker {
    medications: Vec<Medication>,
}

impl MedicationTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a tracker from a previously persisted collection.
    ///
    /// # Errors
    ///
    /// Returns [`MedicationError::InvalidInput`] if two records share an id.
    pub fn from_medications(medications: Vec<Medication>) -> MedicationResult<Self> {
        ensure_unique_ids(&medications)?;
        Ok(Self { medications })
    }

    /// Releases the collection, for example to hand it to a store.
    pub fn into_medications(self) -> Vec<Medication> {
        self.medications
    }

    /// Adds a medication and returns the stored record.
    ///
    /// The record gets a freshly allocated id and a `taken` flag per dose time, all `false`.
    /// Input is validated when the [`NewMedication`] is built.
    pub fn add_medication(&mut self, new: NewMedication) -> Medication {
        let mut id = MedicationId::new();
        while self.medication(id).is_some() {
            id = MedicationId::new();
        }

        let medication = Medication::create(id, new);
        tracing::info!(
            medication_id = %medication.id(),
            name = medication.name(),
            slots = medication.slot_count(),
            "medication added"
        );

        self.medications.push(medication.clone());
        medication
    }

    /// Marks the dose at `slot` of medication `id` as taken.
    ///
    /// Marking an already-taken slot is a no-op. No other record or slot is touched.
    ///
    /// # Errors
    ///
    /// - [`MedicationError::MedicationNotFound`] if no medication has `id`.
    /// - [`MedicationError::DoseSlotOutOfRange`] if `slot` is not a valid index into its schedule.
    ///
    /// In both cases the tracker is left unchanged.
    pub fn mark_medication_taken(&mut self, id: MedicationId, slot: usize) -> MedicationResult<()> {
        let medication = self
            .medications
            .iter_mut()
            .find(|m| m.id() == id)
            .ok_or(MedicationError::MedicationNotFound(id))?;

        let slots = medication.slot_count();
        let changed = medication
            .mark_slot_taken(slot)
            .ok_or(MedicationError::DoseSlotOutOfRange { id, slot, slots })?;

        tracing::debug!(medication_id = %id, slot, changed, "dose marked taken");
        Ok(())
    }

    /// Computes today's adherence from the current collection.
    pub fn todays_progress(&self) -> DailyProgress {
        let total = self.medications.iter().map(Medication::slot_count).sum();
        let taken = self.medications.iter().map(Medication::taken_count).sum();
        DailyProgress::from_counts(taken, total)
    }

    /// All medications, in insertion order.
    pub fn medications(&self) -> &[Medication] {
        &self.medications
    }

    /// Medications scheduled today. Every regimen recurs daily, so this is the full list.
    pub fn todays_medications(&self) -> &[Medication] {
        &self.medications
    }

    pub fn medication(&self, id: MedicationId) -> Option<&Medication> {
        self.medications.iter().find(|m| m.id() == id)
    }

    pub fn len(&self) -> usize {
        self.medications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.medications.is_empty()
    }

    /// The first `limit` untaken slots, walking medications in order and then slots in order.
    pub fn upcoming_doses(&self, limit: usize) -> Vec<UpcomingDose> {
        self.medications
            .iter()
            .flat_map(|med| {
                med.slots()
                    .filter(|(_, _, taken)| !taken)
                    .map(move |(slot_index, time, _)| UpcomingDose {
                        medication_id: med.id(),
                        name: med.name().to_string(),
                        dosage: med.dosage().to_string(),
                        color: med.colour(),
                        slot_index,
                        time,
                    })
            })
            .take(limit)
            .collect()
    }

    /// Untaken slots whose time has come at `now`.
    pub fn due_doses(&self, now: NaiveTime) -> Vec<UpcomingDose> {
        self.upcoming_doses(usize::MAX)
            .into_iter()
            .filter(|dose| dose.time.is_due_at(now))
            .collect()
    }
}
