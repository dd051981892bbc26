//! Medication service.
//!
//! Binds one user's [`MedicationTracker`] to an optional [`MedicationStore`]. Every mutation is
//! applied to the tracker first and then written through to the store on a best-effort basis:
//! the in-memory state is authoritative, and a failed write is logged rather than returned.

use std::sync::Arc;

use chrono::NaiveTime;
use medtrack_uuid::{MedicationId, UserId};

use crate::config::CoreConfig;
use crate::medication::{Medication, MedicationForm, NewMedication, UpcomingDose};
use crate::store::MedicationStore;
use crate::tracker::{DailyProgress, MedicationTracker};
use crate::{MedicationError, MedicationResult};

/// Pure medication operations for one user - no API concerns.
#[derive(Clone, Debug)]
pub struct MedicationService {
    user: UserId,
    tracker: MedicationTracker,
    store: Option<MedicationStore>,
}

impl MedicationService {
    /// A service with no persistence. Useful for tests and ephemeral sessions.
    pub fn in_memory(user: UserId, tracker: MedicationTracker) -> Self {
        Self {
            user,
            tracker,
            store: None,
        }
    }

    /// Opens `user`'s persisted collection.
    ///
    /// A user with no stored record starts with the seed medications when
    /// [`CoreConfig::seed_new_users`] is set, otherwise with an empty tracker. The starting
    /// collection is written back immediately so later loads see the same ids.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing record cannot be read or parsed, or holds duplicate ids.
    pub fn open(cfg: Arc<CoreConfig>, user: UserId) -> MedicationResult<Self> {
        let store = MedicationStore::new(cfg.clone());

        let (tracker, fresh) = match store.load(&user)? {
            Some(medications) => (MedicationTracker::from_medications(medications)?, false),
            None if cfg.seed_new_users() => (MedicationTracker::seeded()?, true),
            None => (MedicationTracker::new(), true),
        };

        let service = Self {
            user,
            tracker,
            store: Some(store),
        };
        if fresh {
            tracing::info!(user = %service.user, "starting new medication record");
            service.persist();
        }
        Ok(service)
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    pub fn tracker(&self) -> &MedicationTracker {
        &self.tracker
    }

    /// Adds a validated medication and persists.
    pub fn add_medication(&mut self, new: NewMedication) -> MedicationResult<Medication> {
        let medication = self.tracker.add_medication(new);
        self.persist();
        Ok(medication)
    }

    /// Validates raw form input, adds it, and persists.
    pub fn add_from_form(&mut self, form: MedicationForm) -> MedicationResult<Medication> {
        self.add_medication(form.into_new_medication()?)
    }

    /// Marks a dose taken and persists. Returns the updated record.
    pub fn mark_medication_taken(
        &mut self,
        id: MedicationId,
        slot: usize,
    ) -> MedicationResult<Medication> {
        self.tracker.mark_medication_taken(id, slot)?;
        self.persist();
        self.tracker
            .medication(id)
            .cloned()
            .ok_or(MedicationError::MedicationNotFound(id))
    }

    pub fn medications(&self) -> &[Medication] {
        self.tracker.medications()
    }

    pub fn todays_progress(&self) -> DailyProgress {
        self.tracker.todays_progress()
    }

    pub fn upcoming_doses(&self, limit: usize) -> Vec<UpcomingDose> {
        self.tracker.upcoming_doses(limit)
    }

    pub fn due_doses(&self, now: NaiveTime) -> Vec<UpcomingDose> {
        self.tracker.due_doses(now)
    }

    fn persist(&self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.save(&self.user, self.tracker.medications()) {
            tracing::warn!(user = %self.user, "failed to persist medications: {}", e);
        }
    }
}
