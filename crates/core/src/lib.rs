//! # MedTrack Core
//!
//! Core business logic for the MedTrack medication adherence tracker.
//!
//! This crate contains pure data operations:
//! - The [`MedicationTracker`]: the authoritative medication collection with per-slot taken
//!   flags and today's adherence figures
//! - Validation of add-medication input into [`NewMedication`]
//! - Per-user JSON persistence under the configured data directory
//! - [`MedicationService`], which binds a tracker to a user and its store
//!
//! **No API concerns**: HTTP servers, CLI parsing and process configuration belong in
//! `api-rest`, `medtrack-cli` and the `medtrack-run` binary.

pub mod config;
pub mod constants;
pub mod error;
pub mod medication;
pub mod schedule;
pub mod seed;
pub mod service;
pub mod store;
pub mod tracker;
pub mod validation;

pub use config::CoreConfig;
pub use constants::{DEFAULT_DATA_DIR, DEFAULT_UPCOMING_LIMIT, FREQUENCY_PRESETS};
pub use error::{MedicationError, MedicationResult};
pub use medication::{Colour, Medication, MedicationForm, NewMedication, UpcomingDose};
pub use schedule::DoseTime;
pub use service::MedicationService;
pub use store::MedicationStore;
pub use tracker::{DailyProgress, MedicationTracker};

pub use medtrack_types::NonEmptyText;
pub use medtrack_uuid::{MedicationId, UserId};
