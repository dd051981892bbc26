//! Identifier utilities for MedTrack.
//!
//! Every identifier MedTrack hands out is a UUID v4 rendered in *canonical* form: **32 lowercase
//! hexadecimal characters**, no hyphens (for example `550e8400e29b41d4a716446655440000`). This is
//! the value produced by `Uuid::new_v4().simple().to_string()`.
//!
//! Two wrappers are provided:
//! - [`MedicationId`] identifies one medication regimen inside a tracker.
//! - [`ShardableUuid`] identifies a user and derives the sharded storage directory for that
//!   user's persisted medication collection.
//!
//! Externally supplied identifiers (CLI arguments, REST path segments) must already be canonical.
//! Hyphenated, uppercase or otherwise malformed values are rejected rather than normalised.
//!
//! ## Sharded directory layout
//! For a canonical UUID `u`, per-user data lives under:
//! `parent_dir/<u[0..2]>/<u[2..4]>/<u>/`

mod service;

pub use service::{MedicationId, ShardableUuid};

/// A user identifier is a shardable UUID.
pub type UserId = ShardableUuid;

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
