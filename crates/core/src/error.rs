use medtrack_uuid::MedicationId;

#[derive(Debug, thiserror::Error)]
pub enum MedicationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("medication not found: {0}")]
    MedicationNotFound(MedicationId),
    #[error("dose slot {slot} out of range for medication {id} ({slots} slots scheduled)")]
    DoseSlotOutOfRange {
        id: MedicationId,
        slot: usize,
        slots: usize,
    },

    #[error("identifier error: {0}")]
    Uuid(#[from] medtrack_uuid::UuidError),
    #[error("text error: {0}")]
    Text(#[from] medtrack_types::TextError),

    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to read medications file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write medications file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to serialize medications: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize medications: {0}")]
    Deserialization(serde_json::Error),
}

impl MedicationError {
    /// True for the "target does not exist" family of errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            MedicationError::MedicationNotFound(_) | MedicationError::DoseSlotOutOfRange { .. }
        )
    }
}

pub type MedicationResult<T> = std::result::Result<T, MedicationError>;
