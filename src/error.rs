// ⚠️ Error model shared by the store, services and CSV layer

use std::path::PathBuf;
use thiserror::Error;

use crate::entities::AppointmentStatus;
use crate::id_allocator::RecordId;

/// Result type used across the library.
pub type Result<T> = std::result::Result<T, ClinicError>;

#[derive(Debug, Error)]
pub enum ClinicError {
    /// A required field is missing, blank or out of range.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Lookup by identifier found no match.
    #[error("{entity} not found with ID: {id}")]
    NotFound { entity: &'static str, id: RecordId },

    /// A record with the same identifier is already stored.
    #[error("{entity} with ID {id} already exists")]
    DuplicateId { entity: &'static str, id: RecordId },

    /// Appointment status change rejected by the transition table.
    #[error("appointment {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: RecordId,
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    // ========================================================================
    // STORAGE (persisted CSV form)
    // ========================================================================
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{}:{line}: {message}", path.display())]
    Malformed {
        path: PathBuf,
        line: u64,
        message: String,
    },
}

impl ClinicError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn appointment_not_found(id: RecordId) -> Self {
        Self::NotFound {
            entity: "Appointment",
            id,
        }
    }

    /// True for failures reading or writing the persisted files.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Csv(_) | Self::Malformed { .. })
    }
}
