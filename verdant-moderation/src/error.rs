use thiserror::Error;
use verdant_catalog::{ModerationAction, PayloadError, PlantId};
use verdant_db::OperationError;

/// Errors returned by contribution and moderation calls.
///
/// These are single-record interactive operations, so every failure is
/// surfaced to the caller with a specific kind.
#[derive(Debug, Error)]
pub enum ModerationError {
    /// A required field is missing or blank
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The name is already held by an approved or pending record
    #[error("A plant named '{name}' already exists")]
    DuplicateName { name: String },

    /// The record's current state does not allow the action
    #[error("Cannot {action} plant {id}: record is {state}")]
    InvalidTransition {
        id: PlantId,
        action: ModerationAction,
        state: String,
    },

    /// No record with this id
    #[error("Plant not found: id {id}")]
    NotFound { id: PlantId },

    /// The caller is not an administrator
    #[error("User '{user}' is not allowed to moderate the catalog")]
    Forbidden { user: String },

    /// Underlying persistence failure
    #[error("Store error: {0}")]
    Store(OperationError),
}

impl ModerationError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub(crate) fn invalid(id: PlantId, action: ModerationAction, state: impl Into<String>) -> Self {
        Self::InvalidTransition {
            id,
            action,
            state: state.into(),
        }
    }
}

impl From<OperationError> for ModerationError {
    fn from(e: OperationError) -> Self {
        match e {
            OperationError::DuplicateName { name } => Self::DuplicateName { name },
            OperationError::NotFound { id } => Self::NotFound { id },
            other => Self::Store(other),
        }
    }
}

impl From<rusqlite::Error> for ModerationError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Store(OperationError::Sqlite(e))
    }
}

impl From<PayloadError> for ModerationError {
    fn from(e: PayloadError) -> Self {
        Self::Validation(e.to_string())
    }
}
