//! Ledger error types.
//!
//! Every failure is returned to the immediate caller; a failed mutation leaves the ledger
//! exactly as it was before the call.

use rust_decimal::Decimal;
use splitledger_shared::AppError;
use thiserror::Error;

use super::store::StoreError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Malformed or missing field, or a non-positive amount.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// The offending field (e.g. `paid_by`, `splits[1].amount`).
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// Referenced participant does not exist.
    #[error("Participant not found: {0}")]
    NotFound(String),

    /// A participant with this name already exists.
    #[error("Participant already exists: {0}")]
    DuplicateParticipant(String),

    /// Removal refused because the participant still owes or is owed money.
    #[error("Participant {name} has non-zero balance {balance}")]
    NonZeroBalance {
        /// Participant name.
        name: String,
        /// Outstanding balance.
        balance: Decimal,
    },

    /// The persistence collaborator failed; nothing was applied.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Creates a validation error for a field.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::DuplicateParticipant(_) => "DUPLICATE_PARTICIPANT",
            Self::NonZeroBalance { .. } => "NON_ZERO_BALANCE",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::NotFound(_) => 404,
            Self::DuplicateParticipant(_) | Self::NonZeroBalance { .. } => 409,
            Self::Storage(_) => 500,
        }
    }

    /// Returns the offending field for validation errors.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Validation { .. } => Self::Validation(err.to_string()),
            LedgerError::NotFound(_) => Self::NotFound(err.to_string()),
            LedgerError::DuplicateParticipant(_) | LedgerError::NonZeroBalance { .. } => {
                Self::Conflict(err.to_string())
            }
            LedgerError::Storage(msg) => Self::Storage(msg),
        }
    }
}
