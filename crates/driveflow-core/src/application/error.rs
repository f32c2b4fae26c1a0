//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business rule violations are `DomainError` from `crate::domain`; this layer
//! records *where* such a violation surfaced (form check or entity build).

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;
use crate::error::ErrorCategory;

/// Errors that occur while presenters orchestrate validation and storage.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// The submitted form broke a business rule.
    #[error("{0}")]
    Validation(DomainError),

    /// The form passed, but building the entity broke an invariant.
    #[error("Invalid data: {0}")]
    Construction(DomainError),

    /// Type or status name on a vehicle form is not in the catalog.
    #[error("Invalid type or status.")]
    UnknownTypeOrStatus,

    /// The record store rejected or failed an operation.
    #[error("Record store failed to {operation}: {reason}")]
    StoreFailure {
        operation: &'static str,
        reason: String,
    },

    /// An in-process store lock was poisoned by a panicking writer.
    #[error("Record store lock poisoned")]
    StoreLockError,

    /// Save reached the store but nothing was persisted.
    #[error("The {entity} could not be saved.")]
    NotPersisted { entity: &'static str },

    /// Copying a picture into the images directory failed.
    #[error("Image import failed for {path}: {reason}")]
    ImageImport { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Shorthand used by store adapters.
    pub fn store(operation: &'static str, reason: impl ToString) -> Self {
        Self::StoreFailure {
            operation,
            reason: reason.to_string(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Validation(e) | Self::Construction(e) => e.suggestions(),
            Self::UnknownTypeOrStatus => vec![
                "List valid types with: driveflow catalog types".into(),
                "List valid statuses with: driveflow catalog statuses".into(),
            ],
            Self::StoreLockError => vec!["Restart DriveFlow".into()],
            Self::StoreFailure { .. } | Self::NotPersisted { .. } => vec![
                "Check that the database is reachable".into(),
                "A national ID or plate may already be registered".into(),
            ],
            Self::ImageImport { path, .. } => vec![
                format!("Check that {} exists and is readable", path.display()),
                "Supported formats: png, jpeg, gif, bmp, webp".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) | Self::Construction(_) => ErrorCategory::Validation,
            Self::UnknownTypeOrStatus => ErrorCategory::Validation,
            Self::StoreFailure { .. } | Self::NotPersisted { .. } => ErrorCategory::Internal,
            Self::StoreLockError => ErrorCategory::Internal,
            Self::ImageImport { .. } => ErrorCategory::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_is_the_domain_message() {
        let err = ApplicationError::Validation(DomainError::InvalidNationalId);
        assert_eq!(err.to_string(), DomainError::InvalidNationalId.to_string());
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn construction_message_is_prefixed() {
        let err = ApplicationError::Construction(DomainError::InvalidYear);
        assert!(err.to_string().starts_with("Invalid data:"));
    }

    #[test]
    fn store_helper_builds_failure() {
        let err = ApplicationError::store("delete customer", "disk full");
        assert_eq!(
            err.to_string(),
            "Record store failed to delete customer: disk full"
        );
        assert_eq!(err.category(), ErrorCategory::Internal);
    }
}
