// ============================================================================
// domain/error.rs - BUSINESS RULE VIOLATIONS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// Every variant renders as a message that can be shown to the person filling
/// in the form, so `to_string()` is the user-facing text.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Required fields
    // ========================================================================
    #[error("First name, last name, national ID and license are required.")]
    MissingRequiredFields,

    #[error("The field '{field}' is required.")]
    MissingField { field: &'static str },

    #[error("Brand, model and plate are required.")]
    BlankIdentity,

    // ========================================================================
    // Format violations
    // ========================================================================
    #[error("The national ID must have 8 numeric digits.")]
    InvalidNationalId,

    #[error("The email '{email}' is not a valid address.")]
    InvalidEmail { email: String },

    // ========================================================================
    // Range violations
    // ========================================================================
    #[error("The year must be a valid number (e.g. 2023).")]
    InvalidYear,

    #[error("The price per day must be a positive number.")]
    InvalidPrice,

    #[error("The odometer must be a non-negative whole number.")]
    InvalidOdometer,

    // ========================================================================
    // Reference lookups
    // ========================================================================
    #[error("Unknown {kind} '{name}'")]
    UnknownReference { kind: &'static str, name: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingRequiredFields => vec![
                "Fill in first name, last name, national ID and license".into(),
            ],
            Self::MissingField { field } => vec![format!("Provide a value for '{field}'")],
            Self::InvalidNationalId => vec![
                "Use exactly 8 digits, without dots or letters".into(),
                "Example: 12345678".into(),
            ],
            Self::InvalidEmail { .. } => vec![
                "Use the form name@domain.tld".into(),
                "Leave the email empty if the customer has none".into(),
            ],
            Self::InvalidYear => vec!["Use a year between 1900 and 2050".into()],
            Self::InvalidPrice => vec!["Use a price greater than zero, e.g. 120.50".into()],
            Self::UnknownReference { kind, .. } => {
                vec![format!("List valid values with: driveflow catalog {kind}s")]
            }
            _ => vec!["Check the submitted values and try again".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownReference { .. } => ErrorCategory::NotFound,
            _ => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(
            DomainError::MissingField { field: "Brand" }.to_string(),
            "The field 'Brand' is required."
        );
        assert!(DomainError::InvalidNationalId.to_string().contains("8"));
    }

    #[test]
    fn unknown_reference_is_not_found() {
        let err = DomainError::UnknownReference {
            kind: "status",
            name: "Lost".into(),
        };
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(err.suggestions()[0].contains("catalog statuses"));
    }
}
