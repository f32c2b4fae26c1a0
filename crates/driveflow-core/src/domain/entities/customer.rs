//! The `Customer` entity.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    value_objects::{EntityId, is_blank, non_blank, title_case},
};

/// Pattern an email address must match when one is given.
pub const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

/// Number of digits in a national ID.
pub const NATIONAL_ID_LEN: usize = 8;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));

/// `true` if `email` (already trimmed) is a well-formed address.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// `true` if `id` (already trimmed) is exactly eight ASCII digits.
pub fn is_valid_national_id(id: &str) -> bool {
    id.len() == NATIONAL_ID_LEN && id.bytes().all(|b| b.is_ascii_digit())
}

/// Raw input for building a [`Customer`].
///
/// Values are taken as typed; [`Customer::new`] normalizes them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerDraft {
    pub id: Option<EntityId>,
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub license: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
}

/// A rental customer.
///
/// Invariants (enforced by [`Customer::new`]):
/// - names, national ID and license are non-empty and trimmed
/// - names are title-cased
/// - the national ID is eight digits
/// - the email, when present, is well-formed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    id: Option<EntityId>,
    first_name: String,
    last_name: String,
    national_id: String,
    license: String,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
    district: Option<String>,
}

impl Customer {
    /// Normalize and validate a draft.
    pub fn new(draft: CustomerDraft) -> Result<Self, DomainError> {
        if is_blank(&draft.first_name)
            || is_blank(&draft.last_name)
            || is_blank(&draft.national_id)
            || is_blank(&draft.license)
        {
            return Err(DomainError::MissingRequiredFields);
        }

        let national_id = draft.national_id.trim().to_string();
        if !is_valid_national_id(&national_id) {
            return Err(DomainError::InvalidNationalId);
        }

        let email = non_blank(draft.email.as_deref());
        if let Some(email) = &email {
            if !is_valid_email(email) {
                return Err(DomainError::InvalidEmail {
                    email: email.clone(),
                });
            }
        }

        Ok(Self {
            id: draft.id,
            first_name: title_case(draft.first_name.trim()),
            last_name: title_case(draft.last_name.trim()),
            national_id,
            license: draft.license.trim().to_string(),
            phone: non_blank(draft.phone.as_deref()),
            email,
            address: non_blank(draft.address.as_deref()),
            district: non_blank(draft.district.as_deref()).map(|d| title_case(&d)),
        })
    }

    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn national_id(&self) -> &str {
        &self.national_id
    }

    pub fn license(&self) -> &str {
        &self.license
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn district(&self) -> Option<&str> {
        self.district.as_deref()
    }

    /// `"<first> <last>"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Copy of this customer carrying the id the store assigned to it.
    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }
}
