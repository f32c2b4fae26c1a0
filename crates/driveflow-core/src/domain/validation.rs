//! Form submissions and the rules that accept or reject them.
//!
//! A form carries the values exactly as typed. [`DomainValidator`] checks them
//! before anything touches storage; the entity constructors then apply their
//! own invariants a second time.

use crate::domain::{
    entities::{
        customer::{CustomerDraft, is_valid_email, is_valid_national_id},
        reference::{VehicleStatus, VehicleType},
        vehicle::VehicleDraft,
    },
    error::DomainError,
    value_objects::{EntityId, is_blank, non_blank},
};

/// Lowest year accepted on the vehicle form.
pub const MIN_FORM_YEAR: i32 = 1900;
/// Highest year accepted on the vehicle form.
pub const MAX_FORM_YEAR: i32 = 2050;

/// Customer form as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerForm {
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub license: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
}

impl CustomerForm {
    pub fn into_draft(self, id: Option<EntityId>) -> CustomerDraft {
        CustomerDraft {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            national_id: self.national_id,
            license: self.license,
            phone: self.phone,
            email: self.email,
            address: self.address,
            district: self.district,
        }
    }
}

/// Vehicle form as submitted. Type and status are referenced by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleForm {
    pub brand: String,
    pub model: String,
    pub year: String,
    pub plate: String,
    pub type_name: String,
    pub status_name: String,
    pub price_per_day: String,
    pub odometer: Option<String>,
    pub image: Option<String>,
}

impl VehicleForm {
    /// Parse the numeric fields and pair them with the resolved references.
    pub fn to_draft(
        &self,
        id: Option<EntityId>,
        vehicle_type: VehicleType,
        status: VehicleStatus,
    ) -> Result<VehicleDraft, DomainError> {
        Ok(VehicleDraft {
            id,
            brand: self.brand.clone(),
            model: self.model.clone(),
            year: parse_year(&self.year)?,
            plate: self.plate.clone(),
            vehicle_type,
            status,
            price_per_day: parse_price(&self.price_per_day)?,
            odometer: parse_odometer(self.odometer.as_deref())?,
            image: non_blank(self.image.as_deref()),
        })
    }
}

/// Centralized form validation.
pub struct DomainValidator;

impl DomainValidator {
    /// Check a customer form. The first violated rule wins.
    pub fn validate_customer(form: &CustomerForm) -> Result<(), DomainError> {
        if is_blank(&form.first_name)
            || is_blank(&form.last_name)
            || is_blank(&form.national_id)
            || is_blank(&form.license)
        {
            return Err(DomainError::MissingRequiredFields);
        }

        if !is_valid_national_id(form.national_id.trim()) {
            return Err(DomainError::InvalidNationalId);
        }

        if let Some(email) = non_blank(form.email.as_deref()) {
            if !is_valid_email(&email) {
                return Err(DomainError::InvalidEmail { email });
            }
        }

        Ok(())
    }

    /// Check a vehicle form. The first violated rule wins.
    pub fn validate_vehicle(form: &VehicleForm) -> Result<(), DomainError> {
        let required = [
            ("Brand", &form.brand),
            ("Model", &form.model),
            ("Plate", &form.plate),
            ("Type", &form.type_name),
            ("Status", &form.status_name),
            ("Price per day", &form.price_per_day),
            ("Year", &form.year),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| is_blank(value)) {
            return Err(DomainError::MissingField { field: *field });
        }

        let year = parse_year(&form.year)?;
        if !(MIN_FORM_YEAR..=MAX_FORM_YEAR).contains(&year) {
            return Err(DomainError::InvalidYear);
        }

        parse_price(&form.price_per_day)?;
        parse_odometer(form.odometer.as_deref())?;

        Ok(())
    }
}

fn parse_year(raw: &str) -> Result<i32, DomainError> {
    raw.trim().parse().map_err(|_| DomainError::InvalidYear)
}

fn parse_price(raw: &str) -> Result<f64, DomainError> {
    match raw.trim().parse::<f64>() {
        Ok(price) if price.is_finite() && price > 0.0 => Ok(price),
        _ => Err(DomainError::InvalidPrice),
    }
}

fn parse_odometer(raw: Option<&str>) -> Result<Option<i64>, DomainError> {
    let Some(raw) = non_blank(raw) else {
        return Ok(None);
    };
    match raw.parse::<i64>() {
        Ok(km) if km >= 0 => Ok(Some(km)),
        _ => Err(DomainError::InvalidOdometer),
    }
}
