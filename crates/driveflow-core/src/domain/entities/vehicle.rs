//! The `Vehicle` entity.

use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::reference::{VehicleStatus, VehicleType},
    error::DomainError,
    value_objects::{EntityId, non_blank, title_case},
};

/// Years at or below this are rejected when building a vehicle.
pub const MIN_MODEL_YEAR_EXCLUSIVE: i32 = 1900;

/// Raw input for building a [`Vehicle`]. Type and status are already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleDraft {
    pub id: Option<EntityId>,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub plate: String,
    pub vehicle_type: VehicleType,
    pub status: VehicleStatus,
    pub price_per_day: f64,
    pub odometer: Option<i64>,
    pub image: Option<String>,
}

/// A rentable vehicle.
///
/// Invariants (enforced by [`Vehicle::new`]):
/// - brand is title-cased, model trimmed, plate upper-cased; none empty
/// - year > 1900
/// - price per day is finite and > 0
/// - odometer, when present, is >= 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    id: Option<EntityId>,
    brand: String,
    model: String,
    year: i32,
    plate: String,
    vehicle_type: VehicleType,
    status: VehicleStatus,
    price_per_day: f64,
    odometer: Option<i64>,
    image: Option<String>,
}

impl Vehicle {
    /// Normalize and validate a draft.
    pub fn new(draft: VehicleDraft) -> Result<Self, DomainError> {
        let brand = title_case(draft.brand.trim());
        let model = draft.model.trim().to_string();
        let plate = draft.plate.trim().to_uppercase();

        if brand.is_empty() || model.is_empty() || plate.is_empty() {
            return Err(DomainError::BlankIdentity);
        }
        if draft.year <= MIN_MODEL_YEAR_EXCLUSIVE {
            return Err(DomainError::InvalidYear);
        }
        if !draft.price_per_day.is_finite() || draft.price_per_day <= 0.0 {
            return Err(DomainError::InvalidPrice);
        }
        if draft.odometer.is_some_and(|km| km < 0) {
            return Err(DomainError::InvalidOdometer);
        }

        Ok(Self {
            id: draft.id,
            brand,
            model,
            year: draft.year,
            plate,
            vehicle_type: draft.vehicle_type,
            status: draft.status,
            price_per_day: draft.price_per_day,
            odometer: draft.odometer,
            image: non_blank(draft.image.as_deref()),
        })
    }

    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn plate(&self) -> &str {
        &self.plate
    }

    pub fn vehicle_type(&self) -> &VehicleType {
        &self.vehicle_type
    }

    pub fn status(&self) -> &VehicleStatus {
        &self.status
    }

    pub fn price_per_day(&self) -> f64 {
        self.price_per_day
    }

    pub fn odometer(&self) -> Option<i64> {
        self.odometer
    }

    /// File name of the vehicle picture inside the images directory.
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// `"<brand> <model> (<plate>)"`.
    pub fn label(&self) -> String {
        format!("{} {} ({})", self.brand, self.model, self.plate)
    }

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }
}
