// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for DriveFlow.
//!
//! Pure business rules for the rental back office: customers, vehicles, the
//! lookup entities vehicles reference, and the validation applied to forms.
//!
//! ## Layer rules
//!
//! - **No async**: domain logic is synchronous
//! - **No I/O**: no database, filesystem, or terminal access
//! - **Immutable entities**: fields are private; a change means building a
//!   new entity through its constructor
//! - **Two gates**: forms are validated by [`DomainValidator`], and entity
//!   constructors re-check their invariants regardless
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod validation;
pub mod value_objects;

// Re-exports for convenience
pub use entities::{
    customer::{Customer, CustomerDraft},
    reference::{ReferenceCatalog, VehicleStatus, VehicleType},
    vehicle::{Vehicle, VehicleDraft},
};

pub use error::{DomainError, ErrorCategory};

pub use validation::{CustomerForm, DomainValidator, VehicleForm};

pub use value_objects::{EntityId, StatusFilter, title_case};

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // End-to-end form → entity
    // ========================================================================

    #[test]
    fn customer_form_to_entity() {
        let form = CustomerForm {
            first_name: " juan ".into(),
            last_name: "perez".into(),
            national_id: "12345678".into(),
            license: "L1".into(),
            ..Default::default()
        };
        DomainValidator::validate_customer(&form).unwrap();

        let customer = Customer::new(form.into_draft(None)).unwrap();
        assert_eq!(customer.first_name(), "Juan");
        assert_eq!(customer.last_name(), "Perez");
    }

    #[test]
    fn vehicle_form_to_entity() {
        let catalog = ReferenceCatalog::new(
            vec![VehicleType {
                id: EntityId::new(2),
                name: "SUV".into(),
                base_deposit: 500.0,
            }],
            vec![VehicleStatus {
                id: EntityId::new(3),
                name: "Alquilado".into(),
            }],
        );
        let form = VehicleForm {
            brand: "nissan".into(),
            model: "X-Trail".into(),
            year: "2021".into(),
            plate: "xyz-987".into(),
            type_name: "SUV".into(),
            status_name: "Alquilado".into(),
            price_per_day: "150".into(),
            odometer: Some("42000".into()),
            image: Some("  ".into()),
        };
        DomainValidator::validate_vehicle(&form).unwrap();

        let vehicle_type = catalog.type_named(&form.type_name).cloned().unwrap();
        let status = catalog.status_named(&form.status_name).cloned().unwrap();
        let vehicle = Vehicle::new(
            form.to_draft(Some(EntityId::new(7)), vehicle_type, status)
                .unwrap(),
        )
        .unwrap();

        assert_eq!(vehicle.id(), Some(EntityId::new(7)));
        assert_eq!(vehicle.brand(), "Nissan");
        assert_eq!(vehicle.plate(), "XYZ-987");
        assert_eq!(vehicle.odometer(), Some(42_000));
        assert_eq!(vehicle.image(), None);
        assert_eq!(vehicle.vehicle_type().base_deposit, 500.0);
    }
}
