pub mod customer;
pub mod reference;
pub mod vehicle;

pub use crate::domain::DomainError;
pub use customer::{Customer, CustomerDraft};
pub use reference::{ReferenceCatalog, VehicleStatus, VehicleType};
pub use vehicle::{Vehicle, VehicleDraft};
