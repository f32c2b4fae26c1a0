//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the presenters need from storage.
//! The `driveflow-adapters` crate provides implementations.
//!
//! Every call is synchronous. Adapters backed by an async driver block on
//! their own runtime so presenters never see a future.

use std::path::Path;

use crate::domain::{Customer, EntityId, ReferenceCatalog, Vehicle, VehicleStatus, VehicleType};
use crate::error::DriveflowResult;

/// Port for customer persistence.
///
/// Implemented by:
/// - `driveflow_adapters::sqlite::SqliteCustomerStore` (production)
/// - `driveflow_adapters::memory::InMemoryCustomerStore` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait CustomerStore: Send + Sync {
    /// All customers, ordered by family name then given name.
    fn get_all(&self) -> DriveflowResult<Vec<Customer>>;

    fn get_by_id(&self, id: EntityId) -> DriveflowResult<Option<Customer>>;

    fn get_by_national_id(&self, national_id: &str) -> DriveflowResult<Option<Customer>>;

    /// Insert when the customer has no id, update otherwise.
    ///
    /// Returns `Ok(false)` when nothing was written (unknown id on update).
    fn save(&self, customer: &Customer) -> DriveflowResult<bool>;

    /// Returns `Ok(false)` when no row had that id.
    fn delete(&self, id: EntityId) -> DriveflowResult<bool>;

    /// Case-insensitive substring match on given name, family name,
    /// national ID and district. A blank term matches everyone.
    fn search(&self, term: &str) -> DriveflowResult<Vec<Customer>>;
}

/// Port for vehicle persistence.
///
/// Readers take the loaded [`ReferenceCatalog`] so stored type and status ids
/// resolve to full objects. Unknown ids become placeholders.
#[cfg_attr(test, mockall::automock)]
pub trait VehicleStore: Send + Sync {
    /// All vehicles, ordered by brand then model.
    fn get_all(&self, catalog: &ReferenceCatalog) -> DriveflowResult<Vec<Vehicle>>;

    fn get_by_id(
        &self,
        id: EntityId,
        catalog: &ReferenceCatalog,
    ) -> DriveflowResult<Option<Vehicle>>;

    /// Insert when the vehicle has no id, update otherwise.
    fn save(&self, vehicle: &Vehicle) -> DriveflowResult<bool>;

    fn delete(&self, id: EntityId) -> DriveflowResult<bool>;

    /// Substring match on brand, model and plate, narrowed to `status` when
    /// given. A blank term matches every vehicle.
    fn search_and_filter(
        &self,
        term: &str,
        status: Option<EntityId>,
        catalog: &ReferenceCatalog,
    ) -> DriveflowResult<Vec<Vehicle>>;
}

/// Port for the vehicle type lookup table.
#[cfg_attr(test, mockall::automock)]
pub trait VehicleTypeStore: Send + Sync {
    fn get_all(&self) -> DriveflowResult<Vec<VehicleType>>;

    fn get_by_id(&self, id: EntityId) -> DriveflowResult<Option<VehicleType>>;
}

/// Port for the vehicle status lookup table.
#[cfg_attr(test, mockall::automock)]
pub trait VehicleStatusStore: Send + Sync {
    fn get_all(&self) -> DriveflowResult<Vec<VehicleStatus>>;

    fn get_by_id(&self, id: EntityId) -> DriveflowResult<Option<VehicleStatus>>;
}

/// Decoded, resized vehicle picture ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8 pixels.
    pub rgba: Vec<u8>,
}

/// Port for vehicle picture files.
///
/// Implemented by `driveflow_adapters::images::LocalImageStore`.
#[cfg_attr(test, mockall::automock)]
pub trait ImageStore: Send + Sync {
    /// Copy a picture into the images directory under a generated name.
    ///
    /// Returns the stored file name, or `Ok(None)` when `source` does not
    /// decode as an image. Read or copy failures are errors. Only the name is
    /// persisted on the vehicle.
    fn import_and_copy(&self, source: &Path) -> DriveflowResult<Option<String>>;

    /// Thumbnail for a stored file, resized to fit `bounds` (width, height)
    /// with the aspect ratio kept.
    ///
    /// `None` when the name is blank, the file is missing, or it does not
    /// decode. Results are cached per name.
    fn load_thumbnail(&self, name: &str, bounds: (u32, u32)) -> Option<Thumbnail>;

    /// Remove a stored picture, e.g. one imported for a save that was then
    /// rejected. `Ok(false)` when there was nothing to remove.
    fn discard(&self, name: &str) -> DriveflowResult<bool>;

    /// Drop every cached thumbnail.
    fn clear_cache(&self);
}
