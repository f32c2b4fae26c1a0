//! Infrastructure adapters for DriveFlow.
//!
//! This crate implements the ports defined in `driveflow-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod database;
pub mod images;
pub mod memory;
pub mod sqlite;

// Re-export commonly used adapters
pub use database::Database;
pub use images::{DEFAULT_IMAGES_DIR, DEFAULT_THUMBNAIL_SIZE, LocalImageStore};
pub use memory::{InMemoryCustomerStore, InMemoryReferenceStore, InMemoryVehicleStore};
pub use sqlite::{
    SqliteCustomerStore, SqliteVehicleStatusStore, SqliteVehicleStore, SqliteVehicleTypeStore,
};

/// Every SQLite store, sharing one database handle.
#[derive(Debug, Clone)]
pub struct SqliteStores {
    pub customers: SqliteCustomerStore,
    pub vehicles: SqliteVehicleStore,
    pub types: SqliteVehicleTypeStore,
    pub statuses: SqliteVehicleStatusStore,
}

impl SqliteStores {
    pub fn new(db: &Database) -> Self {
        Self {
            customers: SqliteCustomerStore::new(db.clone()),
            vehicles: SqliteVehicleStore::new(db.clone()),
            types: SqliteVehicleTypeStore::new(db.clone()),
            statuses: SqliteVehicleStatusStore::new(db.clone()),
        }
    }
}
