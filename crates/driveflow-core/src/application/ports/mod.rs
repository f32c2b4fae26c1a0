//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `driveflow-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by presenters, implemented by infrastructure
//!   - `CustomerStore`, `VehicleStore`: record persistence
//!   - `VehicleTypeStore`, `VehicleStatusStore`: lookup tables
//!   - `ImageStore`: vehicle picture files
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (The presenters' public methods; the CLI drives them)

pub mod output;

pub use output::{
    CustomerStore, ImageStore, Thumbnail, VehicleStatusStore, VehicleStore, VehicleTypeStore,
};
