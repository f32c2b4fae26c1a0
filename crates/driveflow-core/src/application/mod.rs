//! Application layer for DriveFlow.
//!
//! This layer contains:
//! - **Presenters**: Use case orchestration per entity (CustomerPresenter, VehiclePresenter)
//! - **Notifier**: Change broadcast from presenters to views
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod notifier;
pub mod ports;
pub mod presenters;

// Re-export main presenters
pub use presenters::{CustomerPresenter, VehiclePresenter};

pub use notifier::{Broadcast, Callback, SubscriberError, Subscribers, SubscriptionId};

// Re-export port traits (for adapter implementation)
pub use ports::{
    CustomerStore, ImageStore, Thumbnail, VehicleStatusStore, VehicleStore, VehicleTypeStore,
};

pub use error::ApplicationError;
