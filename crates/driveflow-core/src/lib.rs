//! DriveFlow Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the DriveFlow
//! vehicle rental back office, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          driveflow-cli (CLI)            │
//! │   (Dashboard, commands, subscribers)    │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │             Presenters                  │
//! │  (CustomerPresenter, VehiclePresenter)  │
//! │     Validate, persist, reload, notify   │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │   (Customer/Vehicle/Reference, Image)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   driveflow-adapters (Infrastructure)   │
//! │   (SQLite stores, LocalImageStore, etc) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │   (Customer, Vehicle, DomainValidator)  │
//! │        No External Dependencies         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use driveflow_core::prelude::*;
//!
//! // Stores come from driveflow-adapters.
//! let presenter = CustomerPresenter::new(Box::new(store));
//! presenter.subscribers().subscribe_fn(|| {
//!     println!("customers changed");
//!     Ok(())
//! });
//!
//! let form = CustomerForm {
//!     first_name: "juan".into(),
//!     last_name: "perez".into(),
//!     national_id: "12345678".into(),
//!     license: "L1".into(),
//!     ..Default::default()
//! };
//! presenter.save(None, form)?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApplicationError, CustomerPresenter, SubscriberError, Subscribers, SubscriptionId,
        VehiclePresenter,
        ports::{
            CustomerStore, ImageStore, Thumbnail, VehicleStatusStore, VehicleStore,
            VehicleTypeStore,
        },
    };
    pub use crate::domain::{
        Customer, CustomerDraft, CustomerForm, DomainError, DomainValidator, EntityId,
        ReferenceCatalog, StatusFilter, Vehicle, VehicleDraft, VehicleForm, VehicleStatus,
        VehicleType,
    };
    pub use crate::error::{DriveflowError, DriveflowResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
