//! Presenters (view-models) driven by the user interface.
//!
//! One presenter per managed entity. Each holds the current result set and
//! selection, talks to its record stores through the output ports, and
//! broadcasts every state change to its [`Subscribers`](crate::application::notifier::Subscribers).
//!
//! Presenters are single-threaded (`!Send`); build one per UI session.

pub mod customer;
pub mod vehicle;

pub use customer::{CUSTOMER_SAVED, CustomerPresenter};
pub use vehicle::{VEHICLE_SAVED, VehiclePresenter};
