//! View-model for the vehicle management screen.
//!
//! Besides the vehicle list and selection it keeps the reference catalog,
//! reloaded on every [`VehiclePresenter::load`], that vehicle forms pick
//! their type and status from.

use std::cell::RefCell;

use tracing::{debug, error, info, instrument, warn};

use crate::application::{
    ApplicationError,
    notifier::{Callback, SubscriptionId, Subscribers},
    ports::{VehicleStatusStore, VehicleStore, VehicleTypeStore},
};
use crate::domain::{
    DomainValidator, EntityId, ReferenceCatalog, StatusFilter, Vehicle, VehicleForm,
    VehicleStatus, VehicleType,
};

/// Shown after a successful save.
pub const VEHICLE_SAVED: &str = "Vehicle saved.";

#[derive(Debug, Default)]
struct VehicleState {
    vehicles: Vec<Vehicle>,
    catalog: ReferenceCatalog,
    selected: Option<Vehicle>,
    filter_term: String,
    filter_status: StatusFilter,
}

/// Holds the vehicle list, selection, filters and catalog shown by a view.
pub struct VehiclePresenter {
    vehicles: Box<dyn VehicleStore>,
    types: Box<dyn VehicleTypeStore>,
    statuses: Box<dyn VehicleStatusStore>,
    state: RefCell<VehicleState>,
    subscribers: Subscribers,
}

impl VehiclePresenter {
    pub fn new(
        vehicles: Box<dyn VehicleStore>,
        types: Box<dyn VehicleTypeStore>,
        statuses: Box<dyn VehicleStatusStore>,
    ) -> Self {
        Self {
            vehicles,
            types,
            statuses,
            state: RefCell::new(VehicleState::default()),
            subscribers: Subscribers::new(),
        }
    }

    /// Reload the catalog, then every vehicle.
    ///
    /// Subscribers are notified even on failure. Returns `false` when any
    /// part failed; if the catalog did not load the vehicle list stays empty.
    #[instrument(skip_all)]
    pub fn load(&self) -> bool {
        let mut complete = true;

        let types = self.types.get_all().unwrap_or_else(|e| {
            error!(error = %e, "Failed to load vehicle types");
            complete = false;
            Vec::new()
        });
        let statuses = self.statuses.get_all().unwrap_or_else(|e| {
            error!(error = %e, "Failed to load vehicle statuses");
            complete = false;
            Vec::new()
        });
        let catalog = ReferenceCatalog::new(types, statuses);

        let vehicles = if complete {
            self.vehicles.get_all(&catalog).unwrap_or_else(|e| {
                error!(error = %e, "Failed to load vehicles");
                complete = false;
                Vec::new()
            })
        } else {
            Vec::new()
        };

        if complete {
            info!(count = vehicles.len(), "Vehicles loaded");
        } else {
            warn!("Vehicle data only partially loaded");
        }

        {
            let mut state = self.state.borrow_mut();
            state.catalog = catalog;
            state.vehicles = vehicles;
            state.filter_term.clear();
            state.filter_status = StatusFilter::All;
        }
        self.subscribers.notify();
        complete
    }

    /// Replace the list with vehicles matching `term` and `status_name`.
    ///
    /// `status_name` is `"all"` (any case) or blank for no status filter.
    /// A name missing from the catalog falls back to `"all"`.
    /// On store failure the list becomes empty.
    #[instrument(skip(self))]
    pub fn search_and_filter(&self, term: &str, status_name: &str) -> bool {
        let term = term.trim();
        let requested = StatusFilter::parse(status_name);

        let (catalog, filter, status_id) = {
            let state = self.state.borrow();
            let resolved = match &requested {
                StatusFilter::All => None,
                StatusFilter::Named(name) => state.catalog.status_named(name).map(|s| s.id),
            };
            let filter = match (&requested, resolved) {
                (StatusFilter::Named(name), None) => {
                    debug!(status = %name, "Unknown status filter, showing all");
                    StatusFilter::All
                }
                _ => requested.clone(),
            };
            (state.catalog.clone(), filter, resolved)
        };

        let (vehicles, ok) = match self.vehicles.search_and_filter(term, status_id, &catalog) {
            Ok(vehicles) => {
                debug!(count = vehicles.len(), "Vehicle search done");
                (vehicles, true)
            }
            Err(e) => {
                error!(error = %e, "Vehicle search failed");
                (Vec::new(), false)
            }
        };

        {
            let mut state = self.state.borrow_mut();
            state.vehicles = vehicles;
            state.filter_term = term.to_string();
            state.filter_status = filter;
        }
        self.subscribers.notify();
        ok
    }

    /// Change the selection. Returns `false`, without notifying, when it is
    /// already `vehicle`.
    pub fn select(&self, vehicle: Option<Vehicle>) -> bool {
        {
            let mut state = self.state.borrow_mut();
            if state.selected == vehicle {
                return false;
            }
            state.selected = vehicle;
        }
        self.subscribers.notify();
        true
    }

    /// Validate, resolve references, build and persist a vehicle, then reload.
    #[instrument(skip(self, form), fields(plate = %form.plate.trim()))]
    pub fn save(
        &self,
        id: Option<EntityId>,
        form: &VehicleForm,
    ) -> Result<&'static str, ApplicationError> {
        if let Err(e) = DomainValidator::validate_vehicle(form) {
            debug!(error = %e, "Vehicle form rejected");
            return Err(ApplicationError::Validation(e));
        }

        let (vehicle_type, status) = {
            let state = self.state.borrow();
            match (
                state.catalog.type_named(form.type_name.trim()),
                state.catalog.status_named(form.status_name.trim()),
            ) {
                (Some(t), Some(s)) => (t.clone(), s.clone()),
                _ => return Err(ApplicationError::UnknownTypeOrStatus),
            }
        };

        let vehicle = form
            .to_draft(id, vehicle_type, status)
            .and_then(Vehicle::new)
            .map_err(ApplicationError::Construction)?;

        match self.vehicles.save(&vehicle) {
            Ok(true) => {
                info!(vehicle = %vehicle.label(), "Vehicle saved");
                self.load();
                Ok(VEHICLE_SAVED)
            }
            Ok(false) => Err(ApplicationError::NotPersisted { entity: "vehicle" }),
            Err(e) => {
                error!(error = %e, "Failed to save vehicle");
                Err(ApplicationError::NotPersisted { entity: "vehicle" })
            }
        }
    }

    /// Delete a vehicle and reload. `false` if `id` is `None` or nothing
    /// was deleted.
    #[instrument(skip(self))]
    pub fn delete(&self, id: Option<EntityId>) -> bool {
        let Some(id) = id else {
            return false;
        };

        match self.vehicles.delete(id) {
            Ok(true) => {
                {
                    let mut state = self.state.borrow_mut();
                    if state.selected.as_ref().and_then(Vehicle::id) == Some(id) {
                        state.selected = None;
                    }
                }
                info!(%id, "Vehicle deleted");
                // load() notifies whatever happens
                self.load();
                true
            }
            Ok(false) => {
                debug!(%id, "No vehicle to delete");
                false
            }
            Err(e) => {
                error!(error = %e, "Failed to delete vehicle");
                false
            }
        }
    }

    pub fn subscribe(&self, callback: Callback) -> Option<SubscriptionId> {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    pub fn subscribers(&self) -> Subscribers {
        self.subscribers.clone()
    }

    pub fn vehicles(&self) -> Vec<Vehicle> {
        self.state.borrow().vehicles.clone()
    }

    pub fn selected(&self) -> Option<Vehicle> {
        self.state.borrow().selected.clone()
    }

    pub fn catalog(&self) -> ReferenceCatalog {
        self.state.borrow().catalog.clone()
    }

    pub fn types(&self) -> Vec<VehicleType> {
        self.state.borrow().catalog.types().cloned().collect()
    }

    pub fn statuses(&self) -> Vec<VehicleStatus> {
        self.state.borrow().catalog.statuses().cloned().collect()
    }

    pub fn filter_term(&self) -> String {
        self.state.borrow().filter_term.clone()
    }

    pub fn filter_status(&self) -> StatusFilter {
        self.state.borrow().filter_status.clone()
    }
}
