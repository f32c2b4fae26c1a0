//! View-model for the customer management screen.

use std::cell::RefCell;

use tracing::{debug, error, info, instrument};

use crate::application::{
    ApplicationError,
    notifier::{Callback, SubscriptionId, Subscribers},
    ports::CustomerStore,
};
use crate::domain::{Customer, CustomerForm, DomainValidator, EntityId};

/// Shown after a successful save.
pub const CUSTOMER_SAVED: &str = "Customer saved successfully.";

#[derive(Debug, Default)]
struct CustomerState {
    customers: Vec<Customer>,
    selected: Option<Customer>,
    filter_term: String,
}

/// Holds the customer list and selection shown by a view.
///
/// Methods take `&self`; state is released before subscribers run, so a
/// callback may call back into the presenter.
pub struct CustomerPresenter {
    store: Box<dyn CustomerStore>,
    state: RefCell<CustomerState>,
    subscribers: Subscribers,
}

impl CustomerPresenter {
    pub fn new(store: Box<dyn CustomerStore>) -> Self {
        Self {
            store,
            state: RefCell::new(CustomerState::default()),
            subscribers: Subscribers::new(),
        }
    }

    /// Replace the list with every stored customer.
    ///
    /// On store failure the list is left as it was and nobody is notified.
    #[instrument(skip_all)]
    pub fn load(&self) -> bool {
        match self.store.get_all() {
            Ok(customers) => {
                info!(count = customers.len(), "Customers loaded");
                {
                    let mut state = self.state.borrow_mut();
                    state.customers = customers;
                    state.filter_term.clear();
                }
                self.subscribers.notify();
                true
            }
            Err(e) => {
                error!(error = %e, "Failed to load customers");
                false
            }
        }
    }

    /// Replace the list with customers matching `term`.
    #[instrument(skip(self))]
    pub fn search(&self, term: &str) -> bool {
        let term = term.trim();
        match self.store.search(term) {
            Ok(customers) => {
                debug!(count = customers.len(), "Customer search done");
                {
                    let mut state = self.state.borrow_mut();
                    state.customers = customers;
                    state.filter_term = term.to_string();
                }
                self.subscribers.notify();
                true
            }
            Err(e) => {
                error!(error = %e, "Customer search failed");
                false
            }
        }
    }

    /// Change the selection. Returns `false`, without notifying, when it is
    /// already `customer`.
    pub fn select(&self, customer: Option<Customer>) -> bool {
        {
            let mut state = self.state.borrow_mut();
            if state.selected == customer {
                return false;
            }
            state.selected = customer;
        }
        self.subscribers.notify();
        true
    }

    /// Validate, build and persist a customer, then reload.
    ///
    /// `id` is `None` for a new customer. Validation failures never reach
    /// the store.
    #[instrument(skip(self, form), fields(national_id = %form.national_id.trim()))]
    pub fn save(
        &self,
        id: Option<EntityId>,
        form: CustomerForm,
    ) -> Result<&'static str, ApplicationError> {
        if let Err(e) = DomainValidator::validate_customer(&form) {
            debug!(error = %e, "Customer form rejected");
            return Err(ApplicationError::Validation(e));
        }

        let customer = Customer::new(form.into_draft(id)).map_err(ApplicationError::Construction)?;

        match self.store.save(&customer) {
            Ok(true) => {
                info!(name = %customer.full_name(), "Customer saved");
                self.load();
                Ok(CUSTOMER_SAVED)
            }
            Ok(false) => Err(ApplicationError::NotPersisted { entity: "customer" }),
            Err(e) => {
                error!(error = %e, "Failed to save customer");
                Err(ApplicationError::NotPersisted { entity: "customer" })
            }
        }
    }

    /// Delete a customer and reload. `false` if `id` is `None` or nothing
    /// was deleted.
    #[instrument(skip(self))]
    pub fn delete(&self, id: Option<EntityId>) -> bool {
        let Some(id) = id else {
            return false;
        };

        match self.store.delete(id) {
            Ok(true) => {
                {
                    let mut state = self.state.borrow_mut();
                    if state.selected.as_ref().and_then(Customer::id) == Some(id) {
                        state.selected = None;
                    }
                }
                info!(%id, "Customer deleted");
                if !self.load() {
                    self.subscribers.notify();
                }
                true
            }
            Ok(false) => {
                debug!(%id, "No customer to delete");
                false
            }
            Err(e) => {
                error!(error = %e, "Failed to delete customer");
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

    /// Shared handle to the subscriber list, for callbacks that unsubscribe
    /// themselves.
    pub fn subscribers(&self) -> Subscribers {
        self.subscribers.clone()
    }

    pub fn customers(&self) -> Vec<Customer> {
        self.state.borrow().customers.clone()
    }

    pub fn selected(&self) -> Option<Customer> {
        self.state.borrow().selected.clone()
    }

    pub fn filter_term(&self) -> String {
        self.state.borrow().filter_term.clone()
    }
}
