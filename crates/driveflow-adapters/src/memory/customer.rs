use std::sync::{Arc, RwLock};

use driveflow_core::{
    application::{ApplicationError, ports::CustomerStore},
    domain::{Customer, EntityId},
    error::DriveflowResult,
};

use super::{Table, contains_ignore_case};

/// Thread-safe in-memory customer store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCustomerStore {
    inner: Arc<RwLock<Table<Customer>>>,
}

impl InMemoryCustomerStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of customers.
    pub fn len(&self) -> usize {
        self.inner.read().map(|t| t.rows.len()).unwrap_or(0)
    }

    /// Check if store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn sorted(mut customers: Vec<Customer>) -> Vec<Customer> {
    customers.sort_by(|a, b| {
        (a.last_name(), a.first_name()).cmp(&(b.last_name(), b.first_name()))
    });
    customers
}

impl CustomerStore for InMemoryCustomerStore {
    fn get_all(&self) -> DriveflowResult<Vec<Customer>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(sorted(inner.rows.values().cloned().collect()))
    }

    fn get_by_id(&self, id: EntityId) -> DriveflowResult<Option<Customer>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.rows.get(&id).cloned())
    }

    fn get_by_national_id(&self, national_id: &str) -> DriveflowResult<Option<Customer>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        let national_id = national_id.trim();
        Ok(inner
            .rows
            .values()
            .find(|c| c.national_id() == national_id)
            .cloned())
    }

    fn save(&self, customer: &Customer) -> DriveflowResult<bool> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        let duplicate = inner
            .rows
            .values()
            .any(|c| c.national_id() == customer.national_id() && c.id() != customer.id());
        if duplicate {
            return Err(ApplicationError::store(
                "save customer",
                format!("national ID {} already registered", customer.national_id()),
            )
            .into());
        }

        match customer.id() {
            Some(id) => match inner.rows.get_mut(&id) {
                Some(row) => {
                    *row = customer.clone();
                    Ok(true)
                }
                None => Ok(false),
            },
            None => {
                let id = inner.allocate_id();
                inner.rows.insert(id, customer.clone().with_id(id));
                Ok(true)
            }
        }
    }

    fn delete(&self, id: EntityId) -> DriveflowResult<bool> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.rows.remove(&id).is_some())
    }

    fn search(&self, term: &str) -> DriveflowResult<Vec<Customer>> {
        let needle = term.trim().to_lowercase();
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(sorted(
            inner
                .rows
                .values()
                .filter(|c| {
                    contains_ignore_case(c.first_name(), &needle)
                        || contains_ignore_case(c.last_name(), &needle)
                        || contains_ignore_case(c.national_id(), &needle)
                        || contains_ignore_case(c.district().unwrap_or_default(), &needle)
                })
                .cloned()
                .collect(),
        ))
    }
}
