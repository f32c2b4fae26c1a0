//! In-memory record stores.
//!
//! Same search and ordering semantics as the SQLite stores, without a
//! database. Presenter integration tests run against these.

mod customer;
mod reference;
mod vehicle;

use std::collections::BTreeMap;

use driveflow_core::domain::EntityId;

pub use customer::InMemoryCustomerStore;
pub use reference::InMemoryReferenceStore;
pub use vehicle::InMemoryVehicleStore;

/// Rows keyed by id with an autoincrement counter.
#[derive(Debug)]
struct Table<T> {
    next_id: i64,
    rows: BTreeMap<EntityId, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        id
    }
}

/// Case-insensitive substring test; a blank needle matches.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(needle)
}
