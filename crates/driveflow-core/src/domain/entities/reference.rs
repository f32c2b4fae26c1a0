//! Lookup entities referenced by vehicles, and the catalog that caches them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::EntityId;

/// Name used when a stored lookup row has no name.
pub const UNKNOWN_NAME: &str = "Unknown";

/// A vehicle category (sedan, SUV, ...) with the deposit it requires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleType {
    pub id: EntityId,
    pub name: String,
    pub base_deposit: f64,
}

impl VehicleType {
    /// Stand-in for a type id the catalog does not know.
    pub fn placeholder(id: EntityId) -> Self {
        Self {
            id,
            name: "Unknown type".into(),
            base_deposit: 0.0,
        }
    }
}

/// Availability of a vehicle (available, rented, in maintenance, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleStatus {
    pub id: EntityId,
    pub name: String,
}

impl VehicleStatus {
    /// Stand-in for a status id the catalog does not know.
    pub fn placeholder(id: EntityId) -> Self {
        Self {
            id,
            name: "Unknown status".into(),
        }
    }
}

/// Types and statuses keyed by id, loaded once per management session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceCatalog {
    types: BTreeMap<EntityId, VehicleType>,
    statuses: BTreeMap<EntityId, VehicleStatus>,
}

impl ReferenceCatalog {
    pub fn new(types: Vec<VehicleType>, statuses: Vec<VehicleStatus>) -> Self {
        Self {
            types: types.into_iter().map(|t| (t.id, t)).collect(),
            statuses: statuses.into_iter().map(|s| (s.id, s)).collect(),
        }
    }

    pub fn types(&self) -> impl Iterator<Item = &VehicleType> {
        self.types.values()
    }

    pub fn statuses(&self) -> impl Iterator<Item = &VehicleStatus> {
        self.statuses.values()
    }

    /// Type for `id`, or a placeholder when the id is unknown.
    pub fn resolve_type(&self, id: EntityId) -> VehicleType {
        self.types
            .get(&id)
            .cloned()
            .unwrap_or_else(|| VehicleType::placeholder(id))
    }

    /// Status for `id`, or a placeholder when the id is unknown.
    pub fn resolve_status(&self, id: EntityId) -> VehicleStatus {
        self.statuses
            .get(&id)
            .cloned()
            .unwrap_or_else(|| VehicleStatus::placeholder(id))
    }

    /// Exact (case-sensitive) lookup by display name.
    pub fn type_named(&self, name: &str) -> Option<&VehicleType> {
        self.types.values().find(|t| t.name == name)
    }

    /// Exact (case-sensitive) lookup by display name.
    pub fn status_named(&self, name: &str) -> Option<&VehicleStatus> {
        self.statuses.values().find(|s| s.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.statuses.is_empty()
    }
}
