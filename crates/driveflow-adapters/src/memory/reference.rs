use std::sync::{Arc, RwLock};

use driveflow_core::{
    application::{
        ApplicationError,
        ports::{VehicleStatusStore, VehicleTypeStore},
    },
    domain::{EntityId, VehicleStatus, VehicleType},
    error::DriveflowResult,
};

#[derive(Debug, Default)]
struct Lookups {
    types: Vec<VehicleType>,
    statuses: Vec<VehicleStatus>,
}

/// Types and statuses held in memory. Serves both lookup ports.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReferenceStore {
    inner: Arc<RwLock<Lookups>>,
}

impl InMemoryReferenceStore {
    pub fn new(types: Vec<VehicleType>, statuses: Vec<VehicleStatus>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Lookups { types, statuses })),
        }
    }

    /// The same rows the database migration seeds.
    pub fn seeded() -> Self {
        let types = [("Sedan", 300.0), ("SUV", 500.0), ("Pickup", 600.0), ("Van", 450.0)]
            .into_iter()
            .zip(1..)
            .map(|((name, base_deposit), id)| VehicleType {
                id: EntityId::new(id),
                name: name.into(),
                base_deposit,
            })
            .collect();
        let statuses = ["Disponible", "Alquilado", "Mantenimiento"]
            .into_iter()
            .zip(1..)
            .map(|(name, id)| VehicleStatus {
                id: EntityId::new(id),
                name: name.into(),
            })
            .collect();
        Self::new(types, statuses)
    }
}

impl VehicleTypeStore for InMemoryReferenceStore {
    fn get_all(&self) -> DriveflowResult<Vec<VehicleType>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        let mut types = inner.types.clone();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(types)
    }

    fn get_by_id(&self, id: EntityId) -> DriveflowResult<Option<VehicleType>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.types.iter().find(|t| t.id == id).cloned())
    }
}

impl VehicleStatusStore for InMemoryReferenceStore {
    fn get_all(&self) -> DriveflowResult<Vec<VehicleStatus>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        let mut statuses = inner.statuses.clone();
        statuses.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(statuses)
    }

    fn get_by_id(&self, id: EntityId) -> DriveflowResult<Option<VehicleStatus>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.statuses.iter().find(|s| s.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_matches_migration() {
        let store = InMemoryReferenceStore::seeded();
        let types = VehicleTypeStore::get_all(&store).unwrap();
        assert_eq!(types.len(), 4);
        assert_eq!(
            VehicleStatusStore::get_by_id(&store, EntityId::new(2))
                .unwrap()
                .map(|s| s.name),
            Some("Alquilado".to_string())
        );
    }
}
