use std::sync::{Arc, RwLock};

use driveflow_core::{
    application::{ApplicationError, ports::VehicleStore},
    domain::{EntityId, ReferenceCatalog, Vehicle, VehicleDraft},
    error::DriveflowResult,
};

use super::{Table, contains_ignore_case};

/// Thread-safe in-memory vehicle store.
///
/// Reads re-resolve type and status through the given catalog, as the
/// SQLite store does.
#[derive(Debug, Clone, Default)]
pub struct InMemoryVehicleStore {
    inner: Arc<RwLock<Table<Vehicle>>>,
}

impl InMemoryVehicleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn resolved(vehicle: &Vehicle, catalog: &ReferenceCatalog) -> Option<Vehicle> {
    Vehicle::new(VehicleDraft {
        id: vehicle.id(),
        brand: vehicle.brand().to_string(),
        model: vehicle.model().to_string(),
        year: vehicle.year(),
        plate: vehicle.plate().to_string(),
        vehicle_type: catalog.resolve_type(vehicle.vehicle_type().id),
        status: catalog.resolve_status(vehicle.status().id),
        price_per_day: vehicle.price_per_day(),
        odometer: vehicle.odometer(),
        image: vehicle.image().map(str::to_string),
    })
    .ok()
}

fn sorted(mut vehicles: Vec<Vehicle>) -> Vec<Vehicle> {
    vehicles.sort_by(|a, b| (a.brand(), a.model()).cmp(&(b.brand(), b.model())));
    vehicles
}

impl VehicleStore for InMemoryVehicleStore {
    fn get_all(&self, catalog: &ReferenceCatalog) -> DriveflowResult<Vec<Vehicle>> {
        self.search_and_filter("", None, catalog)
    }

    fn get_by_id(
        &self,
        id: EntityId,
        catalog: &ReferenceCatalog,
    ) -> DriveflowResult<Option<Vehicle>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.rows.get(&id).and_then(|v| resolved(v, catalog)))
    }

    fn save(&self, vehicle: &Vehicle) -> DriveflowResult<bool> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        let duplicate = inner
            .rows
            .values()
            .any(|v| v.plate() == vehicle.plate() && v.id() != vehicle.id());
        if duplicate {
            return Err(ApplicationError::store(
                "save vehicle",
                format!("plate {} already registered", vehicle.plate()),
            )
            .into());
        }

        match vehicle.id() {
            Some(id) => match inner.rows.get_mut(&id) {
                Some(row) => {
                    *row = vehicle.clone();
                    Ok(true)
                }
                None => Ok(false),
            },
            None => {
                let id = inner.allocate_id();
                inner.rows.insert(id, vehicle.clone().with_id(id));
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

    fn search_and_filter(
        &self,
        term: &str,
        status: Option<EntityId>,
        catalog: &ReferenceCatalog,
    ) -> DriveflowResult<Vec<Vehicle>> {
        let needle = term.trim().to_lowercase();
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(sorted(
            inner
                .rows
                .values()
                .filter(|v| status.is_none_or(|s| v.status().id == s))
                .filter(|v| {
                    contains_ignore_case(v.brand(), &needle)
                        || contains_ignore_case(v.model(), &needle)
                        || contains_ignore_case(v.plate(), &needle)
                })
                .filter_map(|v| resolved(v, catalog))
                .collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driveflow_core::domain::{VehicleStatus, VehicleType};

    fn catalog() -> ReferenceCatalog {
        ReferenceCatalog::new(
            vec![VehicleType {
                id: EntityId::new(1),
                name: "Sedan".into(),
                base_deposit: 300.0,
            }],
            vec![
                VehicleStatus {
                    id: EntityId::new(1),
                    name: "Disponible".into(),
                },
                VehicleStatus {
                    id: EntityId::new(2),
                    name: "Alquilado".into(),
                },
            ],
        )
    }

    fn vehicle(brand: &str, plate: &str, status: i64) -> Vehicle {
        let catalog = catalog();
        Vehicle::new(VehicleDraft {
            id: None,
            brand: brand.into(),
            model: "Base".into(),
            year: 2020,
            plate: plate.into(),
            vehicle_type: catalog.resolve_type(EntityId::new(1)),
            status: catalog.resolve_status(EntityId::new(status)),
            price_per_day: 80.0,
            odometer: None,
            image: None,
        })
        .unwrap()
    }

    #[test]
    fn search_combines_term_and_status() {
        let store = InMemoryVehicleStore::new();
        store.save(&vehicle("Toyota", "AAA-111", 1)).unwrap();
        store.save(&vehicle("Toyota", "BBB-222", 2)).unwrap();
        store.save(&vehicle("Kia", "CCC-333", 1)).unwrap();

        let found = store
            .search_and_filter("toyota", Some(EntityId::new(1)), &catalog())
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].plate(), "AAA-111");
        assert_eq!(store.get_all(&catalog()).unwrap()[0].brand(), "Kia");
    }

    #[test]
    fn unknown_ids_resolve_to_placeholders() {
        let store = InMemoryVehicleStore::new();
        store.save(&vehicle("Kia", "CCC-333", 2)).unwrap();

        let empty = ReferenceCatalog::default();
        let found = store.get_by_id(EntityId::new(1), &empty).unwrap().unwrap();
        assert_eq!(found.vehicle_type().name, "Unknown type");
        assert_eq!(found.status().name, "Unknown status");
    }
}
