use sqlx::{FromRow, QueryBuilder, Sqlite};
use tracing::{debug, instrument, warn};

use driveflow_core::{
    application::ports::VehicleStore,
    domain::{DomainError, EntityId, ReferenceCatalog, Vehicle, VehicleDraft},
    error::DriveflowResult,
};

use super::{contains_pattern, search_key};
use crate::database::{Database, db_error};

const SELECT_VEHICLES: &str = "SELECT id, brand, model, year, plate, type_id, status_id, \
     price_per_day, odometer, image FROM vehicles";

const ORDER_BY: &str = " ORDER BY brand, model";

#[derive(Debug, FromRow)]
struct VehicleRow {
    id: i64,
    brand: String,
    model: String,
    year: i64,
    plate: String,
    type_id: i64,
    status_id: i64,
    price_per_day: f64,
    odometer: Option<i64>,
    image: Option<String>,
}

impl VehicleRow {
    fn into_vehicle(self, catalog: &ReferenceCatalog) -> Result<Vehicle, DomainError> {
        Vehicle::new(VehicleDraft {
            id: Some(EntityId::new(self.id)),
            brand: self.brand,
            model: self.model,
            year: i32::try_from(self.year).map_err(|_| DomainError::InvalidYear)?,
            plate: self.plate,
            vehicle_type: catalog.resolve_type(EntityId::new(self.type_id)),
            status: catalog.resolve_status(EntityId::new(self.status_id)),
            price_per_day: self.price_per_day,
            odometer: self.odometer,
            image: self.image,
        })
    }
}

fn into_vehicles(rows: Vec<VehicleRow>, catalog: &ReferenceCatalog) -> Vec<Vehicle> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id;
            row.into_vehicle(catalog)
                .inspect_err(|e| warn!(id, error = %e, "Skipping invalid vehicle row"))
                .ok()
        })
        .collect()
}

/// Vehicle store over the `vehicles` table.
///
/// Only type and status ids are stored; reads resolve them through the
/// catalog passed in.
#[derive(Debug, Clone)]
pub struct SqliteVehicleStore {
    db: Database,
}

impl SqliteVehicleStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl VehicleStore for SqliteVehicleStore {
    #[instrument(skip_all)]
    fn get_all(&self, catalog: &ReferenceCatalog) -> DriveflowResult<Vec<Vehicle>> {
        let sql = format!("{SELECT_VEHICLES}{ORDER_BY}");
        let rows: Vec<VehicleRow> = self
            .db
            .block_on(sqlx::query_as(&sql).fetch_all(self.db.pool()))
            .map_err(|e| db_error("list vehicles", e))?;
        debug!(rows = rows.len(), "Vehicle rows read");
        Ok(into_vehicles(rows, catalog))
    }

    fn get_by_id(
        &self,
        id: EntityId,
        catalog: &ReferenceCatalog,
    ) -> DriveflowResult<Option<Vehicle>> {
        let sql = format!("{SELECT_VEHICLES} WHERE id = ?");
        let row: Option<VehicleRow> = self
            .db
            .block_on(sqlx::query_as(&sql).bind(id.get()).fetch_optional(self.db.pool()))
            .map_err(|e| db_error("read vehicle", e))?;
        Ok(row.and_then(|row| into_vehicles(vec![row], catalog).pop()))
    }

    #[instrument(skip(self, vehicle), fields(id = ?vehicle.id(), plate = vehicle.plate()))]
    fn save(&self, vehicle: &Vehicle) -> DriveflowResult<bool> {
        let [brand_key, model_key, plate_key] = [
            search_key(vehicle.brand()),
            search_key(vehicle.model()),
            search_key(vehicle.plate()),
        ];
        let query = match vehicle.id() {
            Some(id) => sqlx::query(
                "UPDATE vehicles SET brand = ?, model = ?, year = ?, plate = ?, type_id = ?, \
                 status_id = ?, price_per_day = ?, odometer = ?, image = ?, \
                 brand_key = ?, model_key = ?, plate_key = ? WHERE id = ?",
            )
            .bind(vehicle.brand())
            .bind(vehicle.model())
            .bind(vehicle.year())
            .bind(vehicle.plate())
            .bind(vehicle.vehicle_type().id.get())
            .bind(vehicle.status().id.get())
            .bind(vehicle.price_per_day())
            .bind(vehicle.odometer())
            .bind(vehicle.image())
            .bind(brand_key)
            .bind(model_key)
            .bind(plate_key)
            .bind(id.get()),
            None => sqlx::query(
                "INSERT INTO vehicles (brand, model, year, plate, type_id, status_id, \
                 price_per_day, odometer, image, brand_key, model_key, plate_key) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(vehicle.brand())
            .bind(vehicle.model())
            .bind(vehicle.year())
            .bind(vehicle.plate())
            .bind(vehicle.vehicle_type().id.get())
            .bind(vehicle.status().id.get())
            .bind(vehicle.price_per_day())
            .bind(vehicle.odometer())
            .bind(vehicle.image())
            .bind(brand_key)
            .bind(model_key)
            .bind(plate_key),
        };

        let result = self
            .db
            .block_on(query.execute(self.db.pool()))
            .map_err(|e| db_error("save vehicle", e))?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    fn delete(&self, id: EntityId) -> DriveflowResult<bool> {
        let result = self
            .db
            .block_on(
                sqlx::query("DELETE FROM vehicles WHERE id = ?")
                    .bind(id.get())
                    .execute(self.db.pool()),
            )
            .map_err(|e| db_error("delete vehicle", e))?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, catalog))]
    fn search_and_filter(
        &self,
        term: &str,
        status: Option<EntityId>,
        catalog: &ReferenceCatalog,
    ) -> DriveflowResult<Vec<Vehicle>> {
        let mut query = QueryBuilder::<Sqlite>::new(SELECT_VEHICLES);
        let mut joiner = " WHERE ";

        let term = term.trim();
        if !term.is_empty() {
            let pattern = contains_pattern(term);
            query.push(joiner).push("(brand_key LIKE ");
            query.push_bind(pattern.clone()).push(" ESCAPE '\\' OR model_key LIKE ");
            query.push_bind(pattern.clone()).push(" ESCAPE '\\' OR plate_key LIKE ");
            query.push_bind(pattern).push(" ESCAPE '\\')");
            joiner = " AND ";
        }
        if let Some(status) = status {
            query.push(joiner).push("status_id = ").push_bind(status.get());
        }
        query.push(ORDER_BY);

        let rows: Vec<VehicleRow> = self
            .db
            .block_on(query.build_query_as().fetch_all(self.db.pool()))
            .map_err(|e| db_error("search vehicles", e))?;
        Ok(into_vehicles(rows, catalog))
    }
}
