use sqlx::FromRow;
use tracing::instrument;

use driveflow_core::{
    application::ports::{VehicleStatusStore, VehicleTypeStore},
    domain::{EntityId, VehicleStatus, VehicleType, entities::reference::UNKNOWN_NAME},
    error::DriveflowResult,
};

use crate::database::{Database, db_error};

#[derive(Debug, FromRow)]
struct TypeRow {
    id: i64,
    name: Option<String>,
    base_deposit: Option<f64>,
}

impl From<TypeRow> for VehicleType {
    fn from(row: TypeRow) -> Self {
        VehicleType {
            id: EntityId::new(row.id),
            name: name_or_unknown(row.name),
            base_deposit: row.base_deposit.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, FromRow)]
struct StatusRow {
    id: i64,
    name: Option<String>,
}

impl From<StatusRow> for VehicleStatus {
    fn from(row: StatusRow) -> Self {
        VehicleStatus {
            id: EntityId::new(row.id),
            name: name_or_unknown(row.name),
        }
    }
}

fn name_or_unknown(name: Option<String>) -> String {
    name.map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| UNKNOWN_NAME.to_string())
}

/// Vehicle types, ordered by name.
#[derive(Debug, Clone)]
pub struct SqliteVehicleTypeStore {
    db: Database,
}

impl SqliteVehicleTypeStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl VehicleTypeStore for SqliteVehicleTypeStore {
    #[instrument(skip(self))]
    fn get_all(&self) -> DriveflowResult<Vec<VehicleType>> {
        let rows: Vec<TypeRow> = self
            .db
            .block_on(
                sqlx::query_as("SELECT id, name, base_deposit FROM vehicle_types ORDER BY name")
                    .fetch_all(self.db.pool()),
            )
            .map_err(|e| db_error("list vehicle types", e))?;
        Ok(rows.into_iter().map(VehicleType::from).collect())
    }

    fn get_by_id(&self, id: EntityId) -> DriveflowResult<Option<VehicleType>> {
        let row: Option<TypeRow> = self
            .db
            .block_on(
                sqlx::query_as("SELECT id, name, base_deposit FROM vehicle_types WHERE id = ?")
                    .bind(id.get())
                    .fetch_optional(self.db.pool()),
            )
            .map_err(|e| db_error("read vehicle type", e))?;
        Ok(row.map(VehicleType::from))
    }
}

/// Vehicle statuses, ordered by name.
#[derive(Debug, Clone)]
pub struct SqliteVehicleStatusStore {
    db: Database,
}

impl SqliteVehicleStatusStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl VehicleStatusStore for SqliteVehicleStatusStore {
    #[instrument(skip(self))]
    fn get_all(&self) -> DriveflowResult<Vec<VehicleStatus>> {
        let rows: Vec<StatusRow> = self
            .db
            .block_on(
                sqlx::query_as("SELECT id, name FROM vehicle_statuses ORDER BY name")
                    .fetch_all(self.db.pool()),
            )
            .map_err(|e| db_error("list vehicle statuses", e))?;
        Ok(rows.into_iter().map(VehicleStatus::from).collect())
    }

    fn get_by_id(&self, id: EntityId) -> DriveflowResult<Option<VehicleStatus>> {
        let row: Option<StatusRow> = self
            .db
            .block_on(
                sqlx::query_as("SELECT id, name FROM vehicle_statuses WHERE id = ?")
                    .bind(id.get())
                    .fetch_optional(self.db.pool()),
            )
            .map_err(|e| db_error("read vehicle status", e))?;
        Ok(row.map(VehicleStatus::from))
    }
}
