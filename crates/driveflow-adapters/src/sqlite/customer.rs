use sqlx::FromRow;
use tracing::{debug, instrument, warn};

use driveflow_core::{
    application::ports::CustomerStore,
    domain::{Customer, CustomerDraft, DomainError, EntityId},
    error::DriveflowResult,
};

use super::{contains_pattern, search_key};
use crate::database::{Database, db_error};

const SELECT_CUSTOMERS: &str = "SELECT id, first_name, last_name, national_id, license, \
     phone, email, address, district FROM customers";

#[derive(Debug, FromRow)]
struct CustomerRow {
    id: i64,
    first_name: String,
    last_name: String,
    national_id: String,
    license: String,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
    district: Option<String>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = DomainError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        Customer::new(CustomerDraft {
            id: Some(EntityId::new(row.id)),
            first_name: row.first_name,
            last_name: row.last_name,
            national_id: row.national_id,
            license: row.license,
            phone: row.phone,
            email: row.email,
            address: row.address,
            district: row.district,
        })
    }
}

/// Keep rows that still satisfy the customer invariants.
fn into_customers(rows: Vec<CustomerRow>) -> Vec<Customer> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id;
            Customer::try_from(row)
                .inspect_err(|e| warn!(id, error = %e, "Skipping invalid customer row"))
                .ok()
        })
        .collect()
}

/// Customer store over the `customers` table.
#[derive(Debug, Clone)]
pub struct SqliteCustomerStore {
    db: Database,
}

impl SqliteCustomerStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl CustomerStore for SqliteCustomerStore {
    #[instrument(skip(self))]
    fn get_all(&self) -> DriveflowResult<Vec<Customer>> {
        let sql = format!("{SELECT_CUSTOMERS} ORDER BY last_name, first_name");
        let rows: Vec<CustomerRow> = self
            .db
            .block_on(sqlx::query_as(&sql).fetch_all(self.db.pool()))
            .map_err(|e| db_error("list customers", e))?;
        debug!(rows = rows.len(), "Customer rows read");
        Ok(into_customers(rows))
    }

    fn get_by_id(&self, id: EntityId) -> DriveflowResult<Option<Customer>> {
        let sql = format!("{SELECT_CUSTOMERS} WHERE id = ?");
        let row: Option<CustomerRow> = self
            .db
            .block_on(sqlx::query_as(&sql).bind(id.get()).fetch_optional(self.db.pool()))
            .map_err(|e| db_error("read customer", e))?;
        Ok(row.and_then(|row| into_customers(vec![row]).pop()))
    }

    fn get_by_national_id(&self, national_id: &str) -> DriveflowResult<Option<Customer>> {
        let sql = format!("{SELECT_CUSTOMERS} WHERE national_id = ?");
        let row: Option<CustomerRow> = self
            .db
            .block_on(
                sqlx::query_as(&sql)
                    .bind(national_id.trim())
                    .fetch_optional(self.db.pool()),
            )
            .map_err(|e| db_error("read customer", e))?;
        Ok(row.and_then(|row| into_customers(vec![row]).pop()))
    }

    #[instrument(skip(self, customer), fields(id = ?customer.id()))]
    fn save(&self, customer: &Customer) -> DriveflowResult<bool> {
        let [first_key, last_key, district_key] = [
            search_key(customer.first_name()),
            search_key(customer.last_name()),
            search_key(customer.district().unwrap_or_default()),
        ];
        let query = match customer.id() {
            Some(id) => sqlx::query(
                "UPDATE customers SET first_name = ?, last_name = ?, national_id = ?, \
                 license = ?, phone = ?, email = ?, address = ?, district = ?, \
                 first_name_key = ?, last_name_key = ?, district_key = ? WHERE id = ?",
            )
            .bind(customer.first_name())
            .bind(customer.last_name())
            .bind(customer.national_id())
            .bind(customer.license())
            .bind(customer.phone())
            .bind(customer.email())
            .bind(customer.address())
            .bind(customer.district())
            .bind(first_key)
            .bind(last_key)
            .bind(district_key)
            .bind(id.get()),
            None => sqlx::query(
                "INSERT INTO customers (first_name, last_name, national_id, license, \
                 phone, email, address, district, first_name_key, last_name_key, district_key) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(customer.first_name())
            .bind(customer.last_name())
            .bind(customer.national_id())
            .bind(customer.license())
            .bind(customer.phone())
            .bind(customer.email())
            .bind(customer.address())
            .bind(customer.district())
            .bind(first_key)
            .bind(last_key)
            .bind(district_key),
        };

        let result = self
            .db
            .block_on(query.execute(self.db.pool()))
            .map_err(|e| db_error("save customer", e))?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    fn delete(&self, id: EntityId) -> DriveflowResult<bool> {
        let result = self
            .db
            .block_on(
                sqlx::query("DELETE FROM customers WHERE id = ?")
                    .bind(id.get())
                    .execute(self.db.pool()),
            )
            .map_err(|e| db_error("delete customer", e))?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    fn search(&self, term: &str) -> DriveflowResult<Vec<Customer>> {
        let pattern = contains_pattern(term.trim());
        let sql = format!(
            "{SELECT_CUSTOMERS} WHERE first_name_key LIKE ?1 ESCAPE '\\' \
             OR last_name_key LIKE ?1 ESCAPE '\\' \
             OR national_id LIKE ?1 ESCAPE '\\' \
             OR district_key LIKE ?1 ESCAPE '\\' \
             ORDER BY last_name, first_name"
        );
        let rows: Vec<CustomerRow> = self
            .db
            .block_on(sqlx::query_as(&sql).bind(pattern).fetch_all(self.db.pool()))
            .map_err(|e| db_error("search customers", e))?;
        Ok(into_customers(rows))
    }
}
