//! SQLite connection handle shared by the record stores.
//!
//! sqlx is async; the ports are not. A [`Database`] owns a current-thread
//! Tokio runtime next to its pool and blocks on every query, so callers stay
//! synchronous. Clone it into each store; clones share the pool and runtime.

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info, instrument};

use driveflow_core::{
    application::ApplicationError,
    error::{DriveflowError, DriveflowResult},
};

/// Schema and seed data, embedded at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// URL of a private in-memory database.
pub const IN_MEMORY_URL: &str = "sqlite::memory:";

/// Owned database connection: pool plus the runtime that drives it.
#[derive(Clone)]
pub struct Database {
    runtime: Arc<Runtime>,
    pool: SqlitePool,
    url: Arc<str>,
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("url", &self.url)
            .field("connections", &self.pool.size())
            .finish()
    }
}

impl Database {
    /// Open (creating if missing) the database at `url`.
    ///
    /// In-memory URLs get a single connection that never expires, since every
    /// new connection would see a different empty database.
    #[instrument(skip_all, fields(url = %url))]
    pub fn connect(url: &str, max_connections: u32) -> DriveflowResult<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| db_error("start database runtime", e))?;

        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| db_error("parse database url", e))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool_options = if is_in_memory(url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = runtime
            .block_on(pool_options.connect_with(options))
            .map_err(|e| db_error("connect", e))?;

        info!("Database connected");
        Ok(Self {
            runtime: Arc::new(runtime),
            pool,
            url: Arc::from(url),
        })
    }

    /// Fresh in-memory database with the schema applied.
    pub fn in_memory() -> DriveflowResult<Self> {
        let db = Self::connect(IN_MEMORY_URL, 1)?;
        db.migrate()?;
        Ok(db)
    }

    /// Apply pending migrations. Safe to call on every start.
    #[instrument(skip(self))]
    pub fn migrate(&self) -> DriveflowResult<()> {
        self.block_on(MIGRATOR.run(&self.pool))
            .map_err(|e| db_error("run migrations", e))?;
        debug!("Migrations applied");
        Ok(())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run `future` to completion on the database runtime.
    ///
    /// Must not be called from inside another async runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Close every pooled connection. Later queries fail.
    pub fn close(&self) {
        self.block_on(self.pool.close());
        debug!("Database closed");
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

pub(crate) fn db_error(operation: &'static str, e: impl fmt::Display) -> DriveflowError {
    ApplicationError::store(operation, e).into()
}
