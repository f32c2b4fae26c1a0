//! Command handlers, one module per top-level subcommand.

use driveflow_adapters::{Database, LocalImageStore, SqliteStores};
use driveflow_core::application::{CustomerPresenter, VehiclePresenter};
use tracing::{debug, instrument};

use crate::{
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

pub mod catalog;
pub mod completions;
pub mod config;
pub mod customers;
pub mod dashboard;
pub mod db;
pub mod init;
pub mod vehicles;

/// Everything a data command needs: the open database, its stores and the
/// image directory.
pub struct Backend {
    pub db: Database,
    pub stores: SqliteStores,
    pub images: LocalImageStore,
    pub thumbnail_bounds: (u32, u32),
}

impl Backend {
    /// Open the configured database and bring its schema up to date.
    #[instrument(skip_all, fields(url = %config.database.url))]
    pub fn open(config: &AppConfig, output: &OutputManager) -> CliResult<Self> {
        let spinner = output.spinner("Opening database...");

        let db = Database::connect(&config.database.url, config.database.max_connections)
            .with_cli_context(|| "opening database")?;
        spinner.set_message("Applying migrations...");
        let migrated = db.migrate().with_cli_context(|| "applying migrations");
        spinner.finish_and_clear();
        if let Err(e) = migrated {
            db.close();
            return Err(e);
        }

        let images = LocalImageStore::new(&config.images.dir)
            .with_cli_context(|| "preparing images directory")?;

        debug!("Backend ready");
        Ok(Self {
            stores: SqliteStores::new(&db),
            db,
            images,
            thumbnail_bounds: config.thumbnail_bounds(),
        })
    }

    pub fn customer_presenter(&self) -> CustomerPresenter {
        CustomerPresenter::new(Box::new(self.stores.customers.clone()))
    }

    pub fn vehicle_presenter(&self) -> VehiclePresenter {
        VehiclePresenter::new(
            Box::new(self.stores.vehicles.clone()),
            Box::new(self.stores.types.clone()),
            Box::new(self.stores.statuses.clone()),
        )
    }

    /// Close the pool. Stores built from this backend stop working.
    pub fn close(self) {
        self.db.close();
    }
}

/// Ask before a destructive step.  `--yes` skips the prompt; without a
/// terminal to ask on, `--yes` is required.
pub fn confirm(prompt: &str, yes: bool) -> CliResult<bool> {
    if yes {
        return Ok(true);
    }
    ask(prompt)
}

#[cfg(feature = "interactive")]
fn ask(prompt: &str) -> CliResult<bool> {
    use std::io::IsTerminal as _;

    if !std::io::stdin().is_terminal() {
        return Err(needs_yes());
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| CliError::IoError {
            message: "Prompt failed".into(),
            source: std::io::Error::other(e),
        })
}

#[cfg(not(feature = "interactive"))]
fn ask(_prompt: &str) -> CliResult<bool> {
    Err(needs_yes())
}

fn needs_yes() -> CliError {
    CliError::InvalidInput {
        message: "confirmation needed; pass --yes to proceed".into(),
        source: None,
    }
}

/// Money with two decimals.
pub(crate) fn money(amount: f64) -> String {
    format!("{amount:.2}")
}

/// Empty cell for a missing optional value.
pub(crate) fn cell(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_skips_the_prompt() {
        assert!(confirm("Delete?", true).unwrap());
    }

    #[test]
    fn cells() {
        assert_eq!(money(45.0), "45.00");
        assert_eq!(money(12.5), "12.50");
        assert_eq!(cell(None), "-");
        assert_eq!(cell(Some("Miraflores")), "Miraflores");
    }
}
