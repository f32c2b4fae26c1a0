//! `driveflow db` — database maintenance.

use driveflow_core::application::{VehicleStatusStore, VehicleTypeStore};

use super::Backend;
use crate::{
    cli::DbCommands,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

/// Opening the backend already applied the migrations; `init` reports what
/// the database now holds.
pub fn execute(cmd: DbCommands, backend: &Backend, output: &OutputManager) -> CliResult<()> {
    match cmd {
        DbCommands::Init => {
            let types = backend
                .stores
                .types
                .get_all()
                .with_cli_context(|| "reading vehicle types")?;
            let statuses = backend
                .stores
                .statuses
                .get_all()
                .with_cli_context(|| "reading vehicle statuses")?;

            output.success(&format!("Database ready at {}", backend.db.url()))?;
            output.info(&format!(
                "{} vehicle types, {} statuses",
                types.len(),
                statuses.len()
            ))?;
            output.info(&format!(
                "Images are stored in {}",
                backend.images.dir().display()
            ))?;
        }
    }
    Ok(())
}
