//! `driveflow catalog` — vehicle types and statuses.

use driveflow_core::application::{VehicleStatusStore, VehicleTypeStore};

use super::{Backend, money};
use crate::{
    cli::CatalogCommands,
    error::{CliResult, IntoCli},
    output::{Listing, OutputManager},
};

pub fn execute(cmd: CatalogCommands, backend: &Backend, output: &OutputManager) -> CliResult<()> {
    match cmd {
        CatalogCommands::Types(args) => {
            let types = backend
                .stores
                .types
                .get_all()
                .with_cli_context(|| "listing vehicle types")?;
            let listing = Listing {
                title: "Vehicle types",
                headers: &["ID", "NAME", "BASE DEPOSIT"],
                rows: types
                    .iter()
                    .map(|t| vec![t.id.to_string(), t.name.clone(), money(t.base_deposit)])
                    .collect(),
                labels: types.iter().map(|t| t.name.clone()).collect(),
                records: &types,
            };
            output.listing(args.format, &listing)?;
        }

        CatalogCommands::Statuses(args) => {
            let statuses = backend
                .stores
                .statuses
                .get_all()
                .with_cli_context(|| "listing vehicle statuses")?;
            let listing = Listing {
                title: "Vehicle statuses",
                headers: &["ID", "NAME"],
                rows: statuses
                    .iter()
                    .map(|s| vec![s.id.to_string(), s.name.clone()])
                    .collect(),
                labels: statuses.iter().map(|s| s.name.clone()).collect(),
                records: &statuses,
            };
            output.listing(args.format, &listing)?;
        }
    }

    Ok(())
}
