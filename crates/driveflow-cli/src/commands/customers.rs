//! `driveflow customers` — customer management.

use driveflow_core::{
    application::CustomerPresenter,
    domain::{Customer, EntityId},
};
use tracing::instrument;

use super::{Backend, cell, confirm};
use crate::{
    cli::{CustomerCommands, ListFormat},
    error::{CliError, CliResult},
    output::{Listing, OutputManager},
};

const HEADERS: &[&str] = &[
    "ID", "NAME", "NATIONAL ID", "LICENSE", "PHONE", "EMAIL", "DISTRICT",
];

/// Dispatch to the correct customers subcommand.
#[instrument(skip_all)]
pub fn execute(cmd: CustomerCommands, backend: &Backend, output: &OutputManager) -> CliResult<()> {
    let presenter = backend.customer_presenter();

    match cmd {
        CustomerCommands::List(args) => {
            load(&presenter)?;
            render(output, args.format, &presenter.customers())?;
        }

        CustomerCommands::Search { term, format } => {
            if !presenter.search(&term) {
                return Err(CliError::LoadFailed { what: "customers" });
            }
            render(output, format.format, &presenter.customers())?;
        }

        CustomerCommands::Show { id } => {
            load(&presenter)?;
            let customer = find(&presenter, id)?;
            show(output, &customer)?;
        }

        CustomerCommands::Save(args) => {
            let id = args.id.map(EntityId::new);
            if let Some(id) = id {
                load(&presenter)?;
                find(&presenter, id.get())?;
            }
            let message = presenter.save(id, args.to_form())?;
            output.success(message)?;
        }

        CustomerCommands::Delete(args) => {
            load(&presenter)?;
            let customer = find(&presenter, args.id)?;
            if !confirm(&format!("Delete {}?", customer.full_name()), args.yes)? {
                return Err(CliError::Cancelled);
            }
            if !presenter.delete(customer.id()) {
                return Err(CliError::NotDeleted { entity: "customer" });
            }
            output.success(&format!("Customer {} deleted.", customer.full_name()))?;
        }
    }

    Ok(())
}

fn load(presenter: &CustomerPresenter) -> CliResult<()> {
    if presenter.load() {
        Ok(())
    } else {
        Err(CliError::LoadFailed { what: "customers" })
    }
}

fn find(presenter: &CustomerPresenter, id: i64) -> CliResult<Customer> {
    presenter
        .customers()
        .into_iter()
        .find(|c| c.id() == Some(EntityId::new(id)))
        .ok_or(CliError::RecordNotFound {
            entity: "customer",
            id,
        })
}

pub(crate) fn listing(customers: &[Customer]) -> Listing<'_, Customer> {
    Listing {
        title: "Customers",
        headers: HEADERS,
        rows: customers
            .iter()
            .map(|c| {
                vec![
                    c.id().map(|id| id.to_string()).unwrap_or_default(),
                    c.full_name(),
                    c.national_id().to_string(),
                    c.license().to_string(),
                    cell(c.phone()),
                    cell(c.email()),
                    cell(c.district()),
                ]
            })
            .collect(),
        labels: customers.iter().map(Customer::full_name).collect(),
        records: customers,
    }
}

pub(crate) fn render(
    output: &OutputManager,
    format: ListFormat,
    customers: &[Customer],
) -> CliResult<()> {
    output.listing(format, &listing(customers))?;
    Ok(())
}

fn show(output: &OutputManager, c: &Customer) -> CliResult<()> {
    output.header(&c.full_name())?;
    for (label, value) in [
        ("National ID", Some(c.national_id())),
        ("License", Some(c.license())),
        ("Phone", c.phone()),
        ("Email", c.email()),
        ("Address", c.address()),
        ("District", c.district()),
    ] {
        output.data(&format!("  {label:<12} {}", cell(value)))?;
    }
    Ok(())
}
