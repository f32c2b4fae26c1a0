//! `driveflow dashboard` — interactive module picker.
//!
//! Opening a module starts a session bound to that module's presenter.  The
//! session's view is the only strong owner of itself; the presenter's redraw
//! callback holds a weak handle, so a closed session's callback reports
//! itself stale on the next broadcast and is dropped.  Sessions are modal,
//! so at most one is open at a time.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use driveflow_core::application::{
    CustomerPresenter, SubscriberError, SubscriptionId, VehiclePresenter,
};
use tracing::debug;

use super::{Backend, customers, vehicles};
use crate::{
    cli::ListFormat,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dashboard entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Module {
    Customers,
    Vehicles,
    Reservations,
    Contracts,
    Deliveries,
    Returns,
}

impl Module {
    pub const ALL: [Module; 6] = [
        Module::Customers,
        Module::Vehicles,
        Module::Reservations,
        Module::Contracts,
        Module::Deliveries,
        Module::Returns,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Module::Customers => "Customers",
            Module::Vehicles => "Vehicles",
            Module::Reservations => "Reservations",
            Module::Contracts => "Contracts",
            Module::Deliveries => "Deliveries",
            Module::Returns => "Returns",
        }
    }

    pub fn is_implemented(self) -> bool {
        matches!(self, Module::Customers | Module::Vehicles)
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// What an open session draws into.
pub struct SessionView {
    module: Module,
    output: Rc<OutputManager>,
    redraws: Cell<usize>,
}

impl SessionView {
    pub fn new(module: Module, output: Rc<OutputManager>) -> Rc<Self> {
        Rc::new(Self {
            module,
            output,
            redraws: Cell::new(0),
        })
    }

    pub fn module(&self) -> Module {
        self.module
    }

    /// Times the presenter asked this view to redraw.
    pub fn redraws(&self) -> usize {
        self.redraws.get()
    }

    fn redrawn(&self, result: CliResult<()>) -> Result<(), SubscriberError> {
        self.redraws.set(self.redraws.get() + 1);
        result.map_err(|e| SubscriberError::Failed(e.to_string()))
    }
}

/// Redraw `view` with the customer list on every broadcast.
pub fn attach_customers(
    presenter: &Rc<CustomerPresenter>,
    view: &Rc<SessionView>,
) -> SubscriptionId {
    let presenter_handle = Rc::downgrade(presenter);
    let view_handle = Rc::downgrade(view);
    presenter.subscribers().subscribe_fn(move || {
        let (Some(view), Some(presenter)) = (view_handle.upgrade(), presenter_handle.upgrade())
        else {
            return Err(SubscriberError::Stale);
        };
        let rows = presenter.customers();
        view.redrawn(customers::render(&view.output, ListFormat::Table, &rows))
    })
}

/// Redraw `view` with the vehicle list on every broadcast.
pub fn attach_vehicles(
    presenter: &Rc<VehiclePresenter>,
    view: &Rc<SessionView>,
) -> SubscriptionId {
    let presenter_handle = Rc::downgrade(presenter);
    let view_handle = Rc::downgrade(view);
    presenter.subscribers().subscribe_fn(move || {
        let (Some(view), Some(presenter)) = (view_handle.upgrade(), presenter_handle.upgrade())
        else {
            return Err(SubscriberError::Stale);
        };
        let rows = presenter.vehicles();
        view.redrawn(vehicles::render(&view.output, ListFormat::Table, &rows))
    })
}

/// Run the dashboard until the user quits.
pub fn execute(backend: &Backend, output: OutputManager) -> CliResult<()> {
    #[cfg(feature = "interactive")]
    {
        interactive::run(backend, Rc::new(output))
    }

    #[cfg(not(feature = "interactive"))]
    {
        let _ = (backend, output);
        Err(CliError::FeatureNotAvailable {
            feature: "interactive",
        })
    }
}

fn report(output: &OutputManager, err: &CliError) -> CliResult<()> {
    debug!(error = %err, "Dashboard action failed");
    output.error(&err.to_string())?;
    for suggestion in err.suggestions() {
        output.info(&suggestion)?;
    }
    Ok(())
}

#[cfg(feature = "interactive")]
mod interactive {
    use std::io::IsTerminal as _;
    use std::path::PathBuf;
    use std::rc::Rc;

    use dialoguer::{Confirm, FuzzySelect, Input, Select, theme::ColorfulTheme};
    use driveflow_core::{
        application::{CustomerPresenter, ImageStore, VehiclePresenter},
        domain::{Customer, CustomerForm, StatusFilter, Vehicle, VehicleForm},
    };
    use tracing::info;

    use super::{Module, SessionView, attach_customers, attach_vehicles, report};
    use crate::{
        commands::{Backend, vehicles},
        error::{CliError, CliResult},
        output::OutputManager,
    };

    fn prompt_failed(e: dialoguer::Error) -> CliError {
        CliError::IoError {
            message: "Prompt failed".into(),
            source: std::io::Error::other(e),
        }
    }

    fn pick(prompt: &str, items: &[String]) -> CliResult<usize> {
        Select::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()
            .map_err(prompt_failed)
    }

    fn pick_fuzzy(prompt: &str, items: &[String]) -> CliResult<Option<usize>> {
        if items.is_empty() {
            return Ok(None);
        }
        FuzzySelect::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .items(items)
            .interact_opt()
            .map_err(prompt_failed)
    }

    fn text(prompt: &str, initial: &str) -> CliResult<String> {
        Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .with_initial_text(initial)
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_failed)
    }

    fn optional(prompt: &str, initial: Option<&str>) -> CliResult<Option<String>> {
        let value = text(prompt, initial.unwrap_or(""))?;
        Ok((!value.trim().is_empty()).then_some(value))
    }

    fn confirm(prompt: &str) -> CliResult<bool> {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(prompt_failed)
    }

    pub(super) fn run(backend: &Backend, output: Rc<OutputManager>) -> CliResult<()> {
        if !std::io::stdin().is_terminal() {
            return Err(CliError::InvalidInput {
                message: "the dashboard needs an interactive terminal".into(),
                source: None,
            });
        }

        let customers = Rc::new(backend.customer_presenter());
        let vehicles = Rc::new(backend.vehicle_presenter());

        let mut entries: Vec<String> = Module::ALL
            .iter()
            .map(|m| {
                if m.is_implemented() {
                    m.title().to_string()
                } else {
                    format!("{} (coming soon)", m.title())
                }
            })
            .collect();
        entries.push("Quit".into());

        loop {
            output.header("DriveFlow")?;
            let choice = pick("Module", &entries)?;
            let Some(module) = Module::ALL.get(choice).copied() else {
                return Ok(());
            };

            let outcome = match module {
                Module::Customers => customer_session(&customers, &output),
                Module::Vehicles => vehicle_session(&vehicles, backend, &output),
                other => output
                    .warning(&format!("{other}: not implemented yet"))
                    .map_err(CliError::from),
            };
            if let Err(e) = outcome {
                report(&output, &e)?;
            }
        }
    }

    // ── customers ─────────────────────────────────────────────────────────

    const CUSTOMER_ACTIONS: [&str; 6] = [
        "Search",
        "Show all",
        "Add customer",
        "Edit customer",
        "Delete customer",
        "Back",
    ];

    fn customer_session(
        presenter: &Rc<CustomerPresenter>,
        output: &Rc<OutputManager>,
    ) -> CliResult<()> {
        let view = SessionView::new(Module::Customers, Rc::clone(output));
        attach_customers(presenter, &view);
        info!(module = %view.module(), "Session opened");
        presenter.load();

        let actions: Vec<String> = CUSTOMER_ACTIONS.iter().map(|a| a.to_string()).collect();
        loop {
            let result = match pick("Customers", &actions)? {
                0 => {
                    let term = text("Search", &presenter.filter_term())?;
                    presenter.search(&term);
                    Ok(())
                }
                1 => {
                    presenter.load();
                    Ok(())
                }
                2 => {
                    presenter.select(None);
                    save_customer(presenter, output, None)
                }
                3 => match choose_customer(presenter, "Edit")? {
                    Some(customer) => {
                        presenter.select(Some(customer.clone()));
                        save_customer(presenter, output, Some(&customer))
                    }
                    None => Ok(()),
                },
                4 => match choose_customer(presenter, "Delete")? {
                    Some(customer) => {
                        presenter.select(Some(customer.clone()));
                        if confirm(&format!("Delete {}?", customer.full_name()))? {
                            if presenter.delete(customer.id()) {
                                output.success("Customer deleted.").map_err(CliError::from)
                            } else {
                                Err(CliError::NotDeleted { entity: "customer" })
                            }
                        } else {
                            Ok(())
                        }
                    }
                    None => Ok(()),
                },
                _ => break,
            };
            if let Err(e) = result {
                report(output, &e)?;
            }
        }

        info!(module = %view.module(), redraws = view.redraws(), "Session closed");
        Ok(())
    }

    fn choose_customer(presenter: &CustomerPresenter, verb: &str) -> CliResult<Option<Customer>> {
        let customers = presenter.customers();
        let labels: Vec<String> = customers
            .iter()
            .map(|c| format!("{} ({})", c.full_name(), c.national_id()))
            .collect();
        Ok(pick_fuzzy(&format!("{verb} which customer?"), &labels)?
            .and_then(|i| customers.get(i).cloned()))
    }

    fn save_customer(
        presenter: &CustomerPresenter,
        output: &OutputManager,
        current: Option<&Customer>,
    ) -> CliResult<()> {
        let form = CustomerForm {
            first_name: text("First name", current.map_or("", Customer::first_name))?,
            last_name: text("Last name", current.map_or("", Customer::last_name))?,
            national_id: text("National ID", current.map_or("", Customer::national_id))?,
            license: text("License", current.map_or("", Customer::license))?,
            phone: optional("Phone", current.and_then(Customer::phone))?,
            email: optional("Email", current.and_then(Customer::email))?,
            address: optional("Address", current.and_then(Customer::address))?,
            district: optional("District", current.and_then(Customer::district))?,
        };
        let message = presenter.save(current.and_then(Customer::id), form)?;
        output.success(message)?;
        Ok(())
    }

    // ── vehicles ──────────────────────────────────────────────────────────

    const VEHICLE_ACTIONS: [&str; 7] = [
        "Search / filter",
        "Show all",
        "Add vehicle",
        "Edit vehicle",
        "Delete vehicle",
        "Thumbnail",
        "Back",
    ];

    fn vehicle_session(
        presenter: &Rc<VehiclePresenter>,
        backend: &Backend,
        output: &Rc<OutputManager>,
    ) -> CliResult<()> {
        let view = SessionView::new(Module::Vehicles, Rc::clone(output));
        attach_vehicles(presenter, &view);
        info!(module = %view.module(), "Session opened");
        presenter.load();

        let actions: Vec<String> = VEHICLE_ACTIONS.iter().map(|a| a.to_string()).collect();
        loop {
            let result = match pick("Vehicles", &actions)? {
                0 => {
                    let term = text("Brand, model or plate", &presenter.filter_term())?;
                    let mut statuses = vec![StatusFilter::ALL.to_string()];
                    statuses.extend(presenter.statuses().into_iter().map(|s| s.name));
                    let status = &statuses[pick("Status", &statuses)?];
                    presenter.search_and_filter(&term, status);
                    Ok(())
                }
                1 => {
                    presenter.load();
                    Ok(())
                }
                2 => {
                    presenter.select(None);
                    save_vehicle(presenter, backend, output, None)
                }
                3 => match choose_vehicle(presenter, "Edit")? {
                    Some(vehicle) => {
                        presenter.select(Some(vehicle.clone()));
                        save_vehicle(presenter, backend, output, Some(&vehicle))
                    }
                    None => Ok(()),
                },
                4 => match choose_vehicle(presenter, "Delete")? {
                    Some(vehicle) => {
                        presenter.select(Some(vehicle.clone()));
                        if confirm(&format!("Delete {}?", vehicle.label()))? {
                            if presenter.delete(vehicle.id()) {
                                output.success("Vehicle deleted.").map_err(CliError::from)
                            } else {
                                Err(CliError::NotDeleted { entity: "vehicle" })
                            }
                        } else {
                            Ok(())
                        }
                    }
                    None => Ok(()),
                },
                5 => match choose_vehicle(presenter, "Preview")? {
                    Some(vehicle) => preview(backend, output, &vehicle),
                    None => Ok(()),
                },
                _ => break,
            };
            if let Err(e) = result {
                report(output, &e)?;
            }
        }

        info!(module = %view.module(), redraws = view.redraws(), "Session closed");
        Ok(())
    }

    fn choose_vehicle(presenter: &VehiclePresenter, verb: &str) -> CliResult<Option<Vehicle>> {
        let vehicles = presenter.vehicles();
        let labels: Vec<String> = vehicles.iter().map(Vehicle::label).collect();
        Ok(pick_fuzzy(&format!("{verb} which vehicle?"), &labels)?
            .and_then(|i| vehicles.get(i).cloned()))
    }

    fn preview(backend: &Backend, output: &OutputManager, vehicle: &Vehicle) -> CliResult<()> {
        match vehicle
            .image()
            .and_then(|name| backend.images.load_thumbnail(name, backend.thumbnail_bounds))
        {
            Some(thumb) => output.info(&format!(
                "{}: {}x{} thumbnail",
                vehicle.label(),
                thumb.width,
                thumb.height
            ))?,
            None => output.info("No picture")?,
        }
        Ok(())
    }

    fn save_vehicle(
        presenter: &VehiclePresenter,
        backend: &Backend,
        output: &OutputManager,
        current: Option<&Vehicle>,
    ) -> CliResult<()> {
        let types: Vec<String> = presenter.types().into_iter().map(|t| t.name).collect();
        let statuses: Vec<String> = presenter.statuses().into_iter().map(|s| s.name).collect();
        if types.is_empty() || statuses.is_empty() {
            return Err(CliError::LoadFailed {
                what: "vehicle types and statuses",
            });
        }

        let year = current.map(|v| v.year().to_string()).unwrap_or_default();
        let price = current.map(|v| v.price_per_day().to_string()).unwrap_or_default();
        let odometer = current.and_then(Vehicle::odometer).map(|km| km.to_string());

        let brand = text("Brand", current.map_or("", Vehicle::brand))?;
        let model = text("Model", current.map_or("", Vehicle::model))?;
        let year = text("Year", &year)?;
        let plate = text("Plate", current.map_or("", Vehicle::plate))?;
        let type_name = types[pick("Type", &types)?].clone();
        let status_name = statuses[pick("Status", &statuses)?].clone();
        let price_per_day = text("Price per day", &price)?;
        let odometer = optional("Odometer (km)", odometer.as_deref())?;

        let picture = optional("Picture file (blank keeps the current one)", None)?
            .map(|path| PathBuf::from(path.trim()));
        let image = match picture {
            Some(_) => None,
            None => current.and_then(Vehicle::image).map(str::to_string),
        };

        let form = VehicleForm {
            brand,
            model,
            year,
            plate,
            type_name,
            status_name,
            price_per_day,
            odometer,
            image,
        };
        let message = vehicles::save_with_picture(
            presenter,
            &backend.images,
            current.and_then(Vehicle::id),
            form,
            picture.as_deref(),
        )?;
        output.success(message)?;
        Ok(())
    }
}
