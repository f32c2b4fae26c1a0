//! `driveflow vehicles` — vehicle management and pictures.

use std::path::Path;

use driveflow_core::{
    application::{ApplicationError, ImageStore, VehiclePresenter},
    domain::{DomainValidator, EntityId, StatusFilter, Vehicle, VehicleForm},
};
use tracing::{info, instrument, warn};

use super::{Backend, cell, confirm, money};
use crate::{
    cli::{ListFormat, VehicleCommands, VehicleSaveArgs},
    error::{CliError, CliResult, IntoCli},
    output::{Listing, OutputManager},
};

const HEADERS: &[&str] = &[
    "ID", "BRAND", "MODEL", "YEAR", "PLATE", "TYPE", "STATUS", "PRICE/DAY", "ODOMETER",
];

/// Dispatch to the correct vehicles subcommand.
#[instrument(skip_all)]
pub fn execute(cmd: VehicleCommands, backend: &Backend, output: &OutputManager) -> CliResult<()> {
    let presenter = backend.vehicle_presenter();
    load(&presenter)?;

    match cmd {
        VehicleCommands::List(args) => {
            let requested = StatusFilter::parse(&args.status);
            let filtered = !args.search.trim().is_empty() || !requested.is_all();
            if filtered && !presenter.search_and_filter(&args.search, &args.status) {
                return Err(CliError::LoadFailed { what: "vehicles" });
            }
            if !requested.is_all() && presenter.filter_status().is_all() {
                output.warning(&format!("Unknown status '{requested}', showing every status"))?;
            }
            render(output, args.format.format, &presenter.vehicles())?;
        }

        VehicleCommands::Show { id } => {
            let vehicle = find(&presenter, id)?;
            show(output, &vehicle)?;
        }

        VehicleCommands::Save(args) => save(&presenter, backend, output, &args)?,

        VehicleCommands::Delete(args) => {
            let vehicle = find(&presenter, args.id)?;
            if !confirm(&format!("Delete {}?", vehicle.label()), args.yes)? {
                return Err(CliError::Cancelled);
            }
            if !presenter.delete(vehicle.id()) {
                return Err(CliError::NotDeleted { entity: "vehicle" });
            }
            output.success(&format!("Vehicle {} deleted.", vehicle.label()))?;
        }

        VehicleCommands::Thumbnail { id, size } => {
            let vehicle = find(&presenter, id)?;
            let Some(image) = vehicle.image() else {
                output.info(&format!("{} has no picture.", vehicle.label()))?;
                return Ok(());
            };
            let bounds = size.map_or(backend.thumbnail_bounds, |s| (s, s));
            match backend.images.load_thumbnail(image, bounds) {
                Some(thumb) => output.data(&format!(
                    "{image}: {}x{} thumbnail ({} bytes RGBA)",
                    thumb.width,
                    thumb.height,
                    thumb.rgba.len()
                ))?,
                None => output.warning(&format!(
                    "Picture '{image}' is missing or unreadable in {}",
                    backend.images.dir().display()
                ))?,
            }
        }
    }

    Ok(())
}

/// Updating without `--image` keeps the current picture.
fn save(
    presenter: &VehiclePresenter,
    backend: &Backend,
    output: &OutputManager,
    args: &VehicleSaveArgs,
) -> CliResult<()> {
    let id = args.id.map(EntityId::new);
    let existing = match args.id {
        Some(raw) => Some(find(presenter, raw)?),
        None => None,
    };
    let kept = match args.image {
        Some(_) => None,
        None => existing.and_then(|v| v.image().map(str::to_string)),
    };

    let message = save_with_picture(
        presenter,
        &backend.images,
        id,
        args.to_form(kept),
        args.image.as_deref(),
    )?;
    output.success(message)?;
    Ok(())
}

/// Save `form`, importing `picture` first so the form carries its stored
/// name.
///
/// The form is checked before anything is copied, and a copy made for a save
/// that still fails (unknown type, duplicate plate) is removed again.
pub(crate) fn save_with_picture(
    presenter: &VehiclePresenter,
    images: &dyn ImageStore,
    id: Option<EntityId>,
    mut form: VehicleForm,
    picture: Option<&Path>,
) -> CliResult<&'static str> {
    let Some(path) = picture else {
        return Ok(presenter.save(id, &form)?);
    };

    DomainValidator::validate_vehicle(&form).map_err(ApplicationError::Validation)?;
    let name = images
        .import_and_copy(path)
        .with_cli_context(|| format!("importing {}", path.display()))?
        .ok_or_else(|| CliError::NotAnImage {
            path: path.to_path_buf(),
        })?;
    info!(name = %name, "Picture imported");

    form.image = Some(name.clone());
    presenter.save(id, &form).map_err(|e| {
        if let Err(cleanup) = images.discard(&name) {
            warn!(name = %name, error = %cleanup, "Could not remove unused picture");
        }
        CliError::from(e)
    })
}

fn load(presenter: &VehiclePresenter) -> CliResult<()> {
    if presenter.load() {
        Ok(())
    } else {
        Err(CliError::LoadFailed { what: "vehicles" })
    }
}

fn find(presenter: &VehiclePresenter, id: i64) -> CliResult<Vehicle> {
    presenter
        .vehicles()
        .into_iter()
        .find(|v| v.id() == Some(EntityId::new(id)))
        .ok_or(CliError::RecordNotFound {
            entity: "vehicle",
            id,
        })
}

pub(crate) fn listing(vehicles: &[Vehicle]) -> Listing<'_, Vehicle> {
    Listing {
        title: "Vehicles",
        headers: HEADERS,
        rows: vehicles
            .iter()
            .map(|v| {
                vec![
                    v.id().map(|id| id.to_string()).unwrap_or_default(),
                    v.brand().to_string(),
                    v.model().to_string(),
                    v.year().to_string(),
                    v.plate().to_string(),
                    v.vehicle_type().name.clone(),
                    v.status().name.clone(),
                    money(v.price_per_day()),
                    v.odometer().map(|km| km.to_string()).unwrap_or_else(|| "-".into()),
                ]
            })
            .collect(),
        labels: vehicles.iter().map(Vehicle::label).collect(),
        records: vehicles,
    }
}

pub(crate) fn render(
    output: &OutputManager,
    format: ListFormat,
    vehicles: &[Vehicle],
) -> CliResult<()> {
    output.listing(format, &listing(vehicles))?;
    Ok(())
}

fn show(output: &OutputManager, v: &Vehicle) -> CliResult<()> {
    output.header(&v.label())?;
    let year = v.year().to_string();
    let price = money(v.price_per_day());
    let deposit = money(v.vehicle_type().base_deposit);
    let odometer = v.odometer().map(|km| format!("{km} km"));
    for (label, value) in [
        ("Year", Some(year.as_str())),
        ("Type", Some(v.vehicle_type().name.as_str())),
        ("Deposit", Some(deposit.as_str())),
        ("Status", Some(v.status().name.as_str())),
        ("Price/day", Some(price.as_str())),
        ("Odometer", odometer.as_deref()),
        ("Picture", v.image()),
    ] {
        output.data(&format!("  {label:<10} {}", cell(value)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use driveflow_adapters::{InMemoryReferenceStore, InMemoryVehicleStore, LocalImageStore};
    use driveflow_core::domain::{VehicleDraft, VehicleStatus, VehicleType};
    use image::{ImageFormat, RgbaImage};
    use tempfile::TempDir;

    fn loaded_presenter() -> VehiclePresenter {
        let reference = InMemoryReferenceStore::seeded();
        let presenter = VehiclePresenter::new(
            Box::new(InMemoryVehicleStore::new()),
            Box::new(reference.clone()),
            Box::new(reference),
        );
        assert!(presenter.load());
        presenter
    }

    fn form() -> VehicleForm {
        VehicleForm {
            brand: "toyota".into(),
            model: "Hilux".into(),
            year: "2021".into(),
            plate: "PIC-001".into(),
            type_name: "Pickup".into(),
            status_name: "Disponible".into(),
            price_per_day: "80".into(),
            odometer: None,
            image: None,
        }
    }

    fn vehicle(id: i64, brand: &str, odometer: Option<i64>) -> Vehicle {
        Vehicle::new(VehicleDraft {
            id: Some(EntityId::new(id)),
            brand: brand.into(),
            model: "Corolla".into(),
            year: 2022,
            plate: format!("ABC-{id:03}"),
            vehicle_type: VehicleType {
                id: EntityId::new(1),
                name: "Sedan".into(),
                base_deposit: 300.0,
            },
            status: VehicleStatus {
                id: EntityId::new(1),
                name: "Disponible".into(),
            },
            price_per_day: 45.0,
            odometer,
            image: None,
        })
        .unwrap()
    }

    #[test]
    fn listing_rows_follow_headers() {
        let vehicles = vec![vehicle(1, "Toyota", Some(1200)), vehicle(2, "Kia", None)];
        let listing = listing(&vehicles);
        assert!(listing.rows.iter().all(|r| r.len() == HEADERS.len()));
        assert_eq!(listing.rows[0][5], "Sedan");
        assert_eq!(listing.rows[0][7], "45.00");
        assert_eq!(listing.rows[0][8], "1200");
        assert_eq!(listing.rows[1][8], "-");
        assert_eq!(listing.labels[1], "Kia Corolla (ABC-002)");
    }

    #[test]
    fn rejected_save_leaves_no_copied_picture() {
        let tmp = TempDir::new().unwrap();
        let images = LocalImageStore::new(tmp.path().join("images")).unwrap();
        let picture = tmp.path().join("car.png");
        RgbaImage::new(8, 8)
            .save_with_format(&picture, ImageFormat::Png)
            .unwrap();
        let presenter = loaded_presenter();

        // caught by the form check, before the copy
        let bad_year = VehicleForm {
            year: "1850".into(),
            ..form()
        };
        assert!(save_with_picture(&presenter, &images, None, bad_year, Some(&picture)).is_err());

        // caught by the presenter, after the copy
        let unknown_type = VehicleForm {
            type_name: "Boat".into(),
            ..form()
        };
        assert!(matches!(
            save_with_picture(&presenter, &images, None, unknown_type, Some(&picture)),
            Err(CliError::Core(_))
        ));
        assert_eq!(std::fs::read_dir(images.dir()).unwrap().count(), 0);
        assert!(presenter.vehicles().is_empty());

        save_with_picture(&presenter, &images, None, form(), Some(&picture)).unwrap();
        let stored = presenter.vehicles();
        assert_eq!(stored.len(), 1);
        let name = stored[0].image().unwrap();
        assert!(images.path_of(name).unwrap().is_file());
        assert_eq!(std::fs::read_dir(images.dir()).unwrap().count(), 1);
    }

    #[test]
    fn save_without_picture_keeps_form_image() {
        let tmp = TempDir::new().unwrap();
        let images = LocalImageStore::new(tmp.path()).unwrap();
        let presenter = loaded_presenter();
        let kept = VehicleForm {
            image: Some("vehicle_1_abcd1234.png".into()),
            ..form()
        };

        save_with_picture(&presenter, &images, None, kept, None).unwrap();
        assert_eq!(
            presenter.vehicles()[0].image(),
            Some("vehicle_1_abcd1234.png")
        );
    }
}
