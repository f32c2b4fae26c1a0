//! Presenters wired to real stores.

use std::cell::Cell;
use std::rc::Rc;

use driveflow_adapters::{
    Database, InMemoryCustomerStore, InMemoryReferenceStore, InMemoryVehicleStore, SqliteStores,
};
use driveflow_core::application::presenters::{CUSTOMER_SAVED, VEHICLE_SAVED};
use driveflow_core::prelude::*;

fn vehicle_presenter() -> VehiclePresenter {
    let reference = InMemoryReferenceStore::seeded();
    VehiclePresenter::new(
        Box::new(InMemoryVehicleStore::new()),
        Box::new(reference.clone()),
        Box::new(reference),
    )
}

fn vehicle_form(brand: &str, plate: &str, status: &str) -> VehicleForm {
    VehicleForm {
        brand: brand.into(),
        model: "Hilux".into(),
        year: "2023".into(),
        plate: plate.into(),
        type_name: "Pickup".into(),
        status_name: status.into(),
        price_per_day: "180".into(),
        odometer: Some("1200".into()),
        image: None,
    }
}

#[test]
fn saving_customer_through_sqlite_normalizes_names() {
    let db = Database::in_memory().unwrap();
    let stores = SqliteStores::new(&db);
    let presenter = CustomerPresenter::new(Box::new(stores.customers.clone()));

    let form = CustomerForm {
        first_name: " juan ".into(),
        last_name: "perez".into(),
        national_id: "12345678".into(),
        license: "L1".into(),
        ..Default::default()
    };
    assert_eq!(presenter.save(None, form), Ok(CUSTOMER_SAVED));

    let listed = presenter.customers();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].first_name(), "Juan");
    assert_eq!(listed[0].last_name(), "Perez");

    let stored = stores.customers.get_by_national_id("12345678").unwrap().unwrap();
    assert_eq!(stored.full_name(), "Juan Perez");
}

#[test]
fn duplicate_customer_save_fails_with_generic_error() {
    let presenter = CustomerPresenter::new(Box::new(InMemoryCustomerStore::new()));
    let form = CustomerForm {
        first_name: "Ana".into(),
        last_name: "Lopez".into(),
        national_id: "87654321".into(),
        license: "L2".into(),
        ..Default::default()
    };
    presenter.save(None, form.clone()).unwrap();

    let err = presenter.save(None, form).unwrap_err();
    assert!(matches!(err, ApplicationError::NotPersisted { .. }));
    assert_eq!(presenter.customers().len(), 1);
}

#[test]
fn vehicle_search_and_filter_end_to_end() {
    let presenter = vehicle_presenter();
    assert!(presenter.load());
    for (brand, plate, status) in [
        ("toyota", "T-1", "Disponible"),
        ("toyota", "T-2", "Alquilado"),
        ("nissan", "N-1", "Disponible"),
    ] {
        assert_eq!(presenter.save(None, &vehicle_form(brand, plate, status)), Ok(VEHICLE_SAVED));
    }
    assert_eq!(presenter.vehicles().len(), 3);

    assert!(presenter.search_and_filter("toyota", "Disponible"));
    let found = presenter.vehicles();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].plate(), "T-1");

    assert!(presenter.search_and_filter("toyota", "all"));
    assert_eq!(presenter.vehicles().len(), 2);
}

#[test]
fn closed_view_is_dropped_as_stale() {
    struct View {
        redraws: Cell<u32>,
    }

    let presenter = vehicle_presenter();
    let view = Rc::new(View {
        redraws: Cell::new(0),
    });
    let weak = Rc::downgrade(&view);
    presenter.subscribers().subscribe_fn(move || {
        let view = weak.upgrade().ok_or(SubscriberError::Stale)?;
        view.redraws.set(view.redraws.get() + 1);
        Ok(())
    });

    presenter.load();
    assert_eq!(view.redraws.get(), 1);

    drop(view);
    presenter.load();
    assert!(presenter.subscribers().is_empty());
}

#[test]
fn deleting_selected_vehicle_clears_selection() {
    let presenter = vehicle_presenter();
    presenter.load();
    presenter.save(None, &vehicle_form("kia", "K-1", "Mantenimiento")).unwrap();

    let kia = presenter.vehicles().pop().unwrap();
    presenter.select(Some(kia.clone()));
    assert!(presenter.delete(kia.id()));
    assert_eq!(presenter.selected(), None);
    assert!(presenter.vehicles().is_empty());
}
