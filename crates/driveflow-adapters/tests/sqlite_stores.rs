//! Record stores against an in-memory SQLite database.

use driveflow_adapters::{Database, SqliteStores};
use driveflow_core::prelude::*;

fn stores() -> (Database, SqliteStores) {
    let db = Database::in_memory().expect("in-memory database");
    let stores = SqliteStores::new(&db);
    (db, stores)
}

fn catalog(stores: &SqliteStores) -> ReferenceCatalog {
    ReferenceCatalog::new(
        stores.types.get_all().unwrap(),
        stores.statuses.get_all().unwrap(),
    )
}

fn customer(first: &str, last: &str, national_id: &str) -> Customer {
    Customer::new(CustomerDraft {
        first_name: first.into(),
        last_name: last.into(),
        national_id: national_id.into(),
        license: "L-01".into(),
        email: Some("client@driveflow.pe".into()),
        district: Some("san isidro".into()),
        ..Default::default()
    })
    .unwrap()
}

fn vehicle(catalog: &ReferenceCatalog, brand: &str, plate: &str, status: &str) -> Vehicle {
    Vehicle::new(VehicleDraft {
        id: None,
        brand: brand.into(),
        model: "Corolla".into(),
        year: 2021,
        plate: plate.into(),
        vehicle_type: catalog.type_named("Sedan").cloned().unwrap(),
        status: catalog.status_named(status).cloned().unwrap(),
        price_per_day: 120.5,
        odometer: Some(30_000),
        image: Some("vehicle_1_abcd1234.png".into()),
    })
    .unwrap()
}

#[test]
fn reference_data_is_seeded_and_sorted() {
    let (_db, stores) = stores();

    let types: Vec<String> = stores.types.get_all().unwrap().into_iter().map(|t| t.name).collect();
    assert_eq!(types, ["Pickup", "SUV", "Sedan", "Van"]);

    let statuses = stores.statuses.get_all().unwrap();
    assert_eq!(statuses.len(), 3);
    assert!(statuses.iter().any(|s| s.name == "Mantenimiento"));
}

#[test]
fn customer_round_trip() {
    let (_db, stores) = stores();
    assert!(stores.customers.save(&customer(" juan ", "perez", "12345678")).unwrap());

    let stored = stores
        .customers
        .get_by_national_id("12345678")
        .unwrap()
        .expect("saved customer");
    assert_eq!(stored.first_name(), "Juan");
    assert_eq!(stored.district(), Some("San Isidro"));
    assert_eq!(stores.customers.get_by_id(stored.id().unwrap()).unwrap(), Some(stored.clone()));

    // Update in place
    let renamed = Customer::new(CustomerDraft {
        id: stored.id(),
        first_name: "Juan Carlos".into(),
        last_name: stored.last_name().into(),
        national_id: stored.national_id().into(),
        license: stored.license().into(),
        ..Default::default()
    })
    .unwrap();
    assert!(stores.customers.save(&renamed).unwrap());

    let all = stores.customers.get_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].first_name(), "Juan Carlos");
    assert_eq!(all[0].email(), None);
}

#[test]
fn duplicate_national_id_is_a_store_error() {
    let (_db, stores) = stores();
    stores.customers.save(&customer("Ana", "Lopez", "11111111")).unwrap();
    assert!(stores.customers.save(&customer("Eva", "Ruiz", "11111111")).is_err());
}

#[test]
fn customer_search_semantics() {
    let (_db, stores) = stores();
    stores.customers.save(&customer("Ana", "Lopez", "11111111")).unwrap();
    stores.customers.save(&customer("Luis", "Diaz", "22222222")).unwrap();

    assert_eq!(stores.customers.search("ANA").unwrap().len(), 1);
    assert_eq!(stores.customers.search("2222").unwrap().len(), 1);
    assert_eq!(stores.customers.search("isidro").unwrap().len(), 2);
    assert_eq!(stores.customers.search("").unwrap().len(), 2);
    // Wildcards in the term are literal
    assert!(stores.customers.search("%").unwrap().is_empty());

    // Case folding covers accented letters, not only ASCII
    stores.customers.save(&customer("ñahui", "órtiz", "33333333")).unwrap();
    for term in ["ñahui", "ÑAHUI", "Ñahui", "órtiz", "ÓRT"] {
        let found = stores.customers.search(term).unwrap();
        assert_eq!(found.len(), 1, "{term}");
        assert_eq!(found[0].full_name(), "Ñahui Órtiz");
    }

    let ordered: Vec<_> = stores
        .customers
        .get_all()
        .unwrap()
        .iter()
        .map(|c| c.last_name().to_string())
        .collect();
    assert_eq!(ordered, ["Diaz", "Lopez", "Órtiz"]);
}

#[test]
fn deleting_missing_id_reports_false() {
    let (_db, stores) = stores();
    assert!(!stores.customers.delete(EntityId::new(99)).unwrap());
    assert!(!stores.vehicles.delete(EntityId::new(99)).unwrap());
}

#[test]
fn vehicle_round_trip_resolves_references() {
    let (_db, stores) = stores();
    let catalog = catalog(&stores);
    assert!(stores.vehicles.save(&vehicle(&catalog, "toyota", "abc-123", "Disponible")).unwrap());

    let all = stores.vehicles.get_all(&catalog).unwrap();
    assert_eq!(all.len(), 1);
    let stored = &all[0];
    assert_eq!(stored.brand(), "Toyota");
    assert_eq!(stored.plate(), "ABC-123");
    assert_eq!(stored.vehicle_type().name, "Sedan");
    assert_eq!(stored.vehicle_type().base_deposit, 300.0);
    assert_eq!(stored.status().name, "Disponible");
    assert_eq!(stored.odometer(), Some(30_000));
    assert_eq!(stored.image(), Some("vehicle_1_abcd1234.png"));

    let by_id = stores.vehicles.get_by_id(stored.id().unwrap(), &catalog).unwrap();
    assert_eq!(by_id.as_ref(), Some(stored));
}

#[test]
fn unknown_reference_ids_load_as_placeholders() {
    let (_db, stores) = stores();
    let catalog = catalog(&stores);
    stores.vehicles.save(&vehicle(&catalog, "Kia", "KIA-001", "Alquilado")).unwrap();

    let all = stores.vehicles.get_all(&ReferenceCatalog::default()).unwrap();
    assert_eq!(all[0].vehicle_type().name, "Unknown type");
    assert_eq!(all[0].vehicle_type().base_deposit, 0.0);
    assert_eq!(all[0].status().name, "Unknown status");
}

#[test]
fn search_and_filter_combines_term_and_status() {
    let (_db, stores) = stores();
    let catalog = catalog(&stores);
    for (brand, plate, status) in [
        ("Toyota", "TOY-001", "Disponible"),
        ("Toyota", "TOY-002", "Alquilado"),
        ("Kia", "KIA-001", "Disponible"),
        ("Hyundai", "XTOYOTA", "Disponible"),
        ("Škoda", "SKO-001", "Disponible"),
    ] {
        stores.vehicles.save(&vehicle(&catalog, brand, plate, status)).unwrap();
    }
    let available = catalog.status_named("Disponible").unwrap().id;

    let found = stores
        .vehicles
        .search_and_filter("toyota", Some(available), &catalog)
        .unwrap();
    let plates: Vec<_> = found.iter().map(|v| v.plate().to_string()).collect();
    assert_eq!(plates, ["XTOYOTA", "TOY-001"]);
    assert!(found.iter().all(|v| v.status().name == "Disponible"));

    for term in ["škoda", "ŠKODA"] {
        let found = stores
            .vehicles
            .search_and_filter(term, Some(available), &catalog)
            .unwrap();
        assert_eq!(found.len(), 1, "{term}");
        assert_eq!(found[0].plate(), "SKO-001");
    }

    assert_eq!(stores.vehicles.search_and_filter("", None, &catalog).unwrap().len(), 5);
    assert_eq!(
        stores.vehicles.search_and_filter("  ", Some(available), &catalog).unwrap().len(),
        4
    );
}

#[test]
fn invalid_rows_are_skipped() {
    let (db, stores) = stores();
    let catalog = catalog(&stores);
    stores.vehicles.save(&vehicle(&catalog, "Kia", "KIA-001", "Disponible")).unwrap();
    db.block_on(
        sqlx::query(
            "INSERT INTO vehicles (brand, model, year, plate, type_id, status_id, price_per_day) \
             VALUES ('Ford', 'T', 1899, 'OLD-001', 1, 1, 10.0)",
        )
        .execute(db.pool()),
    )
    .unwrap();

    let all = stores.vehicles.get_all(&catalog).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].plate(), "KIA-001");
}

#[test]
fn closed_database_reports_errors() {
    let (db, stores) = stores();
    db.close();
    assert!(stores.customers.get_all().is_err());
}
