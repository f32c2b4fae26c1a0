//! Integration tests for driveflow-core's public API.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Mutex;

use driveflow_core::prelude::*;

/// Minimal customer store keeping rows in insertion order.
#[derive(Default)]
struct VecStore {
    rows: Mutex<Vec<Customer>>,
}

impl CustomerStore for VecStore {
    fn get_all(&self) -> DriveflowResult<Vec<Customer>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    fn get_by_id(&self, id: EntityId) -> DriveflowResult<Option<Customer>> {
        Ok(self.rows.lock().unwrap().iter().find(|c| c.id() == Some(id)).cloned())
    }

    fn get_by_national_id(&self, national_id: &str) -> DriveflowResult<Option<Customer>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.national_id() == national_id)
            .cloned())
    }

    fn save(&self, customer: &Customer) -> DriveflowResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let id = EntityId::new(rows.len() as i64 + 1);
        rows.push(customer.clone().with_id(id));
        Ok(true)
    }

    fn delete(&self, id: EntityId) -> DriveflowResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|c| c.id() != Some(id));
        Ok(rows.len() != before)
    }

    fn search(&self, term: &str) -> DriveflowResult<Vec<Customer>> {
        let term = term.to_lowercase();
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.full_name().to_lowercase().contains(&term))
            .cloned()
            .collect())
    }
}

fn form(first: &str, national_id: &str) -> CustomerForm {
    CustomerForm {
        first_name: first.into(),
        last_name: "perez".into(),
        national_id: national_id.into(),
        license: "L1".into(),
        ..Default::default()
    }
}

#[test]
fn full_customer_workflow() {
    let presenter = CustomerPresenter::new(Box::new(VecStore::default()));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    presenter.subscribers().subscribe_fn(move || {
        log.borrow_mut().push("changed");
        Ok(())
    });

    presenter.save(None, form("juan", "12345678")).unwrap();
    presenter.save(None, form("maria", "87654321")).unwrap();
    assert_eq!(presenter.customers().len(), 2);

    assert!(presenter.search("MARIA"));
    let hits = presenter.customers();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].full_name(), "Maria Perez");

    presenter.select(hits.into_iter().next());
    assert!(presenter.delete(presenter.selected().and_then(|c| c.id())));
    assert!(presenter.selected().is_none());
    assert_eq!(presenter.customers().len(), 1);

    // two saves, one search, one select, one delete (reload)
    assert_eq!(seen.borrow().len(), 5);
}

#[test]
fn validation_errors_carry_suggestions() {
    let presenter = CustomerPresenter::new(Box::new(VecStore::default()));
    let err = presenter.save(None, form("juan", "1234")).unwrap_err();

    let root = DriveflowError::from(err);
    assert!(!root.to_string().is_empty());
    assert!(!root.suggestions().is_empty());
    assert_eq!(root.category(), driveflow_core::error::ErrorCategory::Validation);
}

#[test]
fn version_is_set() {
    assert!(!driveflow_core::VERSION.is_empty());
}
