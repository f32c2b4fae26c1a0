//! SQLite record stores backed by [`Database`](crate::database::Database).

mod customer;
mod reference;
mod vehicle;

pub use customer::SqliteCustomerStore;
pub use reference::{SqliteVehicleStatusStore, SqliteVehicleTypeStore};
pub use vehicle::SqliteVehicleStore;

/// Case-folded form stored in the `*_key` columns.
///
/// SQLite only folds ASCII, so folding happens here, on both the stored
/// value and the search term.
pub(crate) fn search_key(value: &str) -> String {
    value.to_lowercase()
}

/// `LIKE` pattern matching `term` anywhere, case-folded, with wildcards in
/// the term escaped by `\`.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in search_key(term).chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
