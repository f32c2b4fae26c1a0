//! Domain value objects: record identifiers, status filters, and the text
//! normalization rules shared by every entity.
//!
//! These are pure value types with no identity of their own.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── EntityId ─────────────────────────────────────────────────────────────────

/// Identifier assigned by the record store when a record is first persisted.
///
/// An entity that has not been stored yet carries `None` in its `id` field;
/// once assigned, the id never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(i64);

impl EntityId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for EntityId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

// ── StatusFilter ─────────────────────────────────────────────────────────────

/// Status restriction applied to vehicle searches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// No restriction.
    #[default]
    All,
    /// Only vehicles whose status has exactly this name.
    Named(String),
}

impl StatusFilter {
    /// Keyword accepted for the unrestricted filter.
    pub const ALL: &'static str = "all";

    /// Build a filter from free text. `"all"` (any case, or blank) means no
    /// restriction; anything else is taken as a status name.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case(Self::ALL) {
            Self::All
        } else {
            Self::Named(raw.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(Self::ALL),
            Self::Named(name) => f.write_str(name),
        }
    }
}

// ── Text normalization ───────────────────────────────────────────────────────

/// Title-case a string: the first letter of every alphabetic run is upper
/// case and the rest lower case. `"mc donald-o'neil"` → `"Mc Donald-O'Neil"`.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut previous_is_letter = false;
    for ch in input.chars() {
        if ch.is_alphabetic() {
            if previous_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(ch);
            previous_is_letter = false;
        }
    }
    out
}

/// Trim an optional value; a blank value becomes `None`.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// `true` if the value is absent or only whitespace.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_matches_word_boundaries() {
        assert_eq!(title_case("juan"), "Juan");
        assert_eq!(title_case("PEREZ"), "Perez");
        assert_eq!(title_case("maria jose"), "Maria Jose");
        assert_eq!(title_case("o'neil"), "O'Neil");
        assert_eq!(title_case("san juan de lurigancho"), "San Juan De Lurigancho");
        assert_eq!(title_case("ángel"), "Ángel");
    }

    #[test]
    fn non_blank_drops_whitespace_only_values() {
        assert_eq!(non_blank(Some("  ")), None);
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some(" 999 ")), Some("999".to_string()));
    }

    #[test]
    fn status_filter_parses_all_keyword() {
        assert_eq!(StatusFilter::parse("ALL"), StatusFilter::All);
        assert_eq!(StatusFilter::parse(""), StatusFilter::All);
        assert_eq!(
            StatusFilter::parse(" Disponible "),
            StatusFilter::Named("Disponible".into())
        );
    }

    #[test]
    fn entity_id_parses_with_whitespace() {
        assert_eq!(" 42 ".parse::<EntityId>().unwrap(), EntityId::new(42));
        assert!("x".parse::<EntityId>().is_err());
    }
}
