//! Core types for the equipment catalog.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────
// Catalog Id
// ─────────────────────────────────────────────────────────────────

/// Identifier of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogId(pub u32);

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CatalogId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(CatalogId)
            .map_err(|_| format!("'{}' is not a catalog id", s))
    }
}

// ─────────────────────────────────────────────────────────────────
// Catalog Entry
// ─────────────────────────────────────────────────────────────────

/// One assignable equipment item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: CatalogId,

    /// Inventory code printed on the device (e.g. "712J1").
    pub code: String,

    /// Brand or model name shown to users.
    pub name: String,
}

impl CatalogEntry {
    #[cfg(test)]
    pub fn new(id: u32, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: CatalogId(id),
            code: code.into(),
            name: name.into(),
        }
    }

    /// Display label cached on assignments: `"{code} - {name}"`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.code, self.name)
    }
}

// ─────────────────────────────────────────────────────────────────
// Lookup capability
// ─────────────────────────────────────────────────────────────────

/// Read-only lookup over equipment reference data.
///
/// Forms receive this as an injected dependency so the bundled table can be
/// swapped for another source without touching form logic.
pub trait EquipmentCatalog: fmt::Debug {
    /// All entries, in display order.
    fn entries(&self) -> &[CatalogEntry];

    /// Find an entry by identifier.
    fn lookup(&self, id: CatalogId) -> Option<&CatalogEntry> {
        self.entries().iter().find(|entry| entry.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_label() {
        let entry = CatalogEntry::new(2, "712J1", "HP");
        assert_eq!(entry.label(), "712J1 - HP");
    }

    #[test]
    fn test_catalog_id_from_str() {
        assert_eq!("3".parse::<CatalogId>().unwrap(), CatalogId(3));
        assert_eq!(" 4 ".parse::<CatalogId>().unwrap(), CatalogId(4));
        assert!("abc".parse::<CatalogId>().is_err());
        assert!("-1".parse::<CatalogId>().is_err());
    }

    #[test]
    fn test_serde_transparent_id() {
        let json = serde_json::to_string(&CatalogId(7)).unwrap();
        assert_eq!(json, "7");
    }
}
