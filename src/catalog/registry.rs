//! Equipment catalog sources: the bundled table and TOML files.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::CatalogSettings;
use crate::error::{Error, Result};

use super::types::{CatalogEntry, EquipmentCatalog};

const BUNDLED_ORIGIN: &str = "bundled";
const BUNDLED_CATALOG: &str = include_str!("../../config/catalog.toml");

/// On-disk layout of a catalog file.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    entries: Vec<CatalogEntry>,
}

// ─────────────────────────────────────────────────────────────────
// Static Catalog
// ─────────────────────────────────────────────────────────────────

/// Catalog backed by a fixed, validated list of entries.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    /// Where the entries came from ("bundled" or a file path).
    origin: String,
    entries: Vec<CatalogEntry>,
}

impl StaticCatalog {
    /// Build a catalog from entries, enforcing unique ids and non-empty text.
    pub fn from_entries(origin: impl Into<String>, entries: Vec<CatalogEntry>) -> Result<Self> {
        let origin = origin.into();
        let mut seen = HashSet::new();

        for entry in &entries {
            if !seen.insert(entry.id) {
                return Err(Error::catalog_invalid(
                    &origin,
                    format!("duplicate id {}", entry.id),
                ));
            }
            if entry.code.trim().is_empty() {
                return Err(Error::catalog_invalid(
                    &origin,
                    format!("entry {} has an empty code", entry.id),
                ));
            }
            if entry.name.trim().is_empty() {
                return Err(Error::catalog_invalid(
                    &origin,
                    format!("entry {} has an empty name", entry.id),
                ));
            }
        }

        Ok(Self { origin, entries })
    }

    /// Parse catalog TOML.
    pub fn from_toml_str(origin: impl Into<String>, content: &str) -> Result<Self> {
        let origin = origin.into();
        let file: CatalogFile = toml::from_str(content).map_err(|e| Error::CatalogParse {
            origin: origin.clone(),
            message: e.to_string(),
        })?;
        Self::from_entries(origin, file.entries)
    }

    /// The catalog compiled into the binary.
    pub fn bundled() -> Result<Self> {
        Self::from_toml_str(BUNDLED_ORIGIN, BUNDLED_CATALOG)
    }

    /// Load a catalog file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::CatalogNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path).map_err(|e| Error::IoRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let catalog = Self::from_toml_str(path.display().to_string(), &content)?;
        debug!(path = %path.display(), entries = catalog.len(), "Catalog file parsed");
        Ok(catalog)
    }

    /// Where this catalog was loaded from.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EquipmentCatalog for StaticCatalog {
    fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}

/// Resolve the catalog named by the configuration, falling back to the bundled table.
pub fn load_catalog(settings: &CatalogSettings) -> Result<StaticCatalog> {
    let catalog = match settings.file.as_deref() {
        Some(file) => StaticCatalog::load(Path::new(file))?,
        None => StaticCatalog::bundled()?,
    };
    if catalog.is_empty() {
        warn!(origin = %catalog.origin(), "Equipment catalog is empty; personas cannot be saved");
    } else {
        info!(origin = %catalog.origin(), entries = catalog.len(), "Equipment catalog loaded");
    }
    Ok(catalog)
}
