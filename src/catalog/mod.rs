//! Equipment catalog: read-only reference data for persona equipment assignments.
//!
//! The catalog is injected into persona forms as a lookup capability. The
//! default table is bundled into the binary; a TOML file can replace it.

pub mod registry;
pub mod types;

pub use registry::{load_catalog, StaticCatalog};
pub use types::{CatalogEntry, CatalogId, EquipmentCatalog};
