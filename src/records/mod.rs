//! Record types managed by the CRUD slices.
//!
//! Each slice pairs a stored [`Record`] with the [`Draft`] its edit form works
//! on. Drafts are plain values: every edit consumes the current draft and
//! returns the next one, so a form can discard or validate a revision without
//! touching the stored record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub mod equipo;
pub mod persona;

pub use equipo::{Equipo, EquipoDraft};
pub use persona::{AssignmentId, Persona, PersonaDraft};

// ─────────────────────────────────────────────────────────────────
// Slice
// ─────────────────────────────────────────────────────────────────

/// The two independent management slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slice {
    Personas,
    Equipos,
}

impl Slice {
    pub fn slug(&self) -> &'static str {
        match self {
            Slice::Personas => "personas",
            Slice::Equipos => "equipos",
        }
    }

    pub fn all() -> &'static [Slice] {
        &[Slice::Personas, Slice::Equipos]
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for Slice {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "personas" | "persona" | "people" => Ok(Slice::Personas),
            "equipos" | "equipo" | "equipment" => Ok(Slice::Equipos),
            _ => Err(format!(
                "Unknown slice '{}'. Valid: {}",
                s,
                Slice::all()
                    .iter()
                    .map(Slice::slug)
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Record Id
// ─────────────────────────────────────────────────────────────────

/// Opaque record identifier, unique within a store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Fresh time-ordered identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─────────────────────────────────────────────────────────────────
// Record / Draft traits
// ─────────────────────────────────────────────────────────────────

/// Working copy edited by a form.
pub trait Draft: Clone + Default + fmt::Debug {
    /// Editable scalar fields.
    type Field: Copy + Eq + fmt::Debug + fmt::Display + FromStr<Err = String> + 'static;

    /// Read-only dependencies the form needs while editing this draft.
    type Context: Clone + fmt::Debug;

    /// Noun used in form titles ("Persona", "Equipo").
    const NOUN: &'static str;

    /// Scalar fields in form order.
    fn fields() -> &'static [Self::Field];

    /// Current value of a field as the form displays it.
    fn field_value(&self, field: Self::Field) -> String;

    /// Next revision with one field changed.
    fn with_field(self, field: Self::Field, value: &str) -> Result<Self>;

    /// Submission gate. Returns the payload the form emits.
    fn finalize(self) -> Result<Self>;

    /// Length of the repeatable sub-list, for drafts that have one.
    fn sublist_len(&self) -> Option<usize> {
        None
    }
}

/// A stored record of one slice.
pub trait Record: Clone + fmt::Debug + Serialize {
    type Draft: Draft;

    const SLICE: Slice;

    fn id(&self) -> &RecordId;

    /// Working copy initialized from this record.
    fn to_draft(&self) -> Self::Draft;

    /// Record built from a finalized payload.
    fn from_draft(id: RecordId, draft: Self::Draft) -> Self;
}

// ─────────────────────────────────────────────────────────────────
// Field input helpers
// ─────────────────────────────────────────────────────────────────

/// Accept an empty string or ASCII digits only.
pub(crate) fn numeric_input(field: impl fmt::Display, value: &str) -> Result<String> {
    let value = value.trim();
    if value.chars().all(|c| c.is_ascii_digit()) {
        Ok(value.to_string())
    } else {
        Err(Error::invalid_field(field, value, "only digits are allowed"))
    }
}

/// Parse an optional selection; the empty string clears it.
pub(crate) fn optional_input<T>(field: impl fmt::Display, value: &str) -> Result<Option<T>>
where
    T: FromStr<Err = String>,
{
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<T>()
        .map(Some)
        .map_err(|reason| Error::invalid_field(field, value, reason))
}
