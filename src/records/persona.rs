//! Persona records and their working copy.
//!
//! A persona carries identity fields plus an ordered list of equipment
//! assignments. The form edits [`PersonaDraft`], where each assignment has a
//! form-local id and an optional catalog reference; only assignments with a
//! reference survive submission.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogEntry, CatalogId, EquipmentCatalog};
use crate::error::{Error, Result};

use super::{numeric_input, optional_input, Draft, Record, RecordId, Slice};

// ─────────────────────────────────────────────────────────────────
// Document Type
// ─────────────────────────────────────────────────────────────────

/// Kind of identity document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentType {
    /// Cédula de ciudadanía (CC).
    CitizenId,
    /// Tarjeta de identidad (TI), issued to minors.
    MinorId,
    Passport,
    Other,
}

impl DocumentType {
    /// Short code shown in tables.
    pub fn code(&self) -> &'static str {
        match self {
            DocumentType::CitizenId => "CC",
            DocumentType::MinorId => "TI",
            DocumentType::Passport => "PA",
            DocumentType::Other => "OT",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DocumentType::CitizenId => "Citizen ID (CC)",
            DocumentType::MinorId => "Minor ID (TI)",
            DocumentType::Passport => "Passport",
            DocumentType::Other => "Other",
        }
    }

    pub fn all() -> &'static [DocumentType] {
        &[
            DocumentType::CitizenId,
            DocumentType::MinorId,
            DocumentType::Passport,
            DocumentType::Other,
        ]
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cc" | "citizen-id" | "citizen_id" => Ok(DocumentType::CitizenId),
            "ti" | "minor-id" | "minor_id" => Ok(DocumentType::MinorId),
            "pa" | "passport" | "pasaporte" => Ok(DocumentType::Passport),
            "ot" | "other" | "otro" => Ok(DocumentType::Other),
            _ => Err(format!(
                "valid: {}",
                DocumentType::all()
                    .iter()
                    .map(|d| d.code().to_lowercase())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Person Type
// ─────────────────────────────────────────────────────────────────

/// Relationship of the person to the institution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PersonType {
    /// Enrolled apprentice ("aprendiz").
    Trainee,
    /// Employee ("funcionario").
    Staff,
    /// Visitor or anyone else.
    Regular,
}

impl PersonType {
    pub fn display_name(&self) -> &'static str {
        match self {
            PersonType::Trainee => "Trainee",
            PersonType::Staff => "Staff",
            PersonType::Regular => "Regular",
        }
    }

    pub fn all() -> &'static [PersonType] {
        &[PersonType::Trainee, PersonType::Staff, PersonType::Regular]
    }
}

impl fmt::Display for PersonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PersonType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trainee" | "aprendiz" => Ok(PersonType::Trainee),
            "staff" | "funcionario" => Ok(PersonType::Staff),
            "regular" | "persona-corriente" | "personacorriente" => Ok(PersonType::Regular),
            _ => Err(format!(
                "valid: {}",
                PersonType::all()
                    .iter()
                    .map(|p| p.display_name().to_lowercase())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Fields
// ─────────────────────────────────────────────────────────────────

/// Scalar fields of the persona form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonaField {
    DocumentType,
    DocumentNumber,
    FirstName,
    LastName,
    Email,
    Phone,
    PersonType,
}

impl PersonaField {
    pub fn slug(&self) -> &'static str {
        match self {
            PersonaField::DocumentType => "document-type",
            PersonaField::DocumentNumber => "document-number",
            PersonaField::FirstName => "first-name",
            PersonaField::LastName => "last-name",
            PersonaField::Email => "email",
            PersonaField::Phone => "phone",
            PersonaField::PersonType => "person-type",
        }
    }
}

impl fmt::Display for PersonaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for PersonaField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.to_lowercase().replace('_', "-");
        PersonaDraft::fields()
            .iter()
            .copied()
            .find(|field| field.slug() == wanted)
            .ok_or_else(|| {
                format!(
                    "Unknown persona field '{}'. Valid: document-type, document-number, \
                     first-name, last-name, email, phone, person-type",
                    s
                )
            })
    }
}

// ─────────────────────────────────────────────────────────────────
// Assignments
// ─────────────────────────────────────────────────────────────────

/// Form-local identity of an assignment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssignmentId(pub u64);

impl fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AssignmentId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(AssignmentId)
            .map_err(|_| format!("'{}' is not an assignment id", s))
    }
}

/// Stored assignment: catalog reference plus the label cached at selection time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentAssignment {
    pub catalog_id: CatalogId,
    pub label: String,
}

/// Assignment row while the form is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftAssignment {
    pub id: AssignmentId,
    pub catalog_id: Option<CatalogId>,
    /// Empty when `catalog_id` is `None`.
    pub label: String,
}

impl DraftAssignment {
    fn empty(id: AssignmentId) -> Self {
        Self {
            id,
            catalog_id: None,
            label: String::new(),
        }
    }

    pub fn is_selected(&self) -> bool {
        self.catalog_id.is_some()
    }
}

// ─────────────────────────────────────────────────────────────────
// Persona Draft
// ─────────────────────────────────────────────────────────────────

/// Working copy of a persona.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaDraft {
    pub document_type: Option<DocumentType>,
    pub document_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub person_type: Option<PersonType>,
    assignments: Vec<DraftAssignment>,
    next_assignment: u64,
}

impl Default for PersonaDraft {
    fn default() -> Self {
        Self {
            document_type: None,
            document_number: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            person_type: None,
            assignments: vec![DraftAssignment::empty(AssignmentId(1))],
            next_assignment: 2,
        }
    }
}

impl PersonaDraft {
    pub fn assignments(&self) -> &[DraftAssignment] {
        &self.assignments
    }

    /// Next revision with one empty assignment appended.
    pub fn with_assignment_added(mut self) -> (Self, AssignmentId) {
        let id = AssignmentId(self.next_assignment);
        self.next_assignment += 1;
        self.assignments.push(DraftAssignment::empty(id));
        (self, id)
    }

    /// Next revision without the given assignment. The last row is never removed.
    pub fn without_assignment(mut self, id: AssignmentId) -> Result<Self> {
        let position = self.position_of(id)?;
        if self.assignments.len() <= 1 {
            return Err(Error::LastAssignment { id: id.0 });
        }
        self.assignments.remove(position);
        Ok(self)
    }

    /// Next revision with one assignment pointing at `entry`, or cleared when `None`.
    pub fn with_selection(
        mut self,
        id: AssignmentId,
        entry: Option<&CatalogEntry>,
    ) -> Result<Self> {
        let position = self.position_of(id)?;
        let row = &mut self.assignments[position];
        match entry {
            Some(entry) => {
                row.catalog_id = Some(entry.id);
                row.label = entry.label();
            }
            None => {
                row.catalog_id = None;
                row.label.clear();
            }
        }
        Ok(self)
    }

    fn position_of(&self, id: AssignmentId) -> Result<usize> {
        self.assignments
            .iter()
            .position(|row| row.id == id)
            .ok_or(Error::AssignmentNotFound { id: id.0 })
    }
}

impl Draft for PersonaDraft {
    type Field = PersonaField;
    type Context = Arc<dyn EquipmentCatalog>;

    const NOUN: &'static str = "Persona";

    fn fields() -> &'static [PersonaField] {
        &[
            PersonaField::DocumentType,
            PersonaField::DocumentNumber,
            PersonaField::FirstName,
            PersonaField::LastName,
            PersonaField::Email,
            PersonaField::Phone,
            PersonaField::PersonType,
        ]
    }

    fn field_value(&self, field: PersonaField) -> String {
        match field {
            PersonaField::DocumentType => self
                .document_type
                .map(|d| d.display_name().to_string())
                .unwrap_or_default(),
            PersonaField::DocumentNumber => self.document_number.clone(),
            PersonaField::FirstName => self.first_name.clone(),
            PersonaField::LastName => self.last_name.clone(),
            PersonaField::Email => self.email.clone(),
            PersonaField::Phone => self.phone.clone(),
            PersonaField::PersonType => self
                .person_type
                .map(|p| p.display_name().to_string())
                .unwrap_or_default(),
        }
    }

    fn with_field(mut self, field: PersonaField, value: &str) -> Result<Self> {
        match field {
            PersonaField::DocumentType => self.document_type = optional_input(field, value)?,
            PersonaField::DocumentNumber => self.document_number = numeric_input(field, value)?,
            PersonaField::FirstName => self.first_name = value.to_string(),
            PersonaField::LastName => self.last_name = value.to_string(),
            PersonaField::Email => self.email = value.trim().to_string(),
            PersonaField::Phone => self.phone = numeric_input(field, value)?,
            PersonaField::PersonType => self.person_type = optional_input(field, value)?,
        }
        Ok(self)
    }

    fn finalize(mut self) -> Result<Self> {
        self.assignments.retain(DraftAssignment::is_selected);
        if self.assignments.is_empty() {
            return Err(Error::NoEquipmentSelected);
        }
        Ok(self)
    }

    fn sublist_len(&self) -> Option<usize> {
        Some(self.assignments.len())
    }
}

// ─────────────────────────────────────────────────────────────────
// Persona Record
// ─────────────────────────────────────────────────────────────────

/// A stored persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub id: RecordId,
    pub document_type: Option<DocumentType>,
    pub document_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub person_type: Option<PersonType>,
    pub equipment: Vec<EquipmentAssignment>,
}

impl Persona {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

impl Record for Persona {
    type Draft = PersonaDraft;

    const SLICE: Slice = Slice::Personas;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn to_draft(&self) -> PersonaDraft {
        let mut draft = PersonaDraft {
            document_type: self.document_type,
            document_number: self.document_number.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            person_type: self.person_type,
            ..PersonaDraft::default()
        };

        if !self.equipment.is_empty() {
            draft.assignments = self
                .equipment
                .iter()
                .zip(1u64..)
                .map(|(stored, n)| DraftAssignment {
                    id: AssignmentId(n),
                    catalog_id: Some(stored.catalog_id),
                    label: stored.label.clone(),
                })
                .collect();
            draft.next_assignment = self.equipment.len() as u64 + 1;
        }

        draft
    }

    fn from_draft(id: RecordId, draft: PersonaDraft) -> Self {
        let equipment = draft
            .assignments
            .into_iter()
            .filter_map(|row| {
                row.catalog_id.map(|catalog_id| EquipmentAssignment {
                    catalog_id,
                    label: row.label,
                })
            })
            .collect();

        Self {
            id,
            document_type: draft.document_type,
            document_number: draft.document_number,
            first_name: draft.first_name,
            last_name: draft.last_name,
            email: draft.email,
            phone: draft.phone,
            person_type: draft.person_type,
            equipment,
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
