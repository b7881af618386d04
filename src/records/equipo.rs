//! Equipo records: registered equipment with brand, serial and registration stamp.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::{Draft, Record, RecordId, Slice};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S"];

/// Scalar fields of the equipo form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EquipoField {
    Brand,
    Serial,
    Accessories,
    RegistrationDate,
    RegistrationTime,
    Color,
}

impl EquipoField {
    pub fn slug(&self) -> &'static str {
        match self {
            EquipoField::Brand => "brand",
            EquipoField::Serial => "serial",
            EquipoField::Accessories => "accessories",
            EquipoField::RegistrationDate => "registration-date",
            EquipoField::RegistrationTime => "registration-time",
            EquipoField::Color => "color",
        }
    }
}

impl fmt::Display for EquipoField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for EquipoField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.to_lowercase().replace('_', "-");
        EquipoDraft::fields()
            .iter()
            .copied()
            .find(|field| field.slug() == wanted)
            .ok_or_else(|| {
                format!(
                    "Unknown equipo field '{}'. Valid: brand, serial, accessories, \
                     registration-date, registration-time, color",
                    s
                )
            })
    }
}

/// Working copy of an equipo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquipoDraft {
    pub brand: String,
    pub serial: String,
    pub accessories: String,
    pub registration_date: Option<NaiveDate>,
    pub registration_time: Option<NaiveTime>,
    pub color: String,
}

fn parse_date(field: EquipoField, value: &str) -> Result<Option<NaiveDate>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(Some)
        .map_err(|_| Error::invalid_field(field, value, "expected YYYY-MM-DD"))
}

fn parse_time(field: EquipoField, value: &str) -> Result<Option<NaiveTime>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
        .map(Some)
        .ok_or_else(|| Error::invalid_field(field, value, "expected HH:MM"))
}

/// Render a time the way the input accepts it, dropping zero seconds.
pub(crate) fn format_time(time: NaiveTime) -> String {
    if time.second() == 0 {
        time.format("%H:%M").to_string()
    } else {
        time.format("%H:%M:%S").to_string()
    }
}

impl Draft for EquipoDraft {
    type Field = EquipoField;
    type Context = ();

    const NOUN: &'static str = "Equipo";

    fn fields() -> &'static [EquipoField] {
        &[
            EquipoField::Brand,
            EquipoField::Serial,
            EquipoField::Accessories,
            EquipoField::RegistrationDate,
            EquipoField::RegistrationTime,
            EquipoField::Color,
        ]
    }

    fn field_value(&self, field: EquipoField) -> String {
        match field {
            EquipoField::Brand => self.brand.clone(),
            EquipoField::Serial => self.serial.clone(),
            EquipoField::Accessories => self.accessories.clone(),
            EquipoField::RegistrationDate => self
                .registration_date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            EquipoField::RegistrationTime => {
                self.registration_time.map(format_time).unwrap_or_default()
            }
            EquipoField::Color => self.color.clone(),
        }
    }

    fn with_field(mut self, field: EquipoField, value: &str) -> Result<Self> {
        match field {
            EquipoField::Brand => self.brand = value.to_string(),
            EquipoField::Serial => self.serial = value.trim().to_string(),
            EquipoField::Accessories => self.accessories = value.to_string(),
            EquipoField::RegistrationDate => self.registration_date = parse_date(field, value)?,
            EquipoField::RegistrationTime => self.registration_time = parse_time(field, value)?,
            EquipoField::Color => self.color = value.to_string(),
        }
        Ok(self)
    }

    fn finalize(self) -> Result<Self> {
        Ok(self)
    }
}

/// A stored equipo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipo {
    pub id: RecordId,
    pub brand: String,
    pub serial: String,
    pub accessories: String,
    pub registration_date: Option<NaiveDate>,
    pub registration_time: Option<NaiveTime>,
    pub color: String,
}

impl Equipo {
    /// Date and time joined for display; empty when neither is set.
    pub fn registered_at(&self) -> String {
        let date = self
            .registration_date
            .map(|d| d.format(DATE_FORMAT).to_string());
        let time = self.registration_time.map(format_time);
        match (date, time) {
            (Some(d), Some(t)) => format!("{} {}", d, t),
            (Some(d), None) => d,
            (None, Some(t)) => t,
            (None, None) => String::new(),
        }
    }
}

impl Record for Equipo {
    type Draft = EquipoDraft;

    const SLICE: Slice = Slice::Equipos;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn to_draft(&self) -> EquipoDraft {
        EquipoDraft {
            brand: self.brand.clone(),
            serial: self.serial.clone(),
            accessories: self.accessories.clone(),
            registration_date: self.registration_date,
            registration_time: self.registration_time,
            color: self.color.clone(),
        }
    }

    fn from_draft(id: RecordId, draft: EquipoDraft) -> Self {
        Self {
            id,
            brand: draft.brand,
            serial: draft.serial,
            accessories: draft.accessories,
            registration_date: draft.registration_date,
            registration_time: draft.registration_time,
            color: draft.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_from_str() {
        assert_eq!("brand".parse::<EquipoField>().unwrap(), EquipoField::Brand);
        assert_eq!(
            "registration_date".parse::<EquipoField>().unwrap(),
            EquipoField::RegistrationDate
        );
        assert!("weight".parse::<EquipoField>().is_err());
    }

    #[test]
    fn test_date_and_time_inputs() {
        let draft = EquipoDraft::default()
            .with_field(EquipoField::RegistrationDate, "2024-03-15")
            .unwrap()
            .with_field(EquipoField::RegistrationTime, "07:45")
            .unwrap();

        assert_eq!(
            draft.registration_date,
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(draft.field_value(EquipoField::RegistrationTime), "07:45");

        let with_seconds = draft
            .with_field(EquipoField::RegistrationTime, "07:45:10")
            .unwrap();
        assert_eq!(with_seconds.field_value(EquipoField::RegistrationTime), "07:45:10");
    }

    #[test]
    fn test_malformed_date_rejected() {
        let err = EquipoDraft::default()
            .with_field(EquipoField::RegistrationDate, "15/03/2024")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidFieldValue { .. }));
        assert!(EquipoDraft::default()
            .with_field(EquipoField::RegistrationTime, "25:00")
            .is_err());
    }

    #[test]
    fn test_finalize_accepts_blank_draft() {
        assert_eq!(EquipoDraft::default().finalize().unwrap(), EquipoDraft::default());
    }

    #[test]
    fn test_registered_at() {
        let draft = EquipoDraft::default()
            .with_field(EquipoField::RegistrationDate, "2024-03-15")
            .unwrap();
        let equipo = Equipo::from_draft(RecordId::from("e-1"), draft);
        assert_eq!(equipo.registered_at(), "2024-03-15");

        let equipo = Equipo {
            registration_time: NaiveTime::from_hms_opt(9, 30, 0),
            ..equipo
        };
        assert_eq!(equipo.registered_at(), "2024-03-15 09:30");
        assert_eq!(equipo.to_draft().registration_time, NaiveTime::from_hms_opt(9, 30, 0));
    }
}
