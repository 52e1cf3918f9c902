use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::anesthesia::AnesthesiaType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Patient {
    pub id: Uuid,
    pub card_number: Option<String>,
    pub last_name: String,
    pub first_name: String,
    pub patronymic: Option<String>,
    pub birth_date: Date,
    /// Date the patient entered the study; age is measured on this date.
    pub inclusion_date: Date,
    pub height_cm: u16,
    pub weight_kg: u16,
    pub sex: Sex,
    pub anesthesia_type: Option<AnesthesiaType>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl Patient {
    pub fn full_name(&self) -> String {
        [
            Some(self.last_name.as_str()),
            Some(self.first_name.as_str()),
            self.patronymic.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Age in completed years on the given date.
    pub fn age_on(&self, on: Date) -> i16 {
        let born = self.birth_date;
        let mut years = on.year() - born.year();
        if (on.month(), on.day()) < (born.month(), born.day()) {
            years -= 1;
        }
        years
    }

    pub fn age_years(&self) -> i16 {
        self.age_on(self.inclusion_date)
    }

    /// Body-mass index rounded to one decimal.
    pub fn bmi(&self) -> Option<f64> {
        body_mass_index(f64::from(self.height_cm), f64::from(self.weight_kg)).map(round_to_tenth)
    }
}

/// Registration payload for a new patient.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewPatient {
    pub card_number: Option<String>,
    pub last_name: String,
    pub first_name: String,
    pub patronymic: Option<String>,
    pub birth_date: Date,
    pub inclusion_date: Date,
    pub height_cm: u16,
    pub weight_kg: u16,
    pub sex: Sex,
    pub anesthesia_type: Option<AnesthesiaType>,
}

impl NewPatient {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.last_name.trim().is_empty() {
            return Err(invalid("last_name", "must not be empty"));
        }
        if self.first_name.trim().is_empty() {
            return Err(invalid("first_name", "must not be empty"));
        }
        if self.birth_date > self.inclusion_date {
            return Err(invalid(
                "birth_date",
                format!(
                    "{} is after the inclusion date {}",
                    self.birth_date, self.inclusion_date
                ),
            ));
        }
        if !(50..=250).contains(&self.height_cm) {
            return Err(invalid(
                "height_cm",
                format!("{} is outside [50, 250]", self.height_cm),
            ));
        }
        if !(2..=400).contains(&self.weight_kg) {
            return Err(invalid(
                "weight_kg",
                format!("{} is outside [2, 400]", self.weight_kg),
            ));
        }
        Ok(())
    }

    pub fn into_patient(self, id: Uuid, now: jiff::Timestamp) -> Patient {
        Patient {
            id,
            card_number: self.card_number,
            last_name: self.last_name,
            first_name: self.first_name,
            patronymic: self.patronymic,
            birth_date: self.birth_date,
            inclusion_date: self.inclusion_date,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            sex: self.sex,
            anesthesia_type: self.anesthesia_type,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a registered patient. Absent fields keep their value;
/// an empty `card_number` or `patronymic` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PatientUpdate {
    #[serde(default)]
    pub card_number: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub patronymic: Option<String>,
    #[serde(default)]
    pub birth_date: Option<Date>,
    #[serde(default)]
    pub inclusion_date: Option<Date>,
    #[serde(default)]
    pub height_cm: Option<u16>,
    #[serde(default)]
    pub weight_kg: Option<u16>,
    #[serde(default)]
    pub sex: Option<Sex>,
    #[serde(default)]
    pub anesthesia_type: Option<AnesthesiaType>,
}

impl PatientUpdate {
    pub fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }

    /// Names of the fields this update sets.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        [
            ("card_number", self.card_number.is_some()),
            ("last_name", self.last_name.is_some()),
            ("first_name", self.first_name.is_some()),
            ("patronymic", self.patronymic.is_some()),
            ("birth_date", self.birth_date.is_some()),
            ("inclusion_date", self.inclusion_date.is_some()),
            ("height_cm", self.height_cm.is_some()),
            ("weight_kg", self.weight_kg.is_some()),
            ("sex", self.sex.is_some()),
            ("anesthesia_type", self.anesthesia_type.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }

    /// Merge into `patient`, re-running registration validation on the
    /// result. `patient` is left untouched on error.
    pub fn apply(self, patient: &Patient, now: jiff::Timestamp) -> Result<Patient, CoreError> {
        let merged = NewPatient {
            card_number: match self.card_number {
                Some(card) => non_blank(card),
                None => patient.card_number.clone(),
            },
            last_name: self.last_name.unwrap_or_else(|| patient.last_name.clone()),
            first_name: self.first_name.unwrap_or_else(|| patient.first_name.clone()),
            patronymic: match self.patronymic {
                Some(patronymic) => non_blank(patronymic),
                None => patient.patronymic.clone(),
            },
            birth_date: self.birth_date.unwrap_or(patient.birth_date),
            inclusion_date: self.inclusion_date.unwrap_or(patient.inclusion_date),
            height_cm: self.height_cm.unwrap_or(patient.height_cm),
            weight_kg: self.weight_kg.unwrap_or(patient.weight_kg),
            sex: self.sex.unwrap_or(patient.sex),
            anesthesia_type: self.anesthesia_type.or(patient.anesthesia_type),
        };
        merged.validate()?;

        let mut updated = merged.into_patient(patient.id, patient.created_at);
        updated.updated_at = now;
        Ok(updated)
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}

/// Patient search filters. Text filters match case-insensitive substrings;
/// every filter that is set must match.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PatientQuery {
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub patronymic: Option<String>,
    /// Age in completed years at inclusion.
    #[serde(default)]
    pub age: Option<i16>,
    #[serde(default)]
    pub card_number: Option<String>,
    #[serde(default)]
    pub inclusion_date: Option<Date>,
    #[serde(default = "PatientQuery::default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

impl Default for PatientQuery {
    fn default() -> Self {
        Self {
            last_name: None,
            first_name: None,
            patronymic: None,
            age: None,
            card_number: None,
            inclusion_date: None,
            limit: Self::default_limit(),
            offset: 0,
        }
    }
}

impl PatientQuery {
    pub const DEFAULT_LIMIT: usize = 50;

    fn default_limit() -> usize {
        Self::DEFAULT_LIMIT
    }

    pub fn matches(&self, patient: &Patient) -> bool {
        contains(Some(&patient.last_name), self.last_name.as_deref())
            && contains(Some(&patient.first_name), self.first_name.as_deref())
            && contains(patient.patronymic.as_ref(), self.patronymic.as_deref())
            && contains(patient.card_number.as_ref(), self.card_number.as_deref())
            && self
                .inclusion_date
                .is_none_or(|date| patient.inclusion_date == date)
            && self.age.is_none_or(|age| patient.age_years() == age)
    }
}

/// A blank needle matches everything, including an absent field.
fn contains(haystack: Option<&String>, needle: Option<&str>) -> bool {
    let needle = match needle.map(str::trim) {
        None | Some("") => return true,
        Some(needle) => needle.to_lowercase(),
    };
    haystack.is_some_and(|value| value.to_lowercase().contains(&needle))
}

fn invalid(field: &str, message: impl Into<String>) -> CoreError {
    CoreError::InvalidField {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Unrounded BMI (kg/m²). `None` when either measurement is missing or
/// non-positive.
pub fn body_mass_index(height_cm: f64, weight_kg: f64) -> Option<f64> {
    if height_cm <= 0.0 || weight_kg <= 0.0 {
        return None;
    }
    let height_m = height_cm / 100.0;
    Some(weight_kg / (height_m * height_m))
}

pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
