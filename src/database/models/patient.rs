use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            other => Err(format!(
                "Invalid gender: '{}'. Must be one of: male, female, other",
                other
            )),
        }
    }
}

/// A patient record. `created_by` is the owning user: only that user
/// may read, update, or delete the record.
#[derive(Debug, Clone, Serialize)]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub gender: Gender,
    pub date_of_birth: Option<NaiveDate>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub allergies: Option<String>,
    pub medical_history: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a patient. There is deliberately no owner
/// field: the owner is always the authenticated caller.
#[derive(Debug, Default, Deserialize)]
pub struct CreatePatientRequest {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub allergies: Option<String>,
    pub medical_history: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub allergies: Option<String>,
    pub medical_history: Option<String>,
}

/// Validated fields for a new patient.
#[derive(Debug)]
pub struct PatientDraft {
    pub name: String,
    pub gender: Gender,
    pub date_of_birth: Option<NaiveDate>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub allergies: Option<String>,
    pub medical_history: Option<String>,
}

/// Validated partial update; `None` leaves the stored value unchanged.
#[derive(Debug, Default)]
pub struct PatientUpdate {
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub allergies: Option<String>,
    pub medical_history: Option<String>,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date: '{}'. Expected YYYY-MM-DD", raw))
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl CreatePatientRequest {
    pub fn validate(&self) -> Result<PatientDraft, HashMap<String, String>> {
        let mut errors = HashMap::new();

        let name = self.name.as_deref().map(str::trim).unwrap_or("");
        if name.is_empty() {
            errors.insert("name".to_string(), "Name is required".to_string());
        }

        let gender = match self.gender.as_deref().map(str::trim) {
            None | Some("") => {
                errors.insert("gender".to_string(), "Gender is required".to_string());
                None
            }
            Some(raw) => match raw.parse::<Gender>() {
                Ok(g) => Some(g),
                Err(msg) => {
                    errors.insert("gender".to_string(), msg);
                    None
                }
            },
        };

        let date_of_birth = match self.date_of_birth.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match parse_date(raw) {
                Ok(d) => Some(d),
                Err(msg) => {
                    errors.insert("date_of_birth".to_string(), msg);
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(PatientDraft {
            name: name.to_string(),
            gender: gender.expect("gender validated above"),
            date_of_birth,
            phone: non_empty(&self.phone),
            address: non_empty(&self.address),
            allergies: non_empty(&self.allergies),
            medical_history: non_empty(&self.medical_history),
        })
    }
}

impl UpdatePatientRequest {
    pub fn validate(&self) -> Result<PatientUpdate, HashMap<String, String>> {
        let mut errors = HashMap::new();

        let gender = match self.gender.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<Gender>() {
                Ok(g) => Some(g),
                Err(msg) => {
                    errors.insert("gender".to_string(), msg);
                    None
                }
            },
        };

        let date_of_birth = match self.date_of_birth.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match parse_date(raw) {
                Ok(d) => Some(d),
                Err(msg) => {
                    errors.insert("date_of_birth".to_string(), msg);
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(PatientUpdate {
            name: non_empty(&self.name),
            gender,
            date_of_birth,
            phone: non_empty(&self.phone),
            address: non_empty(&self.address),
            allergies: non_empty(&self.allergies),
            medical_history: non_empty(&self.medical_history),
        })
    }
}

impl Patient {
    /// Apply a validated partial update in place.
    pub fn apply(&mut self, update: PatientUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(gender) = update.gender {
            self.gender = gender;
        }
        if let Some(dob) = update.date_of_birth {
            self.date_of_birth = Some(dob);
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone);
        }
        if let Some(address) = update.address {
            self.address = Some(address);
        }
        if let Some(allergies) = update.allergies {
            self.allergies = Some(allergies);
        }
        if let Some(history) = update.medical_history {
            self.medical_history = Some(history);
        }
    }
}
