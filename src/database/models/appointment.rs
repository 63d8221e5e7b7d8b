use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::patient::Gender;

pub const DEFAULT_REASON: &str = "Routine checkup";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(format!(
                "Invalid status: '{}'. Must be one of: scheduled, completed, cancelled",
                other
            )),
        }
    }
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        AppointmentStatus::Scheduled
    }
}

/// A stored appointment. Date and time are kept as separate fields, the
/// time as an opaque display string.
#[derive(Debug, Clone, Serialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub date: NaiveDate,
    pub time: String,
    pub reason: String,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The patient fields embedded in appointment responses.
#[derive(Debug, Clone, Serialize)]
pub struct PatientSummary {
    pub id: Uuid,
    pub name: String,
    pub gender: Gender,
}

/// Appointment as returned by the API, with the referenced patient
/// resolved. `patient` is null when the record was deleted after the
/// appointment was made.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentView {
    pub id: Uuid,
    pub patient: Option<PatientSummary>,
    pub date: NaiveDate,
    pub time: String,
    pub reason: String,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AppointmentView {
    pub fn new(appointment: Appointment, patient: Option<PatientSummary>) -> Self {
        Self {
            id: appointment.id,
            patient,
            date: appointment.date,
            time: appointment.time,
            reason: appointment.reason,
            status: appointment.status,
            created_at: appointment.created_at,
            updated_at: appointment.updated_at,
        }
    }
}

/// One page of the appointment book.
#[derive(Debug, Serialize)]
pub struct AppointmentPage {
    pub data: Vec<AppointmentView>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateAppointmentRequest {
    pub patient: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub reason: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub patient: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub reason: Option<String>,
    pub status: Option<String>,
}

/// Validated fields for a new appointment.
#[derive(Debug)]
pub struct AppointmentDraft {
    pub patient_id: Uuid,
    pub date: NaiveDate,
    pub time: String,
    pub reason: String,
    pub status: AppointmentStatus,
}

/// Validated partial update; `None` leaves the stored value unchanged.
#[derive(Debug, Default)]
pub struct AppointmentUpdate {
    pub patient_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub reason: Option<String>,
    pub status: Option<AppointmentStatus>,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date: '{}'. Expected YYYY-MM-DD", raw))
}

impl CreateAppointmentRequest {
    pub fn validate(&self) -> Result<AppointmentDraft, HashMap<String, String>> {
        let mut errors = HashMap::new();

        let patient_id = match self.patient.as_deref().map(str::trim) {
            None | Some("") => {
                errors.insert("patient".to_string(), "Patient is required".to_string());
                None
            }
            Some(raw) => match Uuid::parse_str(raw) {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.insert(
                        "patient".to_string(),
                        format!("Invalid patient id: '{}'", raw),
                    );
                    None
                }
            },
        };

        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") => {
                errors.insert("date".to_string(), "Date is required".to_string());
                None
            }
            Some(raw) => match parse_date(raw) {
                Ok(d) => Some(d),
                Err(msg) => {
                    errors.insert("date".to_string(), msg);
                    None
                }
            },
        };

        let time = self.time.as_deref().map(str::trim).unwrap_or("");
        if time.is_empty() {
            errors.insert("time".to_string(), "Time is required".to_string());
        }

        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => AppointmentStatus::default(),
            Some(raw) => match raw.parse() {
                Ok(s) => s,
                Err(msg) => {
                    errors.insert("status".to_string(), msg);
                    AppointmentStatus::default()
                }
            },
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        let reason = self
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_REASON)
            .to_string();

        Ok(AppointmentDraft {
            patient_id: patient_id.expect("patient validated above"),
            date: date.expect("date validated above"),
            time: time.to_string(),
            reason,
            status,
        })
    }
}

impl UpdateAppointmentRequest {
    pub fn validate(&self) -> Result<AppointmentUpdate, HashMap<String, String>> {
        let mut errors = HashMap::new();
        let mut update = AppointmentUpdate::default();

        if let Some(raw) = self.patient.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            match Uuid::parse_str(raw) {
                Ok(id) => update.patient_id = Some(id),
                Err(_) => {
                    errors.insert(
                        "patient".to_string(),
                        format!("Invalid patient id: '{}'", raw),
                    );
                }
            }
        }

        if let Some(raw) = self.date.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            match parse_date(raw) {
                Ok(d) => update.date = Some(d),
                Err(msg) => {
                    errors.insert("date".to_string(), msg);
                }
            }
        }

        if let Some(raw) = self.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            match raw.parse() {
                Ok(s) => update.status = Some(s),
                Err(msg) => {
                    errors.insert("status".to_string(), msg);
                }
            }
        }

        update.time = self
            .time
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        update.reason = self
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(update)
    }
}

impl Appointment {
    /// Apply a validated partial update in place.
    pub fn apply(&mut self, update: AppointmentUpdate) {
        if let Some(patient_id) = update.patient_id {
            self.patient_id = patient_id;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(time) = update.time {
            self.time = time;
        }
        if let Some(reason) = update.reason {
            self.reason = reason;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
    }
}
