//! In-memory store, used by the test suite and handy for local runs
//! without a database. Same trait surface as the Postgres store.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::appointment::{
    Appointment, AppointmentDraft, AppointmentView, PatientSummary,
};
use super::models::patient::{Patient, PatientDraft};
use super::models::user::{NewUser, User};
use super::{AppointmentStore, PatientStore, StoreError, UserStore};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    patients: RwLock<HashMap<Uuid, Patient>>,
    appointments: RwLock<HashMap<Uuid, Appointment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_search(appointment: &Appointment, search: Option<&str>) -> bool {
    match search {
        None => true,
        Some(term) => {
            let term = term.to_lowercase();
            appointment.reason.to_lowercase().contains(&term)
                || appointment.status.as_str().contains(&term)
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate(user.email));
        }
        let now = Utc::now();
        let record = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl PatientStore for MemoryStore {
    async fn insert_patient(
        &self,
        owner: Uuid,
        draft: PatientDraft,
    ) -> Result<Patient, StoreError> {
        let now = Utc::now();
        let record = Patient {
            id: Uuid::new_v4(),
            name: draft.name,
            gender: draft.gender,
            date_of_birth: draft.date_of_birth,
            phone: draft.phone,
            address: draft.address,
            allergies: draft.allergies,
            medical_history: draft.medical_history,
            created_by: owner,
            created_at: now,
            updated_at: now,
        };
        self.patients.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn patient_by_id(&self, id: Uuid) -> Result<Option<Patient>, StoreError> {
        Ok(self.patients.read().await.get(&id).cloned())
    }

    async fn patients_by_owner(&self, owner: Uuid) -> Result<Vec<Patient>, StoreError> {
        let patients = self.patients.read().await;
        let mut owned: Vec<Patient> = patients
            .values()
            .filter(|p| p.created_by == owner)
            .cloned()
            .collect();
        owned.sort_by_key(|p| p.created_at);
        Ok(owned)
    }

    async fn update_patient(&self, patient: &Patient) -> Result<(), StoreError> {
        let mut patients = self.patients.write().await;
        let mut record = patient.clone();
        record.updated_at = Utc::now();
        patients.insert(record.id, record);
        Ok(())
    }

    async fn delete_patient(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.patients.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl AppointmentStore for MemoryStore {
    async fn insert_appointment(
        &self,
        draft: AppointmentDraft,
    ) -> Result<Appointment, StoreError> {
        let now = Utc::now();
        let record = Appointment {
            id: Uuid::new_v4(),
            patient_id: draft.patient_id,
            date: draft.date,
            time: draft.time,
            reason: draft.reason,
            status: draft.status,
            created_at: now,
            updated_at: now,
        };
        self.appointments
            .write()
            .await
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn appointment_by_id(&self, id: Uuid) -> Result<Option<Appointment>, StoreError> {
        Ok(self.appointments.read().await.get(&id).cloned())
    }

    async fn update_appointment(&self, appointment: &Appointment) -> Result<(), StoreError> {
        let mut appointments = self.appointments.write().await;
        let mut record = appointment.clone();
        record.updated_at = Utc::now();
        appointments.insert(record.id, record);
        Ok(())
    }

    async fn delete_appointment(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.appointments.write().await.remove(&id).is_some())
    }

    async fn page_appointments(
        &self,
        search: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<AppointmentView>, StoreError> {
        let appointments = self.appointments.read().await;
        let patients = self.patients.read().await;

        let mut matching: Vec<&Appointment> = appointments
            .values()
            .filter(|a| matches_search(a, search))
            .collect();
        matching.sort_by_key(|a| (a.date, a.created_at));

        let page = matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(|a| {
                let patient = patients.get(&a.patient_id).map(|p| PatientSummary {
                    id: p.id,
                    name: p.name.clone(),
                    gender: p.gender,
                });
                AppointmentView::new(a.clone(), patient)
            })
            .collect();
        Ok(page)
    }

    async fn count_appointments(&self, search: Option<&str>) -> Result<i64, StoreError> {
        let appointments = self.appointments.read().await;
        Ok(appointments
            .values()
            .filter(|a| matches_search(a, search))
            .count() as i64)
    }
}
