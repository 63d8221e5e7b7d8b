use std::sync::Arc;
use uuid::Uuid;

use crate::database::models::patient::{Patient, PatientDraft, PatientUpdate};
use crate::database::{PatientStore, StoreError};
use crate::middleware::AuthUser;

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    /// Covers both "no such record" and "record owned by someone else";
    /// the two are never distinguished outward.
    #[error("patient not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The single ownership predicate applied by every read, update, and
/// delete on patient records.
pub fn owned_by(user: &AuthUser, patient: &Patient) -> bool {
    patient.created_by == user.id
}

#[derive(Clone)]
pub struct PatientService {
    patients: Arc<dyn PatientStore>,
}

impl PatientService {
    pub fn new(patients: Arc<dyn PatientStore>) -> Self {
        Self { patients }
    }

    /// Create a patient owned by the caller. The owner is always the
    /// authenticated user; there is no client-supplied owner field.
    pub async fn create(
        &self,
        user: &AuthUser,
        draft: PatientDraft,
    ) -> Result<Patient, PatientError> {
        Ok(self.patients.insert_patient(user.id, draft).await?)
    }

    /// All patients owned by the caller.
    pub async fn list(&self, user: &AuthUser) -> Result<Vec<Patient>, PatientError> {
        Ok(self.patients.patients_by_owner(user.id).await?)
    }

    pub async fn get(&self, user: &AuthUser, id: Uuid) -> Result<Patient, PatientError> {
        self.load_owned(user, id).await
    }

    pub async fn update(
        &self,
        user: &AuthUser,
        id: Uuid,
        update: PatientUpdate,
    ) -> Result<Patient, PatientError> {
        let mut patient = self.load_owned(user, id).await?;
        patient.apply(update);
        self.patients.update_patient(&patient).await?;
        Ok(patient)
    }

    pub async fn delete(&self, user: &AuthUser, id: Uuid) -> Result<(), PatientError> {
        // Ownership is checked on the loaded record before the delete
        // is issued, like every other patient operation.
        self.load_owned(user, id).await?;
        if !self.patients.delete_patient(id).await? {
            return Err(PatientError::NotFound);
        }
        Ok(())
    }

    async fn load_owned(&self, user: &AuthUser, id: Uuid) -> Result<Patient, PatientError> {
        let patient = self
            .patients
            .patient_by_id(id)
            .await?
            .ok_or(PatientError::NotFound)?;
        if !owned_by(user, &patient) {
            return Err(PatientError::NotFound);
        }
        Ok(patient)
    }
}
