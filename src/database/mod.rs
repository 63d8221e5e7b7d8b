use async_trait::async_trait;
use uuid::Uuid;

pub mod memory;
pub mod models;
pub mod postgres;

use models::appointment::{Appointment, AppointmentDraft, AppointmentView};
use models::patient::{Patient, PatientDraft};
use models::user::{NewUser, User};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("duplicate key: {0}")]
    Duplicate(String),
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("invalid stored value: {0}")]
    Corrupt(String),
}

/// Persistence for user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;
    /// Lookup by email. Callers pass lowercased emails; stored emails
    /// are lowercased at registration, making the match case-insensitive.
    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
}

/// Persistence for patient records.
#[async_trait]
pub trait PatientStore: Send + Sync {
    async fn insert_patient(&self, owner: Uuid, draft: PatientDraft)
        -> Result<Patient, StoreError>;
    async fn patient_by_id(&self, id: Uuid) -> Result<Option<Patient>, StoreError>;
    async fn patients_by_owner(&self, owner: Uuid) -> Result<Vec<Patient>, StoreError>;
    /// Persist a fully merged record, keyed by its id.
    async fn update_patient(&self, patient: &Patient) -> Result<(), StoreError>;
    /// Returns false when no record with that id existed.
    async fn delete_patient(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Persistence for the clinic-wide appointment book.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn insert_appointment(&self, draft: AppointmentDraft)
        -> Result<Appointment, StoreError>;
    async fn appointment_by_id(&self, id: Uuid) -> Result<Option<Appointment>, StoreError>;
    async fn update_appointment(&self, appointment: &Appointment) -> Result<(), StoreError>;
    async fn delete_appointment(&self, id: Uuid) -> Result<bool, StoreError>;
    /// One page of appointments sorted by date ascending, with the
    /// referenced patient resolved. `search` is a case-insensitive
    /// substring match over reason or status.
    async fn page_appointments(
        &self,
        search: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<AppointmentView>, StoreError>;
    async fn count_appointments(&self, search: Option<&str>) -> Result<i64, StoreError>;
}
