//! Postgres-backed store (sqlx). Enum columns are plain text; rows are
//! decoded into intermediate structs and parsed into domain types so a
//! bad stored value surfaces as an explicit error instead of a panic.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use std::time::Duration;
use uuid::Uuid;

use super::models::appointment::{
    Appointment, AppointmentDraft, AppointmentView, PatientSummary,
};
use super::models::patient::{Patient, PatientDraft};
use super::models::user::{NewUser, User};
use super::{AppointmentStore, PatientStore, StoreError, UserStore};

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect and bring the schema up to date.
    pub async fn connect(
        url: &str,
        max_connections: u32,
        connect_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(connect_timeout)
            .connect(url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn parse_enum<T: std::str::FromStr<Err = String>>(raw: &str) -> Result<T, StoreError> {
    raw.parse().map_err(StoreError::Corrupt)
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

fn like_pattern(search: Option<&str>) -> Option<String> {
    search.map(|term| format!("%{}%", term))
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role: parse_enum(&row.role)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct PatientRow {
    id: Uuid,
    name: String,
    gender: String,
    date_of_birth: Option<NaiveDate>,
    phone: Option<String>,
    address: Option<String>,
    allergies: Option<String>,
    medical_history: Option<String>,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PatientRow> for Patient {
    type Error = StoreError;

    fn try_from(row: PatientRow) -> Result<Self, Self::Error> {
        Ok(Patient {
            id: row.id,
            name: row.name,
            gender: parse_enum(&row.gender)?,
            date_of_birth: row.date_of_birth,
            phone: row.phone,
            address: row.address,
            allergies: row.allergies,
            medical_history: row.medical_history,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct AppointmentRow {
    id: Uuid,
    patient_id: Uuid,
    date: NaiveDate,
    time: String,
    reason: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = StoreError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        Ok(Appointment {
            id: row.id,
            patient_id: row.patient_id,
            date: row.date,
            time: row.time,
            reason: row.reason,
            status: parse_enum(&row.status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Appointment joined with its (possibly deleted) patient.
#[derive(FromRow)]
struct AppointmentJoinRow {
    id: Uuid,
    patient_id: Uuid,
    date: NaiveDate,
    time: String,
    reason: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    p_id: Option<Uuid>,
    p_name: Option<String>,
    p_gender: Option<String>,
}

impl TryFrom<AppointmentJoinRow> for AppointmentView {
    type Error = StoreError;

    fn try_from(row: AppointmentJoinRow) -> Result<Self, Self::Error> {
        let patient = match (row.p_id, row.p_name, row.p_gender) {
            (Some(id), Some(name), Some(gender)) => Some(PatientSummary {
                id,
                name,
                gender: parse_enum(&gender)?,
            }),
            _ => None,
        };
        let appointment = Appointment {
            id: row.id,
            patient_id: row.patient_id,
            date: row.date,
            time: row.time,
            reason: row.reason,
            status: parse_enum(&row.status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        };
        Ok(AppointmentView::new(appointment, patient))
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, name, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Duplicate(user.email.clone())
            } else {
                StoreError::Database(e)
            }
        })?;
        row.try_into()
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password_hash, role, created_at, updated_at \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(User::try_from).transpose()
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password_hash, role, created_at, updated_at \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(User::try_from).transpose()
    }
}

#[async_trait]
impl PatientStore for PostgresStore {
    async fn insert_patient(
        &self,
        owner: Uuid,
        draft: PatientDraft,
    ) -> Result<Patient, StoreError> {
        let row = sqlx::query_as::<_, PatientRow>(
            r#"
            INSERT INTO patients
                (id, name, gender, date_of_birth, phone, address, allergies,
                 medical_history, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, name, gender, date_of_birth, phone, address, allergies,
                      medical_history, created_by, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&draft.name)
        .bind(draft.gender.as_str())
        .bind(draft.date_of_birth)
        .bind(&draft.phone)
        .bind(&draft.address)
        .bind(&draft.allergies)
        .bind(&draft.medical_history)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn patient_by_id(&self, id: Uuid) -> Result<Option<Patient>, StoreError> {
        let row = sqlx::query_as::<_, PatientRow>(
            "SELECT id, name, gender, date_of_birth, phone, address, allergies, \
             medical_history, created_by, created_at, updated_at \
             FROM patients WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Patient::try_from).transpose()
    }

    async fn patients_by_owner(&self, owner: Uuid) -> Result<Vec<Patient>, StoreError> {
        let rows = sqlx::query_as::<_, PatientRow>(
            "SELECT id, name, gender, date_of_birth, phone, address, allergies, \
             medical_history, created_by, created_at, updated_at \
             FROM patients WHERE created_by = $1 ORDER BY created_at",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Patient::try_from).collect()
    }

    async fn update_patient(&self, patient: &Patient) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE patients SET
                name = $2, gender = $3, date_of_birth = $4, phone = $5,
                address = $6, allergies = $7, medical_history = $8,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(patient.id)
        .bind(&patient.name)
        .bind(patient.gender.as_str())
        .bind(patient.date_of_birth)
        .bind(&patient.phone)
        .bind(&patient.address)
        .bind(&patient.allergies)
        .bind(&patient.medical_history)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_patient(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM patients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl AppointmentStore for PostgresStore {
    async fn insert_appointment(
        &self,
        draft: AppointmentDraft,
    ) -> Result<Appointment, StoreError> {
        let row = sqlx::query_as::<_, AppointmentRow>(
            r#"
            INSERT INTO appointments (id, patient_id, date, time, reason, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, patient_id, date, time, reason, status, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(draft.patient_id)
        .bind(draft.date)
        .bind(&draft.time)
        .bind(&draft.reason)
        .bind(draft.status.as_str())
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn appointment_by_id(&self, id: Uuid) -> Result<Option<Appointment>, StoreError> {
        let row = sqlx::query_as::<_, AppointmentRow>(
            "SELECT id, patient_id, date, time, reason, status, created_at, updated_at \
             FROM appointments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Appointment::try_from).transpose()
    }

    async fn update_appointment(&self, appointment: &Appointment) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE appointments SET
                patient_id = $2, date = $3, time = $4, reason = $5, status = $6,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(appointment.id)
        .bind(appointment.patient_id)
        .bind(appointment.date)
        .bind(&appointment.time)
        .bind(&appointment.reason)
        .bind(appointment.status.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_appointment(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn page_appointments(
        &self,
        search: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<AppointmentView>, StoreError> {
        let rows = sqlx::query_as::<_, AppointmentJoinRow>(
            r#"
            SELECT a.id, a.patient_id, a.date, a.time, a.reason, a.status,
                   a.created_at, a.updated_at,
                   p.id AS p_id, p.name AS p_name, p.gender AS p_gender
            FROM appointments a
            LEFT JOIN patients p ON p.id = a.patient_id
            WHERE $1::text IS NULL OR a.reason ILIKE $1 OR a.status ILIKE $1
            ORDER BY a.date, a.created_at
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(like_pattern(search))
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(AppointmentView::try_from).collect()
    }

    async fn count_appointments(&self, search: Option<&str>) -> Result<i64, StoreError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT count(*) FROM appointments \
             WHERE $1::text IS NULL OR reason ILIKE $1 OR status ILIKE $1",
        )
        .bind(like_pattern(search))
        .fetch_one(&self.pool)
        .await?;
        Ok(count.0)
    }
}
