use std::sync::Arc;
use uuid::Uuid;

use crate::database::models::appointment::{
    AppointmentDraft, AppointmentPage, AppointmentUpdate, AppointmentView, PatientSummary,
};
use crate::database::{AppointmentStore, PatientStore, StoreError};

/// Fixed page size of the appointment book.
pub const PAGE_SIZE: i64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("appointment not found")]
    NotFound,
    #[error("referenced patient not found")]
    PatientNotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Appointments are clinic-wide: every authenticated user shares one
/// schedule, unlike owner-scoped patient records.
#[derive(Clone)]
pub struct AppointmentService {
    appointments: Arc<dyn AppointmentStore>,
    patients: Arc<dyn PatientStore>,
}

impl AppointmentService {
    pub fn new(appointments: Arc<dyn AppointmentStore>, patients: Arc<dyn PatientStore>) -> Self {
        Self {
            appointments,
            patients,
        }
    }

    /// One page of appointments, date ascending, optionally filtered by
    /// a case-insensitive substring match over reason or status.
    pub async fn list(
        &self,
        page: i64,
        search: Option<&str>,
    ) -> Result<AppointmentPage, AppointmentError> {
        let page = page.max(1);
        let search = search.map(str::trim).filter(|s| !s.is_empty());

        let total = self.appointments.count_appointments(search).await?;
        let data = self
            .appointments
            .page_appointments(search, (page - 1) * PAGE_SIZE, PAGE_SIZE)
            .await?;

        Ok(AppointmentPage {
            data,
            total,
            page,
            pages: (total + PAGE_SIZE - 1) / PAGE_SIZE,
        })
    }

    /// Create an appointment. The referenced patient must exist; nothing
    /// is written otherwise.
    pub async fn create(
        &self,
        draft: AppointmentDraft,
    ) -> Result<AppointmentView, AppointmentError> {
        let patient = self
            .patients
            .patient_by_id(draft.patient_id)
            .await?
            .ok_or(AppointmentError::PatientNotFound)?;

        let appointment = self.appointments.insert_appointment(draft).await?;
        Ok(AppointmentView::new(
            appointment,
            Some(PatientSummary {
                id: patient.id,
                name: patient.name,
                gender: patient.gender,
            }),
        ))
    }

    /// Partial update. The patient reference is only validated at
    /// creation time; a reference left dangling by a later patient
    /// deletion resolves to a null summary.
    pub async fn update(
        &self,
        id: Uuid,
        update: AppointmentUpdate,
    ) -> Result<AppointmentView, AppointmentError> {
        let mut appointment = self
            .appointments
            .appointment_by_id(id)
            .await?
            .ok_or(AppointmentError::NotFound)?;
        appointment.apply(update);
        self.appointments.update_appointment(&appointment).await?;

        let patient = self
            .patients
            .patient_by_id(appointment.patient_id)
            .await?
            .map(|p| PatientSummary {
                id: p.id,
                name: p.name,
                gender: p.gender,
            });
        Ok(AppointmentView::new(appointment, patient))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppointmentError> {
        if !self.appointments.delete_appointment(id).await? {
            return Err(AppointmentError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::database::models::appointment::AppointmentStatus;
    use crate::database::models::patient::{Gender, PatientDraft};
    use crate::database::PatientStore;
    use chrono::NaiveDate;

    async fn service_with_patient() -> (AppointmentService, Uuid) {
        let store = Arc::new(MemoryStore::new());
        let patient = store
            .insert_patient(
                Uuid::new_v4(),
                PatientDraft {
                    name: "Jo".to_string(),
                    gender: Gender::Other,
                    date_of_birth: None,
                    phone: None,
                    address: None,
                    allergies: None,
                    medical_history: None,
                },
            )
            .await
            .unwrap();
        (
            AppointmentService::new(store.clone(), store),
            patient.id,
        )
    }

    fn draft(patient_id: Uuid, day: u32, reason: &str) -> AppointmentDraft {
        AppointmentDraft {
            patient_id,
            date: NaiveDate::from_ymd_opt(2026, 9, day).unwrap(),
            time: "10:30".to_string(),
            reason: reason.to_string(),
            status: AppointmentStatus::Scheduled,
        }
    }

    #[tokio::test]
    async fn create_rejects_unknown_patient_before_writing() {
        let (svc, _) = service_with_patient().await;
        let err = svc
            .create(draft(Uuid::new_v4(), 1, "Routine checkup"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppointmentError::PatientNotFound));
        assert_eq!(svc.list(1, None).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn pagination_splits_fifteen_into_ten_and_five() {
        let (svc, patient_id) = service_with_patient().await;
        for day in 1..=15 {
            svc.create(draft(patient_id, day, "Routine checkup"))
                .await
                .unwrap();
        }

        let first = svc.list(1, None).await.unwrap();
        assert_eq!(first.data.len(), 10);
        assert_eq!(first.total, 15);
        assert_eq!(first.pages, 2);

        let second = svc.list(2, None).await.unwrap();
        assert_eq!(second.data.len(), 5);
        assert_eq!(second.page, 2);
    }

    #[tokio::test]
    async fn list_is_sorted_by_date_ascending() {
        let (svc, patient_id) = service_with_patient().await;
        for day in [12, 3, 7] {
            svc.create(draft(patient_id, day, "Routine checkup"))
                .await
                .unwrap();
        }
        let page = svc.list(1, None).await.unwrap();
        let days: Vec<u32> = page
            .data
            .iter()
            .map(|a| chrono::Datelike::day(&a.date))
            .collect();
        assert_eq!(days, vec![3, 7, 12]);
    }

    #[tokio::test]
    async fn search_matches_reason_and_status_case_insensitively() {
        let (svc, patient_id) = service_with_patient().await;
        svc.create(draft(patient_id, 1, "Routine checkup")).await.unwrap();
        svc.create(draft(patient_id, 2, "Dental cleaning")).await.unwrap();

        let by_reason = svc.list(1, Some("ROUTINE")).await.unwrap();
        assert_eq!(by_reason.total, 1);
        assert_eq!(by_reason.data[0].reason, "Routine checkup");

        // Both records are status "scheduled"
        let by_status = svc.list(1, Some("Sched")).await.unwrap();
        assert_eq!(by_status.total, 2);
    }

    #[tokio::test]
    async fn update_and_delete_of_missing_ids_are_not_found() {
        let (svc, _) = service_with_patient().await;
        assert!(matches!(
            svc.update(Uuid::new_v4(), AppointmentUpdate::default())
                .await
                .unwrap_err(),
            AppointmentError::NotFound
        ));
        assert!(matches!(
            svc.delete(Uuid::new_v4()).await.unwrap_err(),
            AppointmentError::NotFound
        ));
    }

    #[tokio::test]
    async fn update_merges_provided_fields_and_embeds_patient() {
        let (svc, patient_id) = service_with_patient().await;
        let created = svc
            .create(draft(patient_id, 1, "Routine checkup"))
            .await
            .unwrap();

        let update = AppointmentUpdate {
            status: Some(AppointmentStatus::Completed),
            ..Default::default()
        };
        let updated = svc.update(created.id, update).await.unwrap();
        assert_eq!(updated.status, AppointmentStatus::Completed);
        assert_eq!(updated.reason, "Routine checkup");
        assert_eq!(updated.patient.as_ref().unwrap().name, "Jo");
    }
}
