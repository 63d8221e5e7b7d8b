use std::sync::Arc;

use crate::auth::TokenService;
use crate::database::{AppointmentStore, PatientStore, UserStore};
use crate::services::appointment_service::AppointmentService;
use crate::services::auth_service::AuthService;
use crate::services::patient_service::PatientService;

/// Shared application state: the services plus what the auth middleware
/// needs directly. Everything here is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub patients: PatientService,
    pub appointments: AppointmentService,
    pub users: Arc<dyn UserStore>,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        patients: Arc<dyn PatientStore>,
        appointments: Arc<dyn AppointmentStore>,
        tokens: TokenService,
    ) -> Self {
        Self {
            auth: AuthService::new(users.clone(), tokens.clone()),
            patients: PatientService::new(patients.clone()),
            appointments: AppointmentService::new(appointments, patients),
            users,
            tokens,
        }
    }
}
