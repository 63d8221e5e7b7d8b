pub mod appointment_service;
pub mod auth_service;
pub mod patient_service;
