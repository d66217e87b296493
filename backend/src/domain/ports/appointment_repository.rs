//! Port for the authoritative appointment store.
//!
//! Adapters must reject an insert or interval update that would overlap
//! another scheduled appointment of the same stylist, returning
//! [`AppointmentRepositoryError::Conflict`]. This closes the window between
//! an availability check and the write.

use async_trait::async_trait;

use crate::domain::{
    Appointment, AppointmentId, AppointmentStatus, ClientPhone, StylistId, TimeInterval,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by appointment repository adapters.
    pub enum AppointmentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "appointment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "appointment repository query failed: {message}",
        /// The write would overlap another scheduled appointment.
        Conflict { message: String } =>
            "appointment overlaps an existing booking: {message}",
        /// The targeted appointment does not exist.
        NotFound { id: AppointmentId } =>
            "appointment {id} not found",
    }
}

/// Persistence port for [`Appointment`] records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Insert a new appointment.
    async fn insert(&self, appointment: &Appointment) -> Result<(), AppointmentRepositoryError>;

    /// Hard-delete an appointment. Only used to compensate a failed booking.
    async fn delete(&self, id: &AppointmentId) -> Result<(), AppointmentRepositoryError>;

    /// Scheduled appointments of a stylist that overlap `window`.
    async fn list_active_for_stylist(
        &self,
        stylist_id: &StylistId,
        window: &TimeInterval,
    ) -> Result<Vec<Appointment>, AppointmentRepositoryError>;

    /// Scheduled appointments for a client phone, earliest start first.
    async fn list_active_for_phone(
        &self,
        phone: &ClientPhone,
    ) -> Result<Vec<Appointment>, AppointmentRepositoryError>;

    /// Set the status of an appointment.
    async fn update_status(
        &self,
        id: &AppointmentId,
        status: AppointmentStatus,
    ) -> Result<(), AppointmentRepositoryError>;

    /// Move an appointment in place and return the updated record.
    async fn update_interval(
        &self,
        id: &AppointmentId,
        interval: &TimeInterval,
    ) -> Result<Appointment, AppointmentRepositoryError>;
}
