//! Port for the calendar projection store.
//!
//! Entries are addressed through their `appointment_id` join key. Like the
//! appointment store, adapters reject overlapping confirmed entries for the
//! same stylist.

use async_trait::async_trait;

use crate::domain::{AppointmentId, CalendarEntry, CalendarEntryStatus, TimeInterval};

use super::define_port_error;

define_port_error! {
    /// Errors raised by calendar entry repository adapters.
    pub enum CalendarEntryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "calendar repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "calendar repository query failed: {message}",
        /// The write would overlap another confirmed entry.
        Conflict { message: String } =>
            "calendar entry overlaps an existing entry: {message}",
    }
}

/// Persistence port for [`CalendarEntry`] rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CalendarEntryRepository: Send + Sync {
    /// Insert a new entry.
    async fn insert(&self, entry: &CalendarEntry) -> Result<(), CalendarEntryRepositoryError>;

    /// Find the entry mirroring an appointment.
    async fn find_by_appointment(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<Option<CalendarEntry>, CalendarEntryRepositoryError>;

    /// Set the status of the entry mirroring an appointment.
    ///
    /// Returns `false` when no entry matched.
    async fn update_status_by_appointment(
        &self,
        appointment_id: &AppointmentId,
        status: CalendarEntryStatus,
    ) -> Result<bool, CalendarEntryRepositoryError>;

    /// Move the entry mirroring an appointment.
    ///
    /// Returns `false` when no entry matched.
    async fn update_interval_by_appointment(
        &self,
        appointment_id: &AppointmentId,
        interval: &TimeInterval,
    ) -> Result<bool, CalendarEntryRepositoryError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn query_error_formats_message() {
        let err = CalendarEntryRepositoryError::query("syntax error");
        assert_eq!(
            err.to_string(),
            "calendar repository query failed: syntax error"
        );
    }
}
