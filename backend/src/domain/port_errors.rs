//! Mapping from driven port errors to domain errors.

use serde_json::json;

use super::Error;
use super::ports::{
    AlternativeSlot, AppointmentRepositoryError, CalendarEntryRepositoryError,
    CatalogueRepositoryError,
};

/// Message returned when a slot is taken.
pub const SLOT_TAKEN_MESSAGE: &str = "the requested time is not available";

/// Conflict error for a taken slot. Callers may retry with another time.
pub fn slot_taken() -> Error {
    Error::conflict(SLOT_TAKEN_MESSAGE).with_details(json!({ "retryable": true }))
}

/// Conflict error for a taken slot, listing free slots found nearby.
pub fn slot_taken_with(alternatives: &[AlternativeSlot]) -> Error {
    if alternatives.is_empty() {
        return slot_taken();
    }
    Error::conflict(SLOT_TAKEN_MESSAGE).with_details(json!({
        "retryable": true,
        "alternatives": alternatives,
    }))
}

/// Alternatives carried in a conflict's details, if any.
pub fn conflict_alternatives(error: &Error) -> Vec<AlternativeSlot> {
    error
        .details()
        .and_then(|details| details.get("alternatives"))
        .and_then(|value| serde_json::from_value(value.clone()).ok())
        .unwrap_or_default()
}

pub fn map_catalogue_error(error: CatalogueRepositoryError) -> Error {
    match error {
        CatalogueRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("catalogue repository unavailable: {message}"))
        }
        CatalogueRepositoryError::Query { message } => {
            Error::internal(format!("catalogue repository error: {message}"))
        }
    }
}

pub fn map_appointment_error(error: AppointmentRepositoryError) -> Error {
    match error {
        AppointmentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("appointment repository unavailable: {message}"))
        }
        AppointmentRepositoryError::Query { message } => {
            Error::internal(format!("appointment repository error: {message}"))
        }
        AppointmentRepositoryError::Conflict { message } => {
            tracing::debug!(%message, "appointment write rejected as overlapping");
            slot_taken()
        }
        AppointmentRepositoryError::NotFound { id } => {
            Error::not_found(format!("appointment {id} not found"))
        }
    }
}

pub fn map_calendar_error(error: CalendarEntryRepositoryError) -> Error {
    match error {
        CalendarEntryRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("calendar repository unavailable: {message}"))
        }
        CalendarEntryRepositoryError::Query { message } => {
            Error::internal(format!("calendar repository error: {message}"))
        }
        CalendarEntryRepositoryError::Conflict { message } => {
            tracing::debug!(%message, "calendar write rejected as overlapping");
            slot_taken()
        }
    }
}
