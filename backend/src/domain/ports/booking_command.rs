//! Driving ports for booking mutations: create, cancel and reschedule.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Appointment, AppointmentId, CalendarEntryId, Error, ServiceId, StylistId};

/// Request to create a booking for a known stylist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub service_id: ServiceId,
    pub date: String,
    pub time: String,
    pub stylist_id: StylistId,
    pub client_name: Option<String>,
    pub client_phone: String,
    /// Inbound message id, when the booking came from a conversation.
    pub correlation_id: Option<String>,
}

/// Created appointment plus the id of its calendar projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingResponse {
    pub appointment: Appointment,
    pub calendar_entry_id: CalendarEntryId,
}

/// Loose criteria identifying a client's existing booking.
///
/// `date` and `time` are salon-local; `client_name` matches
/// case-insensitively as a substring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCriteria {
    pub client_phone: String,
    pub client_name: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
}

/// Request to cancel every booking matching the criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingRequest {
    #[serde(flatten)]
    pub criteria: BookingCriteria,
}

/// A canceled slot, rendered in salon-local time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanceledSlot {
    pub appointment_id: AppointmentId,
    pub date: String,
    pub time: String,
    /// Stylist display name.
    pub stylist: String,
}

/// Outcome of a cancellation. `failed` lists matches that are still
/// scheduled because their cancellation could not be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingResponse {
    pub canceled: Vec<CanceledSlot>,
    #[serde(default)]
    pub failed: Vec<CanceledSlot>,
}

/// Request to move the earliest booking matching `criteria`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleBookingRequest {
    pub criteria: BookingCriteria,
    pub new_date: String,
    pub new_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleBookingResponse {
    pub appointment: Appointment,
}

/// Driving port creating an appointment and its calendar entry together.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingCommand: Send + Sync {
    async fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> Result<CreateBookingResponse, Error>;
}

/// Driving port canceling bookings located by loose criteria.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CancellationCommand: Send + Sync {
    async fn cancel_booking(
        &self,
        request: CancelBookingRequest,
    ) -> Result<CancelBookingResponse, Error>;
}

/// Driving port moving a booking while preserving its duration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RescheduleCommand: Send + Sync {
    async fn reschedule_booking(
        &self,
        request: RescheduleBookingRequest,
    ) -> Result<RescheduleBookingResponse, Error>;
}
