//! Booking HTTP handlers.
//!
//! ```text
//! POST /api/v1/bookings
//! POST /api/v1/bookings/cancel
//! POST /api/v1/bookings/reschedule
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{
    BookingCriteria, CancelBookingRequest, CancelBookingResponse, CanceledSlot,
    CreateBookingRequest, CreateBookingResponse, RescheduleBookingRequest,
    RescheduleBookingResponse,
};
use crate::domain::{Appointment, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, require_text};

/// Request payload for creating a booking.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequestBody {
    #[schema(format = "uuid")]
    pub service_id: String,
    #[schema(example = "2024-01-10")]
    pub date: String,
    #[schema(example = "10:00")]
    pub time: String,
    #[schema(format = "uuid")]
    pub stylist_id: String,
    pub client_name: Option<String>,
    #[schema(example = "+15551234567")]
    pub client_phone: String,
    /// Inbound message id, when the booking came from a conversation.
    pub correlation_id: Option<String>,
}

/// Appointment as returned to clients.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub stylist_id: String,
    #[schema(format = "uuid")]
    pub service_id: String,
    pub service_name: String,
    pub client_name: String,
    pub client_phone: String,
    #[schema(format = "date-time")]
    pub start: String,
    #[schema(format = "date-time")]
    pub end: String,
    #[schema(example = "scheduled")]
    pub status: String,
}

/// Response payload for booking creation.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingResponseBody {
    pub appointment: AppointmentBody,
    #[schema(format = "uuid")]
    pub calendar_entry_id: String,
}

/// Request payload for canceling bookings.
///
/// Every scheduled booking for the phone that matches the optional name, date
/// and time is canceled.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingRequestBody {
    pub client_phone: String,
    pub client_name: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
}

/// One canceled slot, in salon-local time.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CanceledSlotBody {
    #[schema(format = "uuid")]
    pub appointment_id: String,
    pub date: String,
    pub time: String,
    pub stylist: String,
}

/// Canceled slots, plus matches whose cancellation could not be written and
/// which remain scheduled.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingResponseBody {
    pub canceled: Vec<CanceledSlotBody>,
    pub failed: Vec<CanceledSlotBody>,
}

/// Request payload for moving the earliest matching booking.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleBookingRequestBody {
    pub client_phone: String,
    pub client_name: Option<String>,
    pub old_date: Option<String>,
    pub old_time: Option<String>,
    #[schema(example = "2024-01-10")]
    pub new_date: String,
    #[schema(example = "14:00")]
    pub new_time: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleBookingResponseBody {
    pub appointment: AppointmentBody,
}

impl From<Appointment> for AppointmentBody {
    fn from(value: Appointment) -> Self {
        Self {
            id: value.id.to_string(),
            stylist_id: value.stylist_id.to_string(),
            service_id: value.service_id.to_string(),
            service_name: value.service_name,
            client_name: value.client_name,
            client_phone: value.client_phone.into(),
            start: value.start.to_rfc3339(),
            end: value.end.to_rfc3339(),
            status: value.status.to_string(),
        }
    }
}

impl From<CreateBookingResponse> for CreateBookingResponseBody {
    fn from(value: CreateBookingResponse) -> Self {
        Self {
            appointment: value.appointment.into(),
            calendar_entry_id: value.calendar_entry_id.to_string(),
        }
    }
}

impl From<CanceledSlot> for CanceledSlotBody {
    fn from(value: CanceledSlot) -> Self {
        Self {
            appointment_id: value.appointment_id.to_string(),
            date: value.date,
            time: value.time,
            stylist: value.stylist,
        }
    }
}

impl From<CancelBookingResponse> for CancelBookingResponseBody {
    fn from(value: CancelBookingResponse) -> Self {
        Self {
            canceled: value.canceled.into_iter().map(Into::into).collect(),
            failed: value.failed.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<RescheduleBookingResponse> for RescheduleBookingResponseBody {
    fn from(value: RescheduleBookingResponse) -> Self {
        Self {
            appointment: value.appointment.into(),
        }
    }
}

fn parse_create_request(payload: CreateBookingRequestBody) -> Result<CreateBookingRequest, Error> {
    Ok(CreateBookingRequest {
        service_id: parse_id(&payload.service_id, FieldName::new("serviceId"))?,
        stylist_id: parse_id(&payload.stylist_id, FieldName::new("stylistId"))?,
        client_phone: require_text(payload.client_phone, FieldName::new("clientPhone"))?,
        date: payload.date,
        time: payload.time,
        client_name: payload.client_name,
        correlation_id: payload.correlation_id,
    })
}

fn parse_cancel_request(payload: CancelBookingRequestBody) -> Result<CancelBookingRequest, Error> {
    Ok(CancelBookingRequest {
        criteria: BookingCriteria {
            client_phone: require_text(payload.client_phone, FieldName::new("clientPhone"))?,
            client_name: payload.client_name,
            date: payload.date,
            time: payload.time,
        },
    })
}

fn parse_reschedule_request(
    payload: RescheduleBookingRequestBody,
) -> Result<RescheduleBookingRequest, Error> {
    Ok(RescheduleBookingRequest {
        criteria: BookingCriteria {
            client_phone: require_text(payload.client_phone, FieldName::new("clientPhone"))?,
            client_name: payload.client_name,
            date: payload.old_date,
            time: payload.old_time,
        },
        new_date: require_text(payload.new_date, FieldName::new("newDate"))?,
        new_time: require_text(payload.new_time, FieldName::new("newTime"))?,
    })
}

/// Book a service with a stylist at a salon-local slot.
///
/// Writes the appointment and its calendar entry; when the calendar write
/// fails the appointment is rolled back.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    request_body = CreateBookingRequestBody,
    responses(
        (status = 200, description = "Booking created", body = CreateBookingResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown service or stylist", body = ErrorSchema),
        (status = 409, description = "Slot already taken", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "createBooking"
)]
#[post("/bookings")]
pub async fn create_booking(
    state: web::Data<HttpState>,
    payload: web::Json<CreateBookingRequestBody>,
) -> ApiResult<web::Json<CreateBookingResponseBody>> {
    let request = parse_create_request(payload.into_inner())?;
    let response = state.bookings.create_booking(request).await?;
    Ok(web::Json(CreateBookingResponseBody::from(response)))
}

/// Cancel every booking for a phone matching the optional name, date and time.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/cancel",
    request_body = CancelBookingRequestBody,
    responses(
        (status = 200, description = "Bookings canceled", body = CancelBookingResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "No matching appointment", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "cancelBooking"
)]
#[post("/bookings/cancel")]
pub async fn cancel_booking(
    state: web::Data<HttpState>,
    payload: web::Json<CancelBookingRequestBody>,
) -> ApiResult<web::Json<CancelBookingResponseBody>> {
    let request = parse_cancel_request(payload.into_inner())?;
    let response = state.cancellations.cancel_booking(request).await?;
    Ok(web::Json(CancelBookingResponseBody::from(response)))
}

/// Move the earliest matching booking to a new slot, keeping its duration.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/reschedule",
    request_body = RescheduleBookingRequestBody,
    responses(
        (status = 200, description = "Booking moved", body = RescheduleBookingResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "No matching appointment", body = ErrorSchema),
        (status = 409, description = "New slot taken or outside working hours; details list nearby alternatives", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "rescheduleBooking"
)]
#[post("/bookings/reschedule")]
pub async fn reschedule_booking(
    state: web::Data<HttpState>,
    payload: web::Json<RescheduleBookingRequestBody>,
) -> ApiResult<web::Json<RescheduleBookingResponseBody>> {
    let request = parse_reschedule_request(payload.into_inner())?;
    let response = state.reschedules.reschedule_booking(request).await?;
    Ok(web::Json(RescheduleBookingResponseBody::from(response)))
}

#[cfg(test)]
#[path = "bookings_tests.rs"]
mod tests;
