//! Availability HTTP handler.
//!
//! ```text
//! POST /api/v1/availability
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::{AlternativeSlot, AvailabilityResponse, CheckAvailabilityRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, parse_optional_id};

/// Request payload for an availability check.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequestBody {
    #[schema(format = "uuid")]
    pub service_id: String,
    /// Salon-local date, `YYYY-MM-DD`.
    #[schema(example = "2024-01-10")]
    pub date: String,
    /// Salon-local time, `HH:MM`.
    #[schema(example = "10:00")]
    pub time: String,
    /// Preferred stylist; omit to accept any stylist.
    #[schema(format = "uuid")]
    pub stylist_id: Option<String>,
}

/// Free slot offered instead of the requested one.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeSlotBody {
    pub date: String,
    pub time: String,
    pub stylist: String,
}

/// Response payload for an availability check.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponseBody {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(format = "uuid")]
    pub stylist_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stylist_name: Option<String>,
    pub alternatives: Vec<AlternativeSlotBody>,
}

impl From<AlternativeSlot> for AlternativeSlotBody {
    fn from(value: AlternativeSlot) -> Self {
        Self {
            date: value.date,
            time: value.time,
            stylist: value.stylist,
        }
    }
}

impl From<AvailabilityResponse> for AvailabilityResponseBody {
    fn from(value: AvailabilityResponse) -> Self {
        Self {
            available: value.available,
            stylist_id: value.stylist_id.map(|id| id.to_string()),
            stylist_name: value.stylist_name,
            alternatives: value
                .alternatives
                .into_iter()
                .map(AlternativeSlotBody::from)
                .collect(),
        }
    }
}

fn parse_availability_request(
    payload: AvailabilityRequestBody,
) -> Result<CheckAvailabilityRequest, Error> {
    Ok(CheckAvailabilityRequest {
        service_id: parse_id(&payload.service_id, FieldName::new("serviceId"))?,
        stylist_id: parse_optional_id(payload.stylist_id.as_deref(), FieldName::new("stylistId"))?,
        date: payload.date,
        time: payload.time,
    })
}

/// Check whether a salon-local slot can be booked, and with whom.
///
/// Read-only: repeated calls against the same bookings return the same answer.
#[utoipa::path(
    post,
    path = "/api/v1/availability",
    request_body = AvailabilityRequestBody,
    responses(
        (status = 200, description = "Availability answer", body = AvailabilityResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown service or stylist", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["availability"],
    operation_id = "checkAvailability"
)]
#[post("/availability")]
pub async fn check_availability(
    state: web::Data<HttpState>,
    payload: web::Json<AvailabilityRequestBody>,
) -> ApiResult<web::Json<AvailabilityResponseBody>> {
    let request = parse_availability_request(payload.into_inner())?;
    let response = state.availability.check_availability(request).await?;
    Ok(web::Json(AvailabilityResponseBody::from(response)))
}

#[cfg(test)]
#[path = "availability_tests.rs"]
mod tests;
