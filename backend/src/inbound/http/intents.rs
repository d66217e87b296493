//! Intent routing HTTP handler.
//!
//! ```text
//! POST /api/v1/intents/route
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::RouteIntentRequest;
use crate::domain::{ClassifiedIntent, Error, RouteOutcome};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require_text};

/// Request payload carrying an already-classified message.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteIntentRequestBody {
    pub classified_intent: ClassifiedIntent,
    #[schema(example = "15551234567")]
    pub sender_phone: String,
    pub message_id: String,
}

fn parse_route_request(payload: RouteIntentRequestBody) -> Result<RouteIntentRequest, Error> {
    Ok(RouteIntentRequest {
        classified_intent: payload.classified_intent,
        sender_phone: require_text(payload.sender_phone, FieldName::new("senderPhone"))?,
        message_id: require_text(payload.message_id, FieldName::new("messageId"))?,
    })
}

/// Dispatch a classified intent to availability, booking, cancellation or
/// rescheduling and return the reply for the client.
///
/// Domain failures such as a taken slot are reported as `success: false` with
/// a client-facing message rather than as HTTP errors.
#[utoipa::path(
    post,
    path = "/api/v1/intents/route",
    request_body = RouteIntentRequestBody,
    responses(
        (status = 200, description = "Routing outcome", body = RouteOutcome),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["conversation"],
    operation_id = "routeIntent"
)]
#[post("/intents/route")]
pub async fn route_intent(
    state: web::Data<HttpState>,
    payload: web::Json<RouteIntentRequestBody>,
) -> ApiResult<web::Json<RouteOutcome>> {
    let request = parse_route_request(payload.into_inner())?;
    let outcome = state.intents.route_intent(request).await?;
    Ok(web::Json(outcome))
}
