//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every salon endpoint from the inbound layer, the
//! request and response bodies they use and the error schema wrappers that
//! keep domain types free of utoipa derives. Swagger UI serves it in debug
//! builds.

use utoipa::OpenApi;

use crate::domain::{ClassifiedIntent, Intent, RouteOutcome};
use crate::inbound::http::availability::{
    AlternativeSlotBody, AvailabilityRequestBody, AvailabilityResponseBody,
};
use crate::inbound::http::bookings::{
    AppointmentBody, CancelBookingRequestBody, CancelBookingResponseBody, CanceledSlotBody,
    CreateBookingRequestBody, CreateBookingResponseBody, RescheduleBookingRequestBody,
    RescheduleBookingResponseBody,
};
use crate::inbound::http::intents::RouteIntentRequestBody;
use crate::inbound::http::messages::{InboundMessageBody, InboundMessageResponseBody};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Salon booking API",
        description = "Availability checks, booking lifecycle and the conversational booking channel."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::availability::check_availability,
        crate::inbound::http::bookings::create_booking,
        crate::inbound::http::bookings::cancel_booking,
        crate::inbound::http::bookings::reschedule_booking,
        crate::inbound::http::intents::route_intent,
        crate::inbound::http::messages::receive_message,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        AvailabilityRequestBody,
        AvailabilityResponseBody,
        AlternativeSlotBody,
        CreateBookingRequestBody,
        CreateBookingResponseBody,
        AppointmentBody,
        CancelBookingRequestBody,
        CancelBookingResponseBody,
        CanceledSlotBody,
        RescheduleBookingRequestBody,
        RescheduleBookingResponseBody,
        RouteIntentRequestBody,
        ClassifiedIntent,
        Intent,
        RouteOutcome,
        InboundMessageBody,
        InboundMessageResponseBody,
    )),
    tags(
        (name = "availability", description = "Slot availability checks"),
        (name = "bookings", description = "Create, cancel and reschedule bookings"),
        (name = "conversation", description = "Conversational booking channel"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
