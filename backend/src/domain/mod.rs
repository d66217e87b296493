//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed salon scheduling entities and the services
//! that check availability and create, cancel and reschedule bookings. Types
//! document their invariants and serialisation contracts in Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic error payload.
//! - TimeInterval, overlaps, shift_preserving_duration: interval model.
//! - Service, Stylist, WorkingHours: catalogue.
//! - Appointment, CalendarEntry: the two persisted booking views.
//! - ClassifiedIntent, RouteOutcome: conversational routing.
//! - AvailabilityService, BookingService, CancellationService,
//!   RescheduleService, IntentRouterService, ConversationService: driving
//!   port implementations.

pub mod appointment;
pub mod availability_service;
pub(crate) mod booking_lookup;
pub mod booking_service;
pub mod cancellation_service;
pub mod conversation_service;
pub mod error;
pub mod ids;
pub mod intent;
pub mod intent_router;
pub mod interval;
pub mod local_time;
pub mod message_log;
pub mod phone;
pub(crate) mod port_errors;
pub mod ports;
pub mod reschedule_service;
pub mod salon;
#[cfg(test)]
pub(crate) mod service_test_helpers;
pub mod trace_id;

pub use self::appointment::{
    Appointment, AppointmentStatus, CalendarEntry, CalendarEntryStatus, DEFAULT_CLIENT_NAME,
    UnknownStatus,
};
pub use self::availability_service::AvailabilityService;
pub use self::booking_service::BookingService;
pub use self::cancellation_service::CancellationService;
pub use self::conversation_service::{ConversationPorts, ConversationService};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{
    AppointmentId, CalendarEntryId, MessageLogId, SalonId, ServiceId, StylistId,
};
pub use self::intent::{ClassifiedIntent, Intent, RouteOutcome};
pub use self::intent_router::{
    DEFAULT_OTHER_REPLY, GENERIC_FAILURE_REPLY, IntentRouterPorts, IntentRouterService,
};
pub use self::interval::{
    FALLBACK_DURATION_MINUTES, IntervalError, TimeInterval, overlaps, shift_preserving_duration,
};
pub use self::local_time::{
    SlotParseError, local_date_of, local_time_of, local_to_utc, parse_local_date,
    parse_local_slot, parse_local_time, render_local_date, render_local_time,
};
pub use self::message_log::{MessageDirection, MessageLogEntry};
pub use self::phone::{ClientPhone, PhoneValidationError};
pub use self::reschedule_service::RescheduleService;
pub use self::salon::{CatalogueValidationError, Service, Stylist, WorkingHours};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use salon_booking::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::not_found("no matching appointment found"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
