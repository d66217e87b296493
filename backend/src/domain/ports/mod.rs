//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`AvailabilityQuery`, `BookingCommand`, ...) are what inbound
//! adapters call. Driven ports (`AppointmentRepository`, `IntentClassifier`,
//! ...) are what the domain services call. Each driven port exposes a typed
//! error generated by [`define_port_error!`] that services map to the domain
//! [`Error`](crate::domain::Error).

mod macros;
pub(crate) use macros::define_port_error;

mod appointment_repository;
mod availability_query;
mod booking_command;
mod calendar_entry_repository;
mod catalogue_repository;
mod conversation_command;
mod intent_classifier;
mod message_log_repository;
mod message_sender;

#[cfg(test)]
pub use appointment_repository::MockAppointmentRepository;
pub use appointment_repository::{AppointmentRepository, AppointmentRepositoryError};
#[cfg(test)]
pub use availability_query::MockAvailabilityQuery;
pub use availability_query::{
    AlternativeSlot, AvailabilityQuery, AvailabilityResponse, CheckAvailabilityRequest,
};
#[cfg(test)]
pub use booking_command::{MockBookingCommand, MockCancellationCommand, MockRescheduleCommand};
pub use booking_command::{
    BookingCommand, BookingCriteria, CancelBookingRequest, CancelBookingResponse, CanceledSlot,
    CancellationCommand, CreateBookingRequest, CreateBookingResponse, RescheduleBookingRequest,
    RescheduleBookingResponse, RescheduleCommand,
};
#[cfg(test)]
pub use calendar_entry_repository::MockCalendarEntryRepository;
pub use calendar_entry_repository::{CalendarEntryRepository, CalendarEntryRepositoryError};
#[cfg(test)]
pub use catalogue_repository::MockCatalogueRepository;
pub use catalogue_repository::{CatalogueRepository, CatalogueRepositoryError};
#[cfg(test)]
pub use conversation_command::{MockInboundMessageCommand, MockIntentRouting};
pub use conversation_command::{
    InboundMessage, InboundMessageCommand, InboundMessageOutcome, IntentRouting,
    RouteIntentRequest,
};
#[cfg(test)]
pub use intent_classifier::MockIntentClassifier;
pub use intent_classifier::{
    ClassificationContext, FixtureIntentClassifier, IntentClassifier, IntentClassifierError,
};
#[cfg(test)]
pub use message_log_repository::MockMessageLogRepository;
pub use message_log_repository::{MessageLogRepository, MessageLogRepositoryError};
#[cfg(test)]
pub use message_sender::MockMessageSender;
pub use message_sender::{FixtureMessageSender, MessageSender, MessageSenderError};
