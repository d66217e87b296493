//! Composition of the salon services over a set of driven adapters.
//!
//! The binary chooses adapters (Diesel or in-memory store, HTTP or fixture
//! classifier and sender) and hands them here; integration tests do the same
//! with the in-memory store.

use std::sync::Arc;

use chrono_tz::Tz;
use mockable::Clock;

use crate::domain::ports::{
    AppointmentRepository, CalendarEntryRepository, CatalogueRepository, IntentClassifier,
    MessageLogRepository, MessageSender,
};
use crate::domain::{
    AvailabilityService, BookingService, CancellationService, ConversationPorts,
    ConversationService, IntentRouterPorts, IntentRouterService, RescheduleService, SalonId,
};
use crate::inbound::http::state::HttpStatePorts;

/// Salon served by the messaging channel and its wall clock.
#[derive(Clone)]
pub struct SalonContext {
    pub salon_id: SalonId,
    pub timezone: Tz,
    pub clock: Arc<dyn Clock>,
}

/// Collaborators of the conversational channel.
#[derive(Clone)]
pub struct MessagingAdapters {
    pub classifier: Arc<dyn IntentClassifier>,
    pub message_log: Arc<dyn MessageLogRepository>,
    pub sender: Arc<dyn MessageSender>,
}

/// Build every driving port the HTTP adapter exposes.
pub fn build_http_ports<C, A, E>(
    catalogue: &Arc<C>,
    appointments: &Arc<A>,
    calendar: &Arc<E>,
    messaging: MessagingAdapters,
    context: &SalonContext,
) -> HttpStatePorts
where
    C: CatalogueRepository + 'static,
    A: AppointmentRepository + 'static,
    E: CalendarEntryRepository + 'static,
{
    let timezone = context.timezone;
    let availability = Arc::new(AvailabilityService::new(
        Arc::clone(catalogue),
        Arc::clone(appointments),
        timezone,
    ));
    let bookings = Arc::new(BookingService::new(
        Arc::clone(catalogue),
        Arc::clone(appointments),
        Arc::clone(calendar),
        Arc::clone(&context.clock),
        timezone,
    ));
    let cancellations = Arc::new(CancellationService::new(
        Arc::clone(catalogue),
        Arc::clone(appointments),
        Arc::clone(calendar),
        timezone,
    ));
    let reschedules = Arc::new(RescheduleService::new(
        Arc::clone(catalogue),
        Arc::clone(appointments),
        Arc::clone(calendar),
        timezone,
    ));

    let catalogue_port: Arc<dyn CatalogueRepository> = Arc::clone(catalogue) as _;
    let router = Arc::new(IntentRouterService::new(
        context.salon_id,
        timezone,
        IntentRouterPorts {
            catalogue: Arc::clone(&catalogue_port),
            availability: availability.clone(),
            bookings: bookings.clone(),
            cancellations: cancellations.clone(),
            reschedules: reschedules.clone(),
        },
    ));
    let conversation = Arc::new(ConversationService::new(
        context.salon_id,
        timezone,
        Arc::clone(&context.clock),
        ConversationPorts {
            catalogue: catalogue_port,
            classifier: messaging.classifier,
            router: router.clone(),
            message_log: messaging.message_log,
            sender: messaging.sender,
        },
    ));

    HttpStatePorts {
        availability,
        bookings,
        cancellations,
        reschedules,
        intents: router,
        messages: conversation,
    }
}
