//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AvailabilityQuery, BookingCommand, CancellationCommand, InboundMessageCommand, IntentRouting,
    RescheduleCommand,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub availability: Arc<dyn AvailabilityQuery>,
    pub bookings: Arc<dyn BookingCommand>,
    pub cancellations: Arc<dyn CancellationCommand>,
    pub reschedules: Arc<dyn RescheduleCommand>,
    pub intents: Arc<dyn IntentRouting>,
    pub messages: Arc<dyn InboundMessageCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub availability: Arc<dyn AvailabilityQuery>,
    pub bookings: Arc<dyn BookingCommand>,
    pub cancellations: Arc<dyn CancellationCommand>,
    pub reschedules: Arc<dyn RescheduleCommand>,
    pub intents: Arc<dyn IntentRouting>,
    pub messages: Arc<dyn InboundMessageCommand>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            availability,
            bookings,
            cancellations,
            reschedules,
            intents,
            messages,
        } = ports;
        Self {
            availability,
            bookings,
            cancellations,
            reschedules,
            intents,
            messages,
        }
    }
}
