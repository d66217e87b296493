//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::{App, web};
use mockable::DefaultClock;

use crate::Trace;
use crate::domain::ports::{FixtureIntentClassifier, FixtureMessageSender};
use crate::domain::{SalonId, Service, ServiceId, Stylist, StylistId};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemorySalonStore;
use crate::wiring::{MessagingAdapters, SalonContext, build_http_ports};

pub(crate) const CLIENT_PHONE: &str = "+15551234567";

/// A salon with one 30-minute service and two stylists over an in-memory store.
pub(crate) struct SalonHarness {
    pub store: Arc<InMemorySalonStore>,
    pub salon_id: SalonId,
    pub haircut: Service,
    pub ana: Stylist,
}

impl SalonHarness {
    pub fn new() -> Self {
        let salon_id = SalonId::random();
        let haircut =
            Service::new(ServiceId::random(), salon_id, "Haircut", 30, 2_500).expect("service");
        let ana = Stylist::new(StylistId::random(), salon_id, "Ana", 1, Vec::new()).expect("ana");
        let bea = Stylist::new(StylistId::random(), salon_id, "Bea", 2, Vec::new()).expect("bea");
        let store = Arc::new(InMemorySalonStore::new());
        store.add_service(haircut.clone());
        store.add_stylist(ana.clone());
        store.add_stylist(bea);
        Self {
            store,
            salon_id,
            haircut,
            ana,
        }
    }

    /// Fixture classifier and sender, with the store as message log.
    pub fn fixture_messaging(&self) -> MessagingAdapters {
        MessagingAdapters {
            classifier: Arc::new(FixtureIntentClassifier),
            message_log: self.store.clone(),
            sender: Arc::new(FixtureMessageSender),
        }
    }

    pub fn state_with(&self, messaging: MessagingAdapters) -> HttpState {
        let context = SalonContext {
            salon_id: self.salon_id,
            timezone: chrono_tz::UTC,
            clock: Arc::new(DefaultClock),
        };
        HttpState::new(build_http_ports(
            &self.store,
            &self.store,
            &self.store,
            messaging,
            &context,
        ))
    }

    pub fn state(&self) -> HttpState {
        self.state_with(self.fixture_messaging())
    }
}

/// Application with every salon endpoint mounted under `/api/v1`.
pub(crate) fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .service(
            web::scope("/api/v1")
                .service(crate::inbound::http::availability::check_availability)
                .service(crate::inbound::http::bookings::create_booking)
                .service(crate::inbound::http::bookings::cancel_booking)
                .service(crate::inbound::http::bookings::reschedule_booking)
                .service(crate::inbound::http::intents::route_intent)
                .service(crate::inbound::http::messages::receive_message),
        )
}
