//! Shared salon fixture for integration suites.
//!
//! Builds every driving port over one in-memory store holding a 30-minute
//! haircut and two stylists, "Stylist A" ranked ahead of "Stylist B".

use std::sync::Arc;

use mockable::DefaultClock;
use salon_booking::domain::ports::{
    BookingCriteria, CreateBookingRequest, FixtureIntentClassifier, FixtureMessageSender,
};
use salon_booking::domain::{SalonId, Service, ServiceId, Stylist, StylistId};
use salon_booking::inbound::http::state::HttpStatePorts;
use salon_booking::outbound::memory::InMemorySalonStore;
use salon_booking::wiring::{MessagingAdapters, SalonContext, build_http_ports};

pub(crate) const CLIENT_PHONE: &str = "+15551234567";
pub(crate) const BOOKING_DATE: &str = "2024-01-10";

pub(crate) struct Salon {
    pub store: Arc<InMemorySalonStore>,
    pub ports: HttpStatePorts,
    pub haircut: Service,
    pub stylist_a: Stylist,
    pub stylist_b: Stylist,
}

impl Salon {
    pub(crate) fn new() -> Self {
        let salon_id = SalonId::random();
        let haircut = Service::new(ServiceId::random(), salon_id, "Haircut", 30, 2_500)
            .expect("haircut service");
        let stylist_a = Stylist::new(StylistId::random(), salon_id, "Stylist A", 1, Vec::new())
            .expect("stylist A");
        let stylist_b = Stylist::new(StylistId::random(), salon_id, "Stylist B", 2, Vec::new())
            .expect("stylist B");

        let store = Arc::new(InMemorySalonStore::new());
        store.add_service(haircut.clone());
        store.add_stylist(stylist_a.clone());
        store.add_stylist(stylist_b.clone());

        let ports = build_http_ports(
            &store,
            &store,
            &store,
            MessagingAdapters {
                classifier: Arc::new(FixtureIntentClassifier),
                message_log: store.clone(),
                sender: Arc::new(FixtureMessageSender),
            },
            &SalonContext {
                salon_id,
                timezone: chrono_tz::UTC,
                clock: Arc::new(DefaultClock),
            },
        );

        Self {
            store,
            ports,
            haircut,
            stylist_a,
            stylist_b,
        }
    }

    pub(crate) fn stylist_named(&self, name: &str) -> &Stylist {
        [&self.stylist_a, &self.stylist_b]
            .into_iter()
            .find(|stylist| stylist.name() == name)
            .unwrap_or_else(|| panic!("unknown stylist {name}"))
    }

    pub(crate) fn booking_request(
        &self,
        stylist: &Stylist,
        time: &str,
        phone: &str,
    ) -> CreateBookingRequest {
        CreateBookingRequest {
            service_id: self.haircut.id(),
            date: BOOKING_DATE.to_owned(),
            time: time.to_owned(),
            stylist_id: stylist.id(),
            client_name: Some("Maria".to_owned()),
            client_phone: phone.to_owned(),
            correlation_id: None,
        }
    }
}

pub(crate) fn criteria_for(phone: &str) -> BookingCriteria {
    BookingCriteria {
        client_phone: phone.to_owned(),
        client_name: None,
        date: None,
        time: None,
    }
}
