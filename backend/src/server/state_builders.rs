//! Builders choosing driven adapters for the HTTP state.
//!
//! Diesel repositories back the services when a pool is configured; otherwise
//! an in-memory store seeded with a demo catalogue is used. The classifier and
//! sender fall back to fixtures until their credentials are configured.

use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};
use uuid::Uuid;

use salon_booking::domain::ports::{
    FixtureIntentClassifier, FixtureMessageSender, IntentClassifier, MessageSender,
};
use salon_booking::domain::{SalonId, Service, ServiceId, Stylist, StylistId};
use salon_booking::inbound::http::state::{HttpState, HttpStatePorts};
use salon_booking::outbound::classifier::{ClassifierHttpSettings, OpenAiIntentClassifier};
use salon_booking::outbound::memory::InMemorySalonStore;
use salon_booking::outbound::persistence::{
    DbPool, DieselAppointmentRepository, DieselCalendarEntryRepository, DieselCatalogueRepository,
    DieselMessageLogRepository,
};
use salon_booking::outbound::whatsapp::{WhatsAppCloudSender, WhatsAppSettings};
use salon_booking::wiring::{MessagingAdapters, SalonContext, build_http_ports};

const DEMO_SERVICE_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0001);
const DEMO_STYLIST_A_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_00a1);
const DEMO_STYLIST_B_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_00b1);

/// Adapter configuration taken out of the server configuration.
pub(super) struct AdapterSettings {
    pub db_pool: Option<DbPool>,
    pub classifier: Option<ClassifierHttpSettings>,
    pub whatsapp: Option<WhatsAppSettings>,
    pub context: SalonContext,
}

fn build_classifier(
    settings: Option<ClassifierHttpSettings>,
) -> std::io::Result<Arc<dyn IntentClassifier>> {
    match settings {
        Some(settings) => {
            let classifier = OpenAiIntentClassifier::new(settings)
                .map_err(|err| std::io::Error::other(format!("classifier client: {err}")))?;
            Ok(Arc::new(classifier))
        }
        None => {
            warn!("classifier API key not configured; every message classifies as other");
            Ok(Arc::new(FixtureIntentClassifier))
        }
    }
}

fn build_sender(settings: Option<WhatsAppSettings>) -> std::io::Result<Arc<dyn MessageSender>> {
    match settings {
        Some(settings) => {
            let sender = WhatsAppCloudSender::new(settings)
                .map_err(|err| std::io::Error::other(format!("WhatsApp client: {err}")))?;
            Ok(Arc::new(sender))
        }
        None => {
            warn!("WhatsApp credentials not configured; replies are not delivered");
            Ok(Arc::new(FixtureMessageSender))
        }
    }
}

/// In-memory store holding one 30-minute haircut and two stylists.
fn seeded_memory_store(salon_id: SalonId) -> std::io::Result<Arc<InMemorySalonStore>> {
    let invalid = |err: salon_booking::domain::CatalogueValidationError| {
        std::io::Error::other(format!("demo catalogue: {err}"))
    };
    let store = Arc::new(InMemorySalonStore::new());
    let haircut = Service::new(
        ServiceId::from(DEMO_SERVICE_ID),
        salon_id,
        "Haircut",
        30,
        2_500,
    )
    .map_err(invalid)?;
    info!(service_id = %haircut.id(), "seeded demo service");
    store.add_service(haircut);
    for (id, name, position) in [
        (DEMO_STYLIST_A_ID, "Stylist A", 1),
        (DEMO_STYLIST_B_ID, "Stylist B", 2),
    ] {
        let stylist = Stylist::new(StylistId::from(id), salon_id, name, position, Vec::new())
            .map_err(invalid)?;
        store.add_stylist(stylist);
    }
    Ok(store)
}

fn build_ports(settings: AdapterSettings) -> std::io::Result<HttpStatePorts> {
    let AdapterSettings {
        db_pool,
        classifier,
        whatsapp,
        context,
    } = settings;
    let classifier = build_classifier(classifier)?;
    let sender = build_sender(whatsapp)?;

    let ports = match db_pool {
        Some(pool) => build_http_ports(
            &Arc::new(DieselCatalogueRepository::new(pool.clone())),
            &Arc::new(DieselAppointmentRepository::new(pool.clone())),
            &Arc::new(DieselCalendarEntryRepository::new(pool.clone())),
            MessagingAdapters {
                classifier,
                message_log: Arc::new(DieselMessageLogRepository::new(pool)),
                sender,
            },
            &context,
        ),
        None => {
            warn!("no database configured; bookings are kept in memory");
            let store = seeded_memory_store(context.salon_id)?;
            build_http_ports(
                &store,
                &store,
                &store,
                MessagingAdapters {
                    classifier,
                    message_log: store.clone(),
                    sender,
                },
                &context,
            )
        }
    };
    Ok(ports)
}

/// Build the shared HTTP state from the configured adapters.
pub(super) fn build_http_state(settings: AdapterSettings) -> std::io::Result<web::Data<HttpState>> {
    Ok(web::Data::new(HttpState::new(build_ports(settings)?)))
}
