//! Inbound message handling for the messaging channel.
//!
//! One inbound message flows through: audit inbound, classify, route, audit
//! outbound, send. Audit and delivery failures are logged and never block the
//! reply. A classifier or routing failure produces a generic fallback reply.

use std::sync::Arc;

use async_trait::async_trait;
use chrono_tz::Tz;
use mockable::Clock;
use tracing::{info, warn};

use super::intent_router::GENERIC_FAILURE_REPLY;
use super::ports::{
    CatalogueRepository, ClassificationContext, InboundMessage, InboundMessageCommand,
    InboundMessageOutcome, IntentClassifier, IntentRouting, MessageLogRepository, MessageSender,
    RouteIntentRequest,
};
use super::{
    Error, MessageDirection, MessageLogEntry, MessageLogId, RouteOutcome, SalonId, local_date_of,
};

/// Collaborators of the conversation service.
#[derive(Clone)]
pub struct ConversationPorts {
    pub catalogue: Arc<dyn CatalogueRepository>,
    pub classifier: Arc<dyn IntentClassifier>,
    pub router: Arc<dyn IntentRouting>,
    pub message_log: Arc<dyn MessageLogRepository>,
    pub sender: Arc<dyn MessageSender>,
}

/// Conversation service implementing [`InboundMessageCommand`].
#[derive(Clone)]
pub struct ConversationService {
    salon_id: SalonId,
    timezone: Tz,
    clock: Arc<dyn Clock>,
    ports: ConversationPorts,
}

impl ConversationService {
    pub fn new(salon_id: SalonId, timezone: Tz, clock: Arc<dyn Clock>, ports: ConversationPorts) -> Self {
        Self {
            salon_id,
            timezone,
            clock,
            ports,
        }
    }

    async fn audit(&self, phone: &str, direction: MessageDirection, body: &str, external_id: Option<&str>) {
        let entry = MessageLogEntry {
            id: MessageLogId::random(),
            salon_id: self.salon_id,
            phone: phone.to_owned(),
            direction,
            body: body.to_owned(),
            external_id: external_id.map(str::to_owned),
            created_at: self.clock.utc(),
        };
        if let Err(err) = self.ports.message_log.record(&entry).await {
            warn!(%direction, error = %err, "failed to audit message");
        }
    }

    /// Catalogue names offered to the classifier. Lookup failures leave the
    /// lists empty.
    async fn classification_context(&self) -> ClassificationContext {
        let service_names = match self.ports.catalogue.list_services(&self.salon_id).await {
            Ok(services) => services.iter().map(|s| s.name().to_owned()).collect(),
            Err(err) => {
                warn!(error = %err, "failed to load services for classification");
                Vec::new()
            }
        };
        let stylist_names = match self.ports.catalogue.list_stylists(&self.salon_id).await {
            Ok(stylists) => stylists.iter().map(|s| s.name().to_owned()).collect(),
            Err(err) => {
                warn!(error = %err, "failed to load stylists for classification");
                Vec::new()
            }
        };
        ClassificationContext {
            today: local_date_of(self.clock.utc(), self.timezone),
            timezone: self.timezone.name().to_owned(),
            service_names,
            stylist_names,
        }
    }

    async fn classify_and_route(&self, message: &InboundMessage) -> RouteOutcome {
        let context = self.classification_context().await;
        let classified = match self.ports.classifier.classify(&message.text, &context).await {
            Ok(classified) => classified,
            Err(err) => {
                warn!(message_id = %message.message_id, error = %err, "classification failed");
                return RouteOutcome::failed(GENERIC_FAILURE_REPLY);
            }
        };

        let request = RouteIntentRequest {
            classified_intent: classified,
            sender_phone: message.from.clone(),
            message_id: message.message_id.clone(),
        };
        match self.ports.router.route_intent(request).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(message_id = %message.message_id, error = %err, "routing failed");
                RouteOutcome::failed(GENERIC_FAILURE_REPLY)
            }
        }
    }
}

#[async_trait]
impl InboundMessageCommand for ConversationService {
    async fn handle_inbound(
        &self,
        message: InboundMessage,
    ) -> Result<InboundMessageOutcome, Error> {
        if message.from.trim().is_empty() {
            return Err(Error::invalid_request("sender must not be empty"));
        }
        if message.text.trim().is_empty() {
            return Err(Error::invalid_request("message text must not be empty"));
        }

        self.audit(
            &message.from,
            MessageDirection::Inbound,
            &message.text,
            Some(&message.message_id),
        )
        .await;

        let outcome = self.classify_and_route(&message).await;

        self.audit(&message.from, MessageDirection::Outbound, &outcome.message, None)
            .await;

        let delivered = match self.ports.sender.send_text(&message.from, &outcome.message).await {
            Ok(()) => true,
            Err(err) => {
                warn!(message_id = %message.message_id, error = %err, "failed to deliver reply");
                false
            }
        };

        info!(
            message_id = %message.message_id,
            success = outcome.success,
            delivered,
            "inbound message handled"
        );
        Ok(InboundMessageOutcome {
            success: outcome.success,
            reply: outcome.message,
            delivered,
        })
    }
}
