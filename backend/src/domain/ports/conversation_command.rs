//! Driving ports for the conversational channel.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{ClassifiedIntent, Error, RouteOutcome};

/// Already-classified intent to dispatch on behalf of a sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteIntentRequest {
    pub classified_intent: ClassifiedIntent,
    pub sender_phone: String,
    pub message_id: String,
}

/// Raw inbound message from the messaging channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessage {
    pub from: String,
    pub message_id: String,
    pub text: String,
}

/// Reply produced for an inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessageOutcome {
    pub success: bool,
    pub reply: String,
    /// Whether the reply reached the messaging provider.
    pub delivered: bool,
}

/// Driving port mapping a classified intent onto a booking operation.
///
/// Never fails for domain reasons: those are rendered into the outcome's
/// message. Errors are reserved for requests that cannot be routed at all.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IntentRouting: Send + Sync {
    async fn route_intent(&self, request: RouteIntentRequest) -> Result<RouteOutcome, Error>;
}

/// Driving port running classify, route and reply for one inbound message.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InboundMessageCommand: Send + Sync {
    async fn handle_inbound(&self, message: InboundMessage)
    -> Result<InboundMessageOutcome, Error>;
}
