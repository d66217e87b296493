//! Classified conversational intents and routing outcomes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Operation requested by a conversational message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Booking,
    Cancellation,
    Rescheduling,
    #[default]
    #[serde(other)]
    Other,
}

/// Structured classifier output.
///
/// Slot values are raw strings as extracted from the message. Service and
/// stylist are names; date and time are salon-local.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ClassifiedIntent {
    pub intent: Intent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stylist: Option<String>,
    #[serde(default, alias = "clientName", skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, alias = "oldDate", skip_serializing_if = "Option::is_none")]
    pub old_date: Option<String>,
    #[serde(default, alias = "oldTime", skip_serializing_if = "Option::is_none")]
    pub old_time: Option<String>,
    /// Free-text reply suggested by the classifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ClassifiedIntent {
    /// Classification used when the classifier cannot be reached.
    pub fn other(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Trim a slot and drop it when blank.
pub(crate) fn present(slot: &Option<String>) -> Option<&str> {
    slot.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

/// Result of routing a classified intent: whether the operation succeeded and
/// the reply text for the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteOutcome {
    pub success: bool,
    pub message: String,
}

impl RouteOutcome {
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
