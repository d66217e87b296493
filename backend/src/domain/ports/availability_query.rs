//! Driving port for read-only availability checks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, ServiceId, StylistId};

/// Request to check whether a slot can be booked.
///
/// `date` and `time` are salon-local.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAvailabilityRequest {
    pub service_id: ServiceId,
    pub date: String,
    pub time: String,
    pub stylist_id: Option<StylistId>,
}

/// Alternative free slot offered when the preferred stylist is busy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeSlot {
    pub date: String,
    pub time: String,
    /// Stylist display name.
    pub stylist: String,
}

/// Outcome of an availability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub available: bool,
    pub stylist_id: Option<StylistId>,
    pub stylist_name: Option<String>,
    pub alternatives: Vec<AlternativeSlot>,
}

impl AvailabilityResponse {
    pub fn available(stylist_id: StylistId, stylist_name: impl Into<String>) -> Self {
        Self {
            available: true,
            stylist_id: Some(stylist_id),
            stylist_name: Some(stylist_name.into()),
            alternatives: Vec::new(),
        }
    }

    pub fn unavailable(alternatives: Vec<AlternativeSlot>) -> Self {
        Self {
            available: false,
            stylist_id: None,
            stylist_name: None,
            alternatives,
        }
    }
}

/// Driving port answering "is this slot free, and with whom?".
///
/// Implementations must be free of side effects: repeated calls against the
/// same store state return the same answer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AvailabilityQuery: Send + Sync {
    async fn check_availability(
        &self,
        request: CheckAvailabilityRequest,
    ) -> Result<AvailabilityResponse, Error>;
}
