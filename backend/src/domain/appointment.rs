//! Appointment records and their calendar projection.
//!
//! The [`Appointment`] is authoritative. The [`CalendarEntry`] is a display
//! projection of the same booking, joined by `appointment_id`. Both are
//! created, canceled and moved together by the booking services.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{
    AppointmentId, CalendarEntryId, ClientPhone, FALLBACK_DURATION_MINUTES, IntervalError,
    SalonId, ServiceId, StylistId, TimeInterval,
};

/// Placeholder client name used when a booking omits one.
pub const DEFAULT_CLIENT_NAME: &str = "Client";

/// Error returned when parsing an unknown status label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status: {0}")]
pub struct UnknownStatus(pub String);

/// Lifecycle of the authoritative appointment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Canceled,
    /// Legacy marker; rescheduled rows stay `Scheduled`. Treated as inactive.
    Rescheduled,
}

impl AppointmentStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Canceled => "canceled",
            Self::Rescheduled => "rescheduled",
        }
    }

    /// Whether the appointment still occupies its stylist's time.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Scheduled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "canceled" | "cancelled" => Ok(Self::Canceled),
            "rescheduled" => Ok(Self::Rescheduled),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

/// Lifecycle of the calendar projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarEntryStatus {
    Confirmed,
    Canceled,
}

impl CalendarEntryStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Canceled => "canceled",
        }
    }
}

impl fmt::Display for CalendarEntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalendarEntryStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(Self::Confirmed),
            "canceled" | "cancelled" => Ok(Self::Canceled),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

/// Authoritative booking record.
///
/// `start` and `end` are kept as stored so rows with an unusable interval can
/// still be loaded and rescheduled with the fallback duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: AppointmentId,
    pub salon_id: SalonId,
    pub stylist_id: StylistId,
    pub service_id: ServiceId,
    pub service_name: String,
    pub client_name: String,
    pub client_phone: ClientPhone,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: AppointmentStatus,
    /// Inbound message id that produced this booking, when conversational.
    pub correlation_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// The occupied interval, if the stored bounds form one.
    pub fn interval(&self) -> Result<TimeInterval, IntervalError> {
        TimeInterval::new(self.start, self.end)
    }

    /// Stored duration, or the fallback when the stored interval is unusable.
    pub fn duration_or_fallback(&self) -> Duration {
        self.interval()
            .map(|interval| interval.duration())
            .unwrap_or_else(|_| Duration::minutes(FALLBACK_DURATION_MINUTES))
    }

    /// Whether this appointment blocks `candidate` on its stylist's timeline.
    pub fn blocks(&self, candidate: &TimeInterval) -> bool {
        self.status.is_active() && super::overlaps(self.start, self.end, candidate.start(), candidate.end())
    }
}

/// Display projection of an appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntry {
    pub id: CalendarEntryId,
    pub appointment_id: AppointmentId,
    pub salon_id: SalonId,
    pub stylist_id: StylistId,
    pub title: String,
    pub client_name: String,
    pub service_name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: CalendarEntryStatus,
}

impl CalendarEntry {
    /// Build the confirmed projection of a freshly created appointment.
    pub fn mirror(id: CalendarEntryId, appointment: &Appointment) -> Self {
        Self {
            id,
            appointment_id: appointment.id,
            salon_id: appointment.salon_id,
            stylist_id: appointment.stylist_id,
            title: format!("{} - {}", appointment.service_name, appointment.client_name),
            client_name: appointment.client_name.clone(),
            service_name: appointment.service_name.clone(),
            start: appointment.start,
            end: appointment.end,
            status: CalendarEntryStatus::Confirmed,
        }
    }
}
