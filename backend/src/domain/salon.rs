//! Salon catalogue entities: bookable services, stylists and their working hours.

use chrono::{Datelike, NaiveTime, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::{SalonId, ServiceId, StylistId, TimeInterval};

/// Validation errors for catalogue entities.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogueValidationError {
    #[error("service name must not be empty")]
    EmptyServiceName,
    #[error("service duration must be positive, got {minutes} minutes")]
    NonPositiveDuration { minutes: i32 },
    #[error("service price must not be negative, got {price}")]
    NegativePrice { price: i64 },
    #[error("stylist name must not be empty")]
    EmptyStylistName,
    #[error("working hours must end after they start ({start} to {end})")]
    InvertedWorkingHours { start: NaiveTime, end: NaiveTime },
}

/// Bookable salon service. Immutable during a booking operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    id: ServiceId,
    salon_id: SalonId,
    name: String,
    duration_minutes: i32,
    price_minor: i64,
}

impl Service {
    pub fn new(
        id: ServiceId,
        salon_id: SalonId,
        name: impl Into<String>,
        duration_minutes: i32,
        price_minor: i64,
    ) -> Result<Self, CatalogueValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CatalogueValidationError::EmptyServiceName);
        }
        if duration_minutes <= 0 {
            return Err(CatalogueValidationError::NonPositiveDuration {
                minutes: duration_minutes,
            });
        }
        if price_minor < 0 {
            return Err(CatalogueValidationError::NegativePrice { price: price_minor });
        }
        Ok(Self {
            id,
            salon_id,
            name,
            duration_minutes,
            price_minor,
        })
    }

    pub fn id(&self) -> ServiceId {
        self.id
    }

    pub fn salon_id(&self) -> SalonId {
        self.salon_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration_minutes(&self) -> i32 {
        self.duration_minutes
    }

    /// Price in minor currency units.
    pub fn price_minor(&self) -> i64 {
        self.price_minor
    }
}

/// Weekly working window for a stylist, expressed in salon-local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingHours {
    weekday: Weekday,
    start: NaiveTime,
    end: NaiveTime,
    is_day_off: bool,
}

impl WorkingHours {
    pub fn new(
        weekday: Weekday,
        start: NaiveTime,
        end: NaiveTime,
        is_day_off: bool,
    ) -> Result<Self, CatalogueValidationError> {
        if !is_day_off && end <= start {
            return Err(CatalogueValidationError::InvertedWorkingHours { start, end });
        }
        Ok(Self {
            weekday,
            start,
            end,
            is_day_off,
        })
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn is_day_off(&self) -> bool {
        self.is_day_off
    }
}

/// Stylist who can be assigned appointments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stylist {
    id: StylistId,
    salon_id: SalonId,
    name: String,
    position: i32,
    working_hours: Vec<WorkingHours>,
}

impl Stylist {
    pub fn new(
        id: StylistId,
        salon_id: SalonId,
        name: impl Into<String>,
        position: i32,
        working_hours: Vec<WorkingHours>,
    ) -> Result<Self, CatalogueValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CatalogueValidationError::EmptyStylistName);
        }
        Ok(Self {
            id,
            salon_id,
            name,
            position,
            working_hours,
        })
    }

    pub fn id(&self) -> StylistId {
        self.id
    }

    pub fn salon_id(&self) -> SalonId {
        self.salon_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Listing position used as the default candidate ranking.
    pub fn position(&self) -> i32 {
        self.position
    }

    pub fn working_hours(&self) -> &[WorkingHours] {
        &self.working_hours
    }

    /// Whether `interval` falls inside this stylist's working window.
    ///
    /// Stylists without configured hours are always working. With hours
    /// configured, the interval must start and end on the same local day, that
    /// weekday must have a row which is not a day off, and the interval must
    /// sit inside it.
    pub fn is_working(&self, interval: &TimeInterval, timezone: Tz) -> bool {
        if self.working_hours.is_empty() {
            return true;
        }

        let local_start = interval.start().with_timezone(&timezone);
        let local_end = interval.end().with_timezone(&timezone);
        if local_start.date_naive() != local_end.date_naive() {
            return false;
        }

        let weekday = local_start.weekday();
        self.working_hours
            .iter()
            .filter(|hours| hours.weekday == weekday)
            .any(|hours| {
                !hours.is_day_off
                    && local_start.time() >= hours.start
                    && local_end.time() <= hours.end
            })
    }
}
