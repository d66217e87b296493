//! Half-open time intervals and the overlap predicate used for conflict checks.
//!
//! Every booking occupies `[start, end)` on a single stylist's timeline. Two
//! bookings that touch at a boundary (one ends at 10:30, the next starts at
//! 10:30) do not conflict.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Duration assumed when a stored interval cannot be used to derive one.
pub const FALLBACK_DURATION_MINUTES: i64 = 60;

/// Validation errors raised by [`TimeInterval::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntervalError {
    #[error("interval end {end} must be after start {start}")]
    EndNotAfterStart {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("interval duration must be positive, got {minutes} minutes")]
    NonPositiveDuration { minutes: i64 },
    #[error("interval end overflows the supported time range")]
    OutOfRange,
}

/// Returns `true` when `[a_start, a_end)` and `[b_start, b_end)` share any instant.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use salon_booking::domain::overlaps;
///
/// let at = |h, m| Utc.with_ymd_and_hms(2024, 1, 10, h, m, 0).unwrap();
/// assert!(overlaps(at(10, 0), at(10, 30), at(10, 15), at(10, 45)));
/// assert!(!overlaps(at(10, 0), at(10, 30), at(10, 30), at(11, 0)));
/// ```
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Move an interval to `new_start` while keeping its length.
///
/// Returns the new end instant.
pub fn shift_preserving_duration(
    original_start: DateTime<Utc>,
    original_end: DateTime<Utc>,
    new_start: DateTime<Utc>,
) -> DateTime<Utc> {
    new_start + (original_end - original_start)
}

/// Non-empty half-open interval `[start, end)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeInterval {
    /// Build an interval, rejecting `end <= start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, IntervalError> {
        if end <= start {
            return Err(IntervalError::EndNotAfterStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// Build an interval from a start instant and a length in minutes.
    pub fn starting_at(start: DateTime<Utc>, minutes: i64) -> Result<Self, IntervalError> {
        if minutes <= 0 {
            return Err(IntervalError::NonPositiveDuration { minutes });
        }
        let end = start
            .checked_add_signed(Duration::minutes(minutes))
            .ok_or(IntervalError::OutOfRange)?;
        Self::new(start, end)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Overlap test against another interval.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        overlaps(self.start, self.end, other.start, other.end)
    }

    /// Same length, new start.
    pub fn shifted_to(&self, new_start: DateTime<Utc>) -> Result<Self, IntervalError> {
        let end = new_start
            .checked_add_signed(self.duration())
            .ok_or(IntervalError::OutOfRange)?;
        Self::new(new_start, end)
    }

    /// Same start, offset by `delta`.
    pub fn offset_by(&self, delta: Duration) -> Result<Self, IntervalError> {
        let start = self
            .start
            .checked_add_signed(delta)
            .ok_or(IntervalError::OutOfRange)?;
        self.shifted_to(start)
    }
}
