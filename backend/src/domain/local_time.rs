//! Salon-local date and time slots.
//!
//! Conversational and HTTP requests carry dates (`YYYY-MM-DD`) and times
//! (`HH:MM` or `HH:MM:SS`) as the salon's wall clock. This module converts
//! them to UTC instants with the configured timezone and renders instants
//! back for replies.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde_json::json;

use super::Error;

/// Parse failures for local slots.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotParseError {
    #[error("date must use YYYY-MM-DD, got {value:?}")]
    InvalidDate { value: String },
    #[error("time must use HH:MM or HH:MM:SS, got {value:?}")]
    InvalidTime { value: String },
    #[error("{date} {time} does not exist in {timezone}")]
    NonexistentLocalTime {
        date: NaiveDate,
        time: NaiveTime,
        timezone: Tz,
    },
    #[error("{date} {time} is ambiguous in {timezone}")]
    AmbiguousLocalTime {
        date: NaiveDate,
        time: NaiveTime,
        timezone: Tz,
    },
}

impl SlotParseError {
    fn field(&self) -> &'static str {
        match self {
            Self::InvalidDate { .. } => "date",
            Self::InvalidTime { .. } => "time",
            Self::NonexistentLocalTime { .. } | Self::AmbiguousLocalTime { .. } => "time",
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::InvalidDate { .. } => "invalid_date",
            Self::InvalidTime { .. } => "invalid_time",
            Self::NonexistentLocalTime { .. } => "nonexistent_local_time",
            Self::AmbiguousLocalTime { .. } => "ambiguous_local_time",
        }
    }
}

impl From<SlotParseError> for Error {
    fn from(value: SlotParseError) -> Self {
        Error::invalid_request(value.to_string()).with_details(json!({
            "field": value.field(),
            "code": value.code(),
        }))
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_local_date(value: &str) -> Result<NaiveDate, SlotParseError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| SlotParseError::InvalidDate {
        value: value.to_owned(),
    })
}

/// Parse an `HH:MM` or `HH:MM:SS` time.
pub fn parse_local_time(value: &str) -> Result<NaiveTime, SlotParseError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| SlotParseError::InvalidTime {
            value: value.to_owned(),
        })
}

/// Resolve a salon-local wall-clock slot to a UTC instant.
pub fn local_to_utc(
    date: NaiveDate,
    time: NaiveTime,
    timezone: Tz,
) -> Result<DateTime<Utc>, SlotParseError> {
    match timezone.from_local_datetime(&NaiveDateTime::new(date, time)) {
        LocalResult::Single(local) => Ok(local.with_timezone(&Utc)),
        LocalResult::None => Err(SlotParseError::NonexistentLocalTime {
            date,
            time,
            timezone,
        }),
        LocalResult::Ambiguous(_, _) => Err(SlotParseError::AmbiguousLocalTime {
            date,
            time,
            timezone,
        }),
    }
}

/// Parse raw date and time strings straight to a UTC instant.
///
/// # Examples
/// ```
/// use chrono_tz::Tz;
/// use salon_booking::domain::parse_local_slot;
///
/// let instant = parse_local_slot("2024-01-10", "10:00", Tz::UTC).expect("valid slot");
/// assert_eq!(instant.to_rfc3339(), "2024-01-10T10:00:00+00:00");
/// ```
pub fn parse_local_slot(date: &str, time: &str, timezone: Tz) -> Result<DateTime<Utc>, SlotParseError> {
    let date = parse_local_date(date)?;
    let time = parse_local_time(time)?;
    local_to_utc(date, time, timezone)
}

/// Render an instant as salon-local `YYYY-MM-DD`.
pub fn render_local_date(instant: DateTime<Utc>, timezone: Tz) -> String {
    instant.with_timezone(&timezone).format("%Y-%m-%d").to_string()
}

/// Render an instant as salon-local `HH:MM`.
pub fn render_local_time(instant: DateTime<Utc>, timezone: Tz) -> String {
    instant.with_timezone(&timezone).format("%H:%M").to_string()
}

/// Salon-local date of an instant.
pub fn local_date_of(instant: DateTime<Utc>, timezone: Tz) -> NaiveDate {
    instant.with_timezone(&timezone).date_naive()
}

/// Salon-local time of an instant.
pub fn local_time_of(instant: DateTime<Utc>, timezone: Tz) -> NaiveTime {
    instant.with_timezone(&timezone).time()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    #[case("10:00")]
    #[case("10:00:00")]
    #[case(" 10:00 ")]
    fn accepts_both_time_formats(#[case] raw: &str) {
        let parsed = parse_local_time(raw).expect("valid time");
        assert_eq!(parsed, NaiveTime::from_hms_opt(10, 0, 0).expect("valid"));
    }

    #[rstest]
    #[case("10am")]
    #[case("25:00")]
    #[case("")]
    fn rejects_malformed_times(#[case] raw: &str) {
        assert!(matches!(
            parse_local_time(raw),
            Err(SlotParseError::InvalidTime { .. })
        ));
    }

    #[rstest]
    #[case("2024-13-01")]
    #[case("10/01/2024")]
    fn rejects_malformed_dates(#[case] raw: &str) {
        assert!(matches!(
            parse_local_date(raw),
            Err(SlotParseError::InvalidDate { .. })
        ));
    }

    #[rstest]
    fn converts_with_salon_timezone() {
        let instant =
            parse_local_slot("2024-07-01", "10:00", chrono_tz::Europe::Madrid).expect("valid slot");
        assert_eq!(instant.to_rfc3339(), "2024-07-01T08:00:00+00:00");
        assert_eq!(render_local_time(instant, chrono_tz::Europe::Madrid), "10:00");
        assert_eq!(render_local_date(instant, chrono_tz::Europe::Madrid), "2024-07-01");
    }

    #[rstest]
    fn spring_forward_gap_is_rejected() {
        let result = parse_local_slot("2024-03-31", "02:30", chrono_tz::Europe::Madrid);
        assert!(matches!(
            result,
            Err(SlotParseError::NonexistentLocalTime { .. })
        ));
    }

    #[rstest]
    fn fall_back_overlap_is_rejected() {
        let result = parse_local_slot("2024-10-27", "02:30", chrono_tz::Europe::Madrid);
        assert!(matches!(
            result,
            Err(SlotParseError::AmbiguousLocalTime { .. })
        ));
    }

    #[rstest]
    fn converts_to_invalid_request_with_field_details() {
        let error: Error = parse_local_date("tomorrow")
            .expect_err("invalid date")
            .into();
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        let details = error.details().expect("details attached");
        assert_eq!(details["field"], "date");
        assert_eq!(details["code"], "invalid_date");
    }
}
