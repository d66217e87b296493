//! Locating a client's existing bookings from loose criteria.
//!
//! Cancellation and rescheduling both start from the client's phone plus any
//! of name, date and time. Criteria are validated before any store access.

use chrono::{NaiveDate, NaiveTime, Timelike};
use chrono_tz::Tz;
use serde_json::json;

use super::ports::{AppointmentRepository, BookingCriteria};
use super::port_errors::map_appointment_error;
use super::{
    Appointment, ClientPhone, Error, local_date_of, local_time_of, parse_local_date,
    parse_local_time,
};

/// Message used when no booking matches the criteria.
pub const NO_MATCH_MESSAGE: &str = "no matching appointment found";

/// Validated [`BookingCriteria`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCriteria {
    pub phone: ClientPhone,
    name: Option<String>,
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
}

impl ParsedCriteria {
    /// Validate raw criteria. Blank optional fields are ignored.
    pub fn parse(criteria: &BookingCriteria) -> Result<Self, Error> {
        let phone = parse_client_phone(&criteria.client_phone)?;
        let name = non_blank(criteria.client_name.as_deref()).map(str::to_lowercase);
        let date = non_blank(criteria.date.as_deref())
            .map(parse_local_date)
            .transpose()?;
        let time = non_blank(criteria.time.as_deref())
            .map(parse_local_time)
            .transpose()?;
        Ok(Self {
            phone,
            name,
            date,
            time,
        })
    }

    /// Whether an appointment satisfies the optional filters.
    pub fn matches(&self, appointment: &Appointment, timezone: Tz) -> bool {
        let name_matches = self.name.as_ref().is_none_or(|needle| {
            appointment.client_name.to_lowercase().contains(needle.as_str())
        });
        let date_matches = self
            .date
            .is_none_or(|date| local_date_of(appointment.start, timezone) == date);
        let time_matches = self.time.is_none_or(|time| {
            let local = local_time_of(appointment.start, timezone);
            local.hour() == time.hour() && local.minute() == time.minute()
        });
        name_matches && date_matches && time_matches
    }
}

/// Parse a client phone into canonical form, as a field validation error.
pub fn parse_client_phone(raw: &str) -> Result<ClientPhone, Error> {
    ClientPhone::parse(raw).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": "clientPhone",
            "code": "invalid_phone",
        }))
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Scheduled appointments matching `criteria`, earliest start first.
///
/// Returns a not-found error when nothing matches.
pub async fn find_matching<A>(
    appointments: &A,
    criteria: &ParsedCriteria,
    timezone: Tz,
) -> Result<Vec<Appointment>, Error>
where
    A: AppointmentRepository + ?Sized,
{
    let mut matches: Vec<Appointment> = appointments
        .list_active_for_phone(&criteria.phone)
        .await
        .map_err(map_appointment_error)?
        .into_iter()
        .filter(|appointment| appointment.status.is_active())
        .filter(|appointment| criteria.matches(appointment, timezone))
        .collect();

    if matches.is_empty() {
        return Err(Error::not_found(NO_MATCH_MESSAGE));
    }
    matches.sort_by_key(|appointment| appointment.start);
    Ok(matches)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ports::MockAppointmentRepository;
    use crate::domain::{
        AppointmentId, AppointmentStatus, ErrorCode, SalonId, ServiceId, StylistId,
    };

    fn appointment_at(day: u32, hour: u32, name: &str) -> Appointment {
        let start = Utc
            .with_ymd_and_hms(2024, 1, day, hour, 0, 0)
            .single()
            .expect("valid fixture timestamp");
        Appointment {
            id: AppointmentId::random(),
            salon_id: SalonId::random(),
            stylist_id: StylistId::random(),
            service_id: ServiceId::random(),
            service_name: "Haircut".to_owned(),
            client_name: name.to_owned(),
            client_phone: ClientPhone::parse("+15551234567").expect("valid phone"),
            start,
            end: start + chrono::Duration::minutes(30),
            status: AppointmentStatus::Scheduled,
            correlation_id: None,
            created_at: start,
        }
    }

    #[fixture]
    fn criteria() -> BookingCriteria {
        BookingCriteria {
            client_phone: "+1 555 123 4567".to_owned(),
            ..BookingCriteria::default()
        }
    }

    #[rstest]
    fn parse_rejects_invalid_phone(mut criteria: BookingCriteria) {
        criteria.client_phone = "abc".to_owned();
        let err = ParsedCriteria::parse(&criteria).expect_err("invalid phone");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    fn parse_ignores_blank_filters(mut criteria: BookingCriteria) {
        criteria.date = Some("  ".to_owned());
        criteria.client_name = Some(String::new());
        let parsed = ParsedCriteria::parse(&criteria).expect("valid criteria");
        assert!(parsed.matches(&appointment_at(10, 10, "Maria"), Tz::UTC));
    }

    #[rstest]
    #[case(Some("mar"), None, None, true)]
    #[case(Some("MARIA"), None, None, true)]
    #[case(Some("Lucia"), None, None, false)]
    #[case(None, Some("2024-01-10"), None, true)]
    #[case(None, Some("2024-01-11"), None, false)]
    #[case(None, Some("2024-01-10"), Some("10:00:00"), true)]
    #[case(None, None, Some("10:30"), false)]
    fn filters_apply_in_salon_time(
        mut criteria: BookingCriteria,
        #[case] name: Option<&str>,
        #[case] date: Option<&str>,
        #[case] time: Option<&str>,
        #[case] expected: bool,
    ) {
        criteria.client_name = name.map(str::to_owned);
        criteria.date = date.map(str::to_owned);
        criteria.time = time.map(str::to_owned);
        let parsed = ParsedCriteria::parse(&criteria).expect("valid criteria");
        assert_eq!(
            parsed.matches(&appointment_at(10, 10, "Maria Lopez"), Tz::UTC),
            expected
        );
    }

    #[rstest]
    #[tokio::test]
    async fn find_matching_sorts_by_start(criteria: BookingCriteria) {
        let later = appointment_at(12, 9, "Maria");
        let earlier = appointment_at(10, 15, "Maria");
        let rows = vec![later.clone(), earlier.clone()];
        let mut repo = MockAppointmentRepository::new();
        repo.expect_list_active_for_phone()
            .times(1)
            .return_once(move |_| Ok(rows));

        let parsed = ParsedCriteria::parse(&criteria).expect("valid criteria");
        let found = find_matching(&repo, &parsed, Tz::UTC)
            .await
            .expect("matches found");

        assert_eq!(found, vec![earlier, later]);
    }

    #[rstest]
    #[tokio::test]
    async fn find_matching_reports_not_found(criteria: BookingCriteria) {
        let mut repo = MockAppointmentRepository::new();
        repo.expect_list_active_for_phone()
            .times(1)
            .return_once(|_| Ok(Vec::new()));

        let parsed = ParsedCriteria::parse(&criteria).expect("valid criteria");
        let err = find_matching(&repo, &parsed, Tz::UTC)
            .await
            .expect_err("nothing matches");

        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), NO_MATCH_MESSAGE);
    }
}
