//! Cancellation of bookings located by loose criteria.
//!
//! Every match is canceled. A match whose appointment write fails is reported
//! in the response's `failed` list rather than aborting the rest; the request
//! only fails when no match could be canceled. The calendar projection is
//! updated best-effort: a missing or failing calendar write is logged and the
//! cancellation stands.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono_tz::Tz;
use tracing::{info, warn};

use super::booking_lookup::{ParsedCriteria, find_matching};
use super::port_errors::{map_appointment_error, map_catalogue_error};
use super::ports::{
    AppointmentRepository, CalendarEntryRepository, CancelBookingRequest, CancelBookingResponse,
    CanceledSlot, CancellationCommand, CatalogueRepository,
};
use super::{
    Appointment, AppointmentStatus, CalendarEntryStatus, Error, StylistId, render_local_date,
    render_local_time,
};

/// Label used when a stylist can no longer be found in the catalogue.
pub const UNKNOWN_STYLIST_LABEL: &str = "your stylist";

/// Cancellation resolver implementing [`CancellationCommand`].
#[derive(Clone)]
pub struct CancellationService<C, A, E> {
    catalogue: Arc<C>,
    appointments: Arc<A>,
    calendar: Arc<E>,
    timezone: Tz,
}

impl<C, A, E> CancellationService<C, A, E>
where
    C: CatalogueRepository,
    A: AppointmentRepository,
    E: CalendarEntryRepository,
{
    pub fn new(catalogue: Arc<C>, appointments: Arc<A>, calendar: Arc<E>, timezone: Tz) -> Self {
        Self {
            catalogue,
            appointments,
            calendar,
            timezone,
        }
    }

    async fn stylist_names(
        &self,
        matches: &[Appointment],
    ) -> Result<HashMap<StylistId, String>, Error> {
        let mut names = HashMap::new();
        for appointment in matches {
            if names.contains_key(&appointment.stylist_id) {
                continue;
            }
            let name = self
                .catalogue
                .find_stylist(&appointment.stylist_id)
                .await
                .map_err(map_catalogue_error)?
                .map_or_else(|| UNKNOWN_STYLIST_LABEL.to_owned(), |s| s.name().to_owned());
            names.insert(appointment.stylist_id, name);
        }
        Ok(names)
    }

    async fn cancel_calendar_mirror(&self, appointment: &Appointment) {
        match self
            .calendar
            .update_status_by_appointment(&appointment.id, CalendarEntryStatus::Canceled)
            .await
        {
            Ok(true) => {}
            Ok(false) => warn!(
                appointment_id = %appointment.id,
                "no calendar entry mirrors canceled appointment"
            ),
            Err(err) => warn!(
                appointment_id = %appointment.id,
                error = %err,
                "failed to cancel calendar entry"
            ),
        }
    }
}

#[async_trait]
impl<C, A, E> CancellationCommand for CancellationService<C, A, E>
where
    C: CatalogueRepository,
    A: AppointmentRepository,
    E: CalendarEntryRepository,
{
    async fn cancel_booking(
        &self,
        request: CancelBookingRequest,
    ) -> Result<CancelBookingResponse, Error> {
        let criteria = ParsedCriteria::parse(&request.criteria)?;
        let matches = find_matching(self.appointments.as_ref(), &criteria, self.timezone).await?;
        let names = self.stylist_names(&matches).await?;

        let mut canceled = Vec::with_capacity(matches.len());
        let mut failed = Vec::new();
        let mut first_error = None;
        for appointment in &matches {
            let slot = CanceledSlot {
                appointment_id: appointment.id,
                date: render_local_date(appointment.start, self.timezone),
                time: render_local_time(appointment.start, self.timezone),
                stylist: names
                    .get(&appointment.stylist_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_STYLIST_LABEL.to_owned()),
            };
            if let Err(err) = self
                .appointments
                .update_status(&appointment.id, AppointmentStatus::Canceled)
                .await
            {
                warn!(
                    appointment_id = %appointment.id,
                    error = %err,
                    "failed to cancel appointment"
                );
                first_error.get_or_insert(err);
                failed.push(slot);
                continue;
            }
            self.cancel_calendar_mirror(appointment).await;

            info!(appointment_id = %appointment.id, "appointment canceled");
            canceled.push(slot);
        }

        match first_error {
            Some(err) if canceled.is_empty() => Err(map_appointment_error(err)),
            _ => Ok(CancelBookingResponse { canceled, failed }),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ports::{
        AppointmentRepositoryError, BookingCriteria, CalendarEntryRepositoryError,
        MockAppointmentRepository, MockCalendarEntryRepository, MockCatalogueRepository,
    };
    use crate::domain::service_test_helpers::{CLIENT_PHONE, at, booked, stylist};
    use crate::domain::{ErrorCode, SalonId, Stylist};

    #[fixture]
    fn ana() -> Stylist {
        stylist(SalonId::random(), "Ana", 1)
    }

    fn catalogue_with(stylist: &Stylist) -> MockCatalogueRepository {
        let mut catalogue = MockCatalogueRepository::new();
        let found = stylist.clone();
        catalogue
            .expect_find_stylist()
            .returning(move |_| Ok(Some(found.clone())));
        catalogue
    }

    fn appointments_with(rows: Vec<Appointment>) -> MockAppointmentRepository {
        let mut appointments = MockAppointmentRepository::new();
        appointments
            .expect_list_active_for_phone()
            .returning(move |_| Ok(rows.clone()));
        appointments
    }

    fn request(date: Option<&str>, time: Option<&str>) -> CancelBookingRequest {
        CancelBookingRequest {
            criteria: BookingCriteria {
                client_phone: CLIENT_PHONE.to_owned(),
                client_name: None,
                date: date.map(str::to_owned),
                time: time.map(str::to_owned),
            },
        }
    }

    #[rstest]
    #[tokio::test]
    async fn cancels_every_match_and_its_mirror(ana: Stylist) {
        let rows = vec![booked(&ana, at(10, 0), 30), booked(&ana, at(15, 0), 30)];
        let mut appointments = appointments_with(rows);
        appointments
            .expect_update_status()
            .times(2)
            .withf(|_, status| *status == AppointmentStatus::Canceled)
            .returning(|_, _| Ok(()));
        let mut calendar = MockCalendarEntryRepository::new();
        calendar
            .expect_update_status_by_appointment()
            .times(2)
            .withf(|_, status| *status == CalendarEntryStatus::Canceled)
            .returning(|_, _| Ok(true));

        let service = CancellationService::new(
            Arc::new(catalogue_with(&ana)),
            Arc::new(appointments),
            Arc::new(calendar),
            Tz::UTC,
        );
        let response = service
            .cancel_booking(request(None, None))
            .await
            .expect("cancel succeeds");

        let slots: Vec<(&str, &str, &str)> = response
            .canceled
            .iter()
            .map(|slot| (slot.date.as_str(), slot.time.as_str(), slot.stylist.as_str()))
            .collect();
        assert_eq!(
            slots,
            vec![("2024-01-10", "10:00", "Ana"), ("2024-01-10", "15:00", "Ana")]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn time_filter_narrows_matches(ana: Stylist) {
        let keep = booked(&ana, at(15, 0), 30);
        let rows = vec![booked(&ana, at(10, 0), 30), keep.clone()];
        let mut appointments = appointments_with(rows);
        let kept_id = keep.id;
        appointments
            .expect_update_status()
            .times(1)
            .withf(move |id, _| *id == kept_id)
            .returning(|_, _| Ok(()));
        let mut calendar = MockCalendarEntryRepository::new();
        calendar
            .expect_update_status_by_appointment()
            .returning(|_, _| Ok(true));

        let service = CancellationService::new(
            Arc::new(catalogue_with(&ana)),
            Arc::new(appointments),
            Arc::new(calendar),
            Tz::UTC,
        );
        let response = service
            .cancel_booking(request(Some("2024-01-10"), Some("15:00")))
            .await
            .expect("cancel succeeds");

        assert_eq!(response.canceled.len(), 1);
        assert_eq!(response.canceled[0].appointment_id, kept_id);
    }

    #[rstest]
    #[case(Ok(false))]
    #[case(Err(CalendarEntryRepositoryError::connection("down")))]
    #[tokio::test]
    async fn calendar_miss_does_not_fail_cancellation(
        ana: Stylist,
        #[case] outcome: Result<bool, CalendarEntryRepositoryError>,
    ) {
        let mut appointments = appointments_with(vec![booked(&ana, at(10, 0), 30)]);
        appointments
            .expect_update_status()
            .times(1)
            .returning(|_, _| Ok(()));
        let mut calendar = MockCalendarEntryRepository::new();
        calendar
            .expect_update_status_by_appointment()
            .return_once(move |_, _| outcome);

        let service = CancellationService::new(
            Arc::new(catalogue_with(&ana)),
            Arc::new(appointments),
            Arc::new(calendar),
            Tz::UTC,
        );
        let response = service
            .cancel_booking(request(None, None))
            .await
            .expect("cancel still succeeds");

        assert_eq!(response.canceled.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn failed_write_is_reported_without_undoing_earlier_cancels(ana: Stylist) {
        let first = booked(&ana, at(10, 0), 30);
        let second = booked(&ana, at(15, 0), 30);
        let mut appointments = appointments_with(vec![first.clone(), second.clone()]);
        let second_id = second.id;
        appointments
            .expect_update_status()
            .times(2)
            .returning(move |id, _| {
                if *id == second_id {
                    Err(AppointmentRepositoryError::connection("store went away"))
                } else {
                    Ok(())
                }
            });
        let first_id = first.id;
        let mut calendar = MockCalendarEntryRepository::new();
        calendar
            .expect_update_status_by_appointment()
            .times(1)
            .withf(move |id, _| *id == first_id)
            .returning(|_, _| Ok(true));

        let service = CancellationService::new(
            Arc::new(catalogue_with(&ana)),
            Arc::new(appointments),
            Arc::new(calendar),
            Tz::UTC,
        );
        let response = service
            .cancel_booking(request(None, None))
            .await
            .expect("partial cancellation is reported, not failed");

        let canceled: Vec<_> = response
            .canceled
            .iter()
            .map(|slot| slot.appointment_id)
            .collect();
        let failed: Vec<_> = response
            .failed
            .iter()
            .map(|slot| slot.appointment_id)
            .collect();
        assert_eq!(canceled, vec![first_id]);
        assert_eq!(failed, vec![second_id]);
        assert_eq!(response.failed[0].time, "15:00");
    }

    #[rstest]
    #[tokio::test]
    async fn nothing_canceled_surfaces_the_store_error(ana: Stylist) {
        let mut appointments = appointments_with(vec![booked(&ana, at(10, 0), 30)]);
        appointments
            .expect_update_status()
            .returning(|_, _| Err(AppointmentRepositoryError::connection("down")));
        let mut calendar = MockCalendarEntryRepository::new();
        calendar.expect_update_status_by_appointment().times(0);

        let service = CancellationService::new(
            Arc::new(catalogue_with(&ana)),
            Arc::new(appointments),
            Arc::new(calendar),
            Tz::UTC,
        );
        let err = service
            .cancel_booking(request(None, None))
            .await
            .expect_err("nothing was canceled");

        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }

    #[rstest]
    #[tokio::test]
    async fn no_match_is_not_found(ana: Stylist) {
        let mut appointments = appointments_with(vec![booked(&ana, at(10, 0), 30)]);
        appointments.expect_update_status().times(0);

        let service = CancellationService::new(
            Arc::new(catalogue_with(&ana)),
            Arc::new(appointments),
            Arc::new(MockCalendarEntryRepository::new()),
            Tz::UTC,
        );
        let err = service
            .cancel_booking(request(Some("2024-02-01"), None))
            .await
            .expect_err("nothing matches");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_stylist_uses_placeholder_label(ana: Stylist) {
        let mut catalogue = MockCatalogueRepository::new();
        catalogue.expect_find_stylist().returning(|_| Ok(None));
        let mut appointments = appointments_with(vec![booked(&ana, at(10, 0), 30)]);
        appointments.expect_update_status().returning(|_, _| Ok(()));
        let mut calendar = MockCalendarEntryRepository::new();
        calendar
            .expect_update_status_by_appointment()
            .returning(|_, _| Ok(true));

        let service = CancellationService::new(
            Arc::new(catalogue),
            Arc::new(appointments),
            Arc::new(calendar),
            Tz::UTC,
        );
        let response = service
            .cancel_booking(request(None, None))
            .await
            .expect("cancel succeeds");

        assert_eq!(response.canceled[0].stylist, UNKNOWN_STYLIST_LABEL);
    }
}
