//! Booking creation with a compensating rollback.
//!
//! A booking is two writes: the authoritative appointment, then its calendar
//! projection. When the second write fails the first is deleted so no
//! appointment exists without a calendar entry.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info, warn};

use super::booking_lookup::parse_client_phone;
use super::port_errors::{map_appointment_error, map_calendar_error, map_catalogue_error};
use super::ports::{
    AppointmentRepository, BookingCommand, CalendarEntryRepository, CatalogueRepository,
    CreateBookingRequest, CreateBookingResponse,
};
use super::{
    Appointment, AppointmentId, AppointmentStatus, CalendarEntry, CalendarEntryId,
    DEFAULT_CLIENT_NAME, Error, TimeInterval, parse_local_slot,
};

/// Booking writer implementing [`BookingCommand`].
#[derive(Clone)]
pub struct BookingService<C, A, E> {
    catalogue: Arc<C>,
    appointments: Arc<A>,
    calendar: Arc<E>,
    clock: Arc<dyn Clock>,
    timezone: chrono_tz::Tz,
}

impl<C, A, E> BookingService<C, A, E> {
    pub fn new(
        catalogue: Arc<C>,
        appointments: Arc<A>,
        calendar: Arc<E>,
        clock: Arc<dyn Clock>,
        timezone: chrono_tz::Tz,
    ) -> Self {
        Self {
            catalogue,
            appointments,
            calendar,
            clock,
            timezone,
        }
    }
}

impl<C, A, E> BookingService<C, A, E>
where
    A: AppointmentRepository,
{
    /// Undo step one after step two failed. A failed undo is logged only.
    async fn compensate(&self, appointment_id: &AppointmentId) {
        match self.appointments.delete(appointment_id).await {
            Ok(()) => warn!(
                appointment_id = %appointment_id,
                "calendar write failed; appointment rolled back"
            ),
            Err(err) => error!(
                appointment_id = %appointment_id,
                error = %err,
                "calendar write failed and appointment rollback failed"
            ),
        }
    }
}

fn client_name_or_default(name: Option<&str>) -> String {
    name.map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_CLIENT_NAME)
        .to_owned()
}

#[async_trait]
impl<C, A, E> BookingCommand for BookingService<C, A, E>
where
    C: CatalogueRepository,
    A: AppointmentRepository,
    E: CalendarEntryRepository,
{
    async fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> Result<CreateBookingResponse, Error> {
        let start = parse_local_slot(&request.date, &request.time, self.timezone)?;
        let client_phone = parse_client_phone(&request.client_phone)?;

        let service = self
            .catalogue
            .find_service(&request.service_id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| Error::not_found(format!("service {} not found", request.service_id)))?;
        let stylist = self
            .catalogue
            .find_stylist(&request.stylist_id)
            .await
            .map_err(map_catalogue_error)?
            .filter(|stylist| stylist.salon_id() == service.salon_id())
            .ok_or_else(|| {
                Error::not_found(format!(
                    "stylist {} not found for service {}",
                    request.stylist_id,
                    service.id()
                ))
            })?;
        let interval = TimeInterval::starting_at(start, i64::from(service.duration_minutes()))
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        let appointment = Appointment {
            id: AppointmentId::random(),
            salon_id: service.salon_id(),
            stylist_id: stylist.id(),
            service_id: service.id(),
            service_name: service.name().to_owned(),
            client_name: client_name_or_default(request.client_name.as_deref()),
            client_phone,
            start: interval.start(),
            end: interval.end(),
            status: AppointmentStatus::Scheduled,
            correlation_id: request.correlation_id,
            created_at: self.clock.utc(),
        };

        self.appointments
            .insert(&appointment)
            .await
            .map_err(map_appointment_error)?;

        let entry = CalendarEntry::mirror(CalendarEntryId::random(), &appointment);
        if let Err(err) = self.calendar.insert(&entry).await {
            self.compensate(&appointment.id).await;
            return Err(map_calendar_error(err));
        }

        info!(
            appointment_id = %appointment.id,
            calendar_entry_id = %entry.id,
            stylist_id = %appointment.stylist_id,
            start = %appointment.start,
            "booking created"
        );

        Ok(CreateBookingResponse {
            appointment,
            calendar_entry_id: entry.id,
        })
    }
}

#[cfg(test)]
#[path = "booking_service_tests.rs"]
mod tests;
