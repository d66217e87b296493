//! Moving an existing booking to a new start while keeping its duration.
//!
//! The target slot must lie inside the stylist's working hours and clear the
//! stylist's other bookings. A rejected move carries up to three same-stylist
//! alternatives, tried an hour apart.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use chrono_tz::Tz;
use tracing::{info, warn};

use super::availability_service::ALTERNATIVE_OFFSETS_HOURS;
use super::booking_lookup::{ParsedCriteria, find_matching};
use super::port_errors::{map_appointment_error, map_catalogue_error, slot_taken_with};
use super::ports::{
    AlternativeSlot, AppointmentRepository, CalendarEntryRepository, CatalogueRepository,
    RescheduleBookingRequest, RescheduleBookingResponse, RescheduleCommand,
};
use super::{
    Appointment, Error, Stylist, TimeInterval, parse_local_slot, render_local_date,
    render_local_time,
};

/// Reschedule resolver implementing [`RescheduleCommand`].
#[derive(Clone)]
pub struct RescheduleService<C, A, E> {
    catalogue: Arc<C>,
    appointments: Arc<A>,
    calendar: Arc<E>,
    timezone: Tz,
}

impl<C, A, E> RescheduleService<C, A, E>
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

    /// Whether `target` is inside the stylist's hours and clear of every
    /// other scheduled appointment. A stylist missing from the catalogue has
    /// no hours to enforce.
    async fn is_free_excluding(
        &self,
        moved: &Appointment,
        stylist: Option<&Stylist>,
        target: &TimeInterval,
    ) -> Result<bool, Error> {
        if stylist.is_some_and(|stylist| !stylist.is_working(target, self.timezone)) {
            return Ok(false);
        }
        let booked = self
            .appointments
            .list_active_for_stylist(&moved.stylist_id, target)
            .await
            .map_err(map_appointment_error)?;
        Ok(!booked
            .iter()
            .filter(|other| other.id != moved.id)
            .any(|other| other.blocks(target)))
    }

    async fn alternatives_for(
        &self,
        moved: &Appointment,
        stylist: Option<&Stylist>,
        target: &TimeInterval,
    ) -> Result<Vec<AlternativeSlot>, Error> {
        let label = stylist.map_or(super::cancellation_service::UNKNOWN_STYLIST_LABEL, |s| {
            s.name()
        });
        let mut alternatives = Vec::with_capacity(ALTERNATIVE_OFFSETS_HOURS.len());
        for hours in ALTERNATIVE_OFFSETS_HOURS {
            let Ok(slot) = target.offset_by(Duration::hours(hours)) else {
                continue;
            };
            if self.is_free_excluding(moved, stylist, &slot).await? {
                alternatives.push(AlternativeSlot {
                    date: render_local_date(slot.start(), self.timezone),
                    time: render_local_time(slot.start(), self.timezone),
                    stylist: label.to_owned(),
                });
            }
        }
        Ok(alternatives)
    }

    async fn ensure_free(&self, moved: &Appointment, target: &TimeInterval) -> Result<(), Error> {
        let stylist = self
            .catalogue
            .find_stylist(&moved.stylist_id)
            .await
            .map_err(map_catalogue_error)?;
        if self
            .is_free_excluding(moved, stylist.as_ref(), target)
            .await?
        {
            return Ok(());
        }
        let alternatives = self
            .alternatives_for(moved, stylist.as_ref(), target)
            .await?;
        Err(slot_taken_with(&alternatives))
    }

    async fn move_calendar_mirror(&self, appointment: &Appointment, target: &TimeInterval) {
        match self
            .calendar
            .update_interval_by_appointment(&appointment.id, target)
            .await
        {
            Ok(true) => {}
            Ok(false) => warn!(
                appointment_id = %appointment.id,
                "no calendar entry mirrors rescheduled appointment"
            ),
            Err(err) => warn!(
                appointment_id = %appointment.id,
                error = %err,
                "failed to move calendar entry"
            ),
        }
    }
}

/// New interval at `new_start` with the stored duration, or the fallback
/// duration when the stored interval is unusable.
fn target_interval(
    appointment: &Appointment,
    new_start: chrono::DateTime<chrono::Utc>,
) -> Result<TimeInterval, Error> {
    let duration: Duration = appointment.duration_or_fallback();
    let end = new_start
        .checked_add_signed(duration)
        .ok_or_else(|| Error::invalid_request("new time is out of range"))?;
    TimeInterval::new(new_start, end).map_err(|err| Error::invalid_request(err.to_string()))
}

#[async_trait]
impl<C, A, E> RescheduleCommand for RescheduleService<C, A, E>
where
    C: CatalogueRepository,
    A: AppointmentRepository,
    E: CalendarEntryRepository,
{
    async fn reschedule_booking(
        &self,
        request: RescheduleBookingRequest,
    ) -> Result<RescheduleBookingResponse, Error> {
        let new_start = parse_local_slot(&request.new_date, &request.new_time, self.timezone)?;
        let criteria = ParsedCriteria::parse(&request.criteria)?;

        let matches = find_matching(self.appointments.as_ref(), &criteria, self.timezone).await?;
        let Some(original) = matches.into_iter().next() else {
            return Err(Error::not_found(super::booking_lookup::NO_MATCH_MESSAGE));
        };

        let target = target_interval(&original, new_start)?;
        self.ensure_free(&original, &target).await?;

        let updated = self
            .appointments
            .update_interval(&original.id, &target)
            .await
            .map_err(map_appointment_error)?;
        self.move_calendar_mirror(&updated, &target).await;

        info!(
            appointment_id = %updated.id,
            from = %original.start,
            to = %updated.start,
            "appointment rescheduled"
        );
        Ok(RescheduleBookingResponse {
            appointment: updated,
        })
    }
}
