//! Availability checks over a ranked list of candidate stylists.
//!
//! The candidate list is the preferred stylist alone, or every stylist of the
//! service's salon in listing order. Checks are read-only and run
//! concurrently; the first free candidate in rank order wins.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use chrono_tz::Tz;
use futures_util::future::join_all;
use tracing::debug;

use super::port_errors::{map_appointment_error, map_catalogue_error};
use super::ports::{
    AlternativeSlot, AppointmentRepository, AvailabilityQuery, AvailabilityResponse,
    CatalogueRepository, CheckAvailabilityRequest,
};
use super::{
    Error, Service, ServiceId, Stylist, StylistId, TimeInterval, parse_local_slot,
    render_local_date, render_local_time,
};

/// Hour offsets tried for alternatives when the preferred stylist is busy.
pub const ALTERNATIVE_OFFSETS_HOURS: [i64; 3] = [1, 2, 3];

/// Availability service implementing [`AvailabilityQuery`].
#[derive(Clone)]
pub struct AvailabilityService<C, A> {
    catalogue: Arc<C>,
    appointments: Arc<A>,
    timezone: Tz,
}

impl<C, A> AvailabilityService<C, A>
where
    C: CatalogueRepository,
    A: AppointmentRepository,
{
    pub fn new(catalogue: Arc<C>, appointments: Arc<A>, timezone: Tz) -> Self {
        Self {
            catalogue,
            appointments,
            timezone,
        }
    }

    async fn load_service(&self, service_id: &ServiceId) -> Result<Service, Error> {
        self.catalogue
            .find_service(service_id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| Error::not_found(format!("service {service_id} not found")))
    }

    /// Ranked candidates: the preferred stylist alone, or the salon's roster.
    async fn ranked_candidates(
        &self,
        service: &Service,
        preferred: Option<StylistId>,
    ) -> Result<Vec<Stylist>, Error> {
        match preferred {
            Some(stylist_id) => {
                let stylist = self
                    .catalogue
                    .find_stylist(&stylist_id)
                    .await
                    .map_err(map_catalogue_error)?
                    .filter(|stylist| stylist.salon_id() == service.salon_id())
                    .ok_or_else(|| {
                        Error::not_found(format!(
                            "stylist {stylist_id} not found for service {}",
                            service.id()
                        ))
                    })?;
                Ok(vec![stylist])
            }
            None => {
                let mut stylists = self
                    .catalogue
                    .list_stylists(&service.salon_id())
                    .await
                    .map_err(map_catalogue_error)?;
                stylists.sort_by_key(Stylist::position);
                Ok(stylists)
            }
        }
    }

    /// Whether `stylist` is working and has no scheduled appointment
    /// overlapping `interval`.
    async fn is_free(&self, stylist: &Stylist, interval: &TimeInterval) -> Result<bool, Error> {
        if !stylist.is_working(interval, self.timezone) {
            return Ok(false);
        }
        let booked = self
            .appointments
            .list_active_for_stylist(&stylist.id(), interval)
            .await
            .map_err(map_appointment_error)?;
        Ok(!booked.iter().any(|appointment| appointment.blocks(interval)))
    }

    /// First free stylist in rank order. A failed lookup ranked ahead of any
    /// free candidate fails the whole check.
    async fn first_free<'a>(
        &self,
        candidates: &'a [Stylist],
        interval: &TimeInterval,
    ) -> Result<Option<&'a Stylist>, Error> {
        let verdicts = join_all(
            candidates
                .iter()
                .map(|stylist| self.is_free(stylist, interval)),
        )
        .await;

        for (stylist, free) in candidates.iter().zip(verdicts) {
            if free? {
                return Ok(Some(stylist));
            }
        }
        Ok(None)
    }

    async fn alternatives_for(
        &self,
        stylist: &Stylist,
        requested: &TimeInterval,
    ) -> Result<Vec<AlternativeSlot>, Error> {
        let shifted = ALTERNATIVE_OFFSETS_HOURS
            .iter()
            .filter_map(|hours| requested.offset_by(Duration::hours(*hours)).ok())
            .collect::<Vec<_>>();
        let verdicts = join_all(shifted.iter().map(|slot| self.is_free(stylist, slot))).await;

        let mut alternatives = Vec::with_capacity(shifted.len());
        for (slot, free) in shifted.iter().zip(verdicts) {
            if free? {
                alternatives.push(AlternativeSlot {
                    date: render_local_date(slot.start(), self.timezone),
                    time: render_local_time(slot.start(), self.timezone),
                    stylist: stylist.name().to_owned(),
                });
            }
        }
        Ok(alternatives)
    }
}

#[async_trait]
impl<C, A> AvailabilityQuery for AvailabilityService<C, A>
where
    C: CatalogueRepository,
    A: AppointmentRepository,
{
    async fn check_availability(
        &self,
        request: CheckAvailabilityRequest,
    ) -> Result<AvailabilityResponse, Error> {
        let start = parse_local_slot(&request.date, &request.time, self.timezone)?;
        let service = self.load_service(&request.service_id).await?;
        let interval = TimeInterval::starting_at(start, i64::from(service.duration_minutes()))
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        let candidates = self.ranked_candidates(&service, request.stylist_id).await?;
        if let Some(stylist) = self.first_free(&candidates, &interval).await? {
            debug!(
                service_id = %service.id(),
                stylist_id = %stylist.id(),
                start = %interval.start(),
                "slot available"
            );
            return Ok(AvailabilityResponse::available(stylist.id(), stylist.name()));
        }

        let alternatives = match (request.stylist_id, candidates.first()) {
            (Some(_), Some(preferred)) => self.alternatives_for(preferred, &interval).await?,
            _ => Vec::new(),
        };
        debug!(
            service_id = %service.id(),
            start = %interval.start(),
            alternatives = alternatives.len(),
            "slot unavailable"
        );
        Ok(AvailabilityResponse::unavailable(alternatives))
    }
}

#[cfg(test)]
#[path = "availability_service_tests.rs"]
mod tests;
