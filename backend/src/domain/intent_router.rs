//! Dispatch of classified conversational intents onto booking operations.
//!
//! The router is stateless per request. It resolves service and stylist
//! names against the salon catalogue, calls the driving ports, and renders
//! every outcome (including domain failures) as reply text.

use std::sync::Arc;

use async_trait::async_trait;
use chrono_tz::Tz;
use tracing::{info, warn};

use super::intent::present;
use super::port_errors::{conflict_alternatives, map_catalogue_error};
use super::ports::{
    AlternativeSlot, AvailabilityQuery, AvailabilityResponse, BookingCommand, BookingCriteria,
    CancelBookingRequest, CanceledSlot, CancellationCommand, CatalogueRepository,
    CheckAvailabilityRequest, CreateBookingRequest, IntentRouting, RescheduleBookingRequest,
    RescheduleCommand, RouteIntentRequest,
};
use super::{
    ClassifiedIntent, Error, ErrorCode, Intent, RouteOutcome, SalonId, Service, Stylist,
    render_local_date, render_local_time,
};

/// Reply sent when a collaborator fails and the request cannot be completed.
pub const GENERIC_FAILURE_REPLY: &str =
    "Sorry, something went wrong on our side. Please try again in a moment or contact us directly.";
/// Reply for small talk when the classifier suggests nothing.
pub const DEFAULT_OTHER_REPLY: &str = "Thanks for your message! How can we help you today?";

/// Intent router implementing [`IntentRouting`].
#[derive(Clone)]
pub struct IntentRouterService {
    salon_id: SalonId,
    timezone: Tz,
    catalogue: Arc<dyn CatalogueRepository>,
    availability: Arc<dyn AvailabilityQuery>,
    bookings: Arc<dyn BookingCommand>,
    cancellations: Arc<dyn CancellationCommand>,
    reschedules: Arc<dyn RescheduleCommand>,
}

/// Driving ports the router dispatches to.
#[derive(Clone)]
pub struct IntentRouterPorts {
    pub catalogue: Arc<dyn CatalogueRepository>,
    pub availability: Arc<dyn AvailabilityQuery>,
    pub bookings: Arc<dyn BookingCommand>,
    pub cancellations: Arc<dyn CancellationCommand>,
    pub reschedules: Arc<dyn RescheduleCommand>,
}

impl IntentRouterService {
    pub fn new(salon_id: SalonId, timezone: Tz, ports: IntentRouterPorts) -> Self {
        Self {
            salon_id,
            timezone,
            catalogue: ports.catalogue,
            availability: ports.availability,
            bookings: ports.bookings,
            cancellations: ports.cancellations,
            reschedules: ports.reschedules,
        }
    }

    async fn route_booking(
        &self,
        classified: &ClassifiedIntent,
        sender_phone: &str,
        message_id: &str,
    ) -> Result<RouteOutcome, Error> {
        let (service_name, date, time) = match (
            present(&classified.service),
            present(&classified.date),
            present(&classified.time),
        ) {
            (Some(service), Some(date), Some(time)) => (service, date, time),
            (service, date, time) => {
                let missing = [("service", service), ("date", date), ("time", time)]
                    .into_iter()
                    .filter(|(_, value)| value.is_none())
                    .map(|(label, _)| label)
                    .collect::<Vec<_>>();
                return Ok(RouteOutcome::failed(format!(
                    "I'd love to book that for you. Could you tell me the {}?",
                    missing.join(" and ")
                )));
            }
        };

        let services = self
            .catalogue
            .list_services(&self.salon_id)
            .await
            .map_err(map_catalogue_error)?;
        let Some(service) = find_by_name(&services, service_name, Service::name) else {
            return Ok(RouteOutcome::failed(unknown_service_reply(
                service_name,
                &services,
            )));
        };

        let stylist_id = match present(&classified.stylist) {
            None => None,
            Some(wanted) => {
                let stylists = self
                    .catalogue
                    .list_stylists(&self.salon_id)
                    .await
                    .map_err(map_catalogue_error)?;
                match find_by_name(&stylists, wanted, Stylist::name) {
                    Some(stylist) => Some(stylist.id()),
                    None => {
                        return Ok(RouteOutcome::failed(unknown_stylist_reply(
                            wanted, &stylists,
                        )));
                    }
                }
            }
        };

        let availability = self
            .availability
            .check_availability(CheckAvailabilityRequest {
                service_id: service.id(),
                date: date.to_owned(),
                time: time.to_owned(),
                stylist_id,
            })
            .await?;

        let chosen_id = match availability.stylist_id {
            Some(stylist_id) if availability.available => stylist_id,
            _ => {
                return Ok(RouteOutcome::failed(unavailable_reply(
                    date,
                    time,
                    present(&classified.stylist),
                    &availability,
                )));
            }
        };

        let created = self
            .bookings
            .create_booking(CreateBookingRequest {
                service_id: service.id(),
                date: date.to_owned(),
                time: time.to_owned(),
                stylist_id: chosen_id,
                client_name: present(&classified.client_name).map(str::to_owned),
                client_phone: sender_phone.to_owned(),
                correlation_id: Some(message_id.to_owned()),
            })
            .await?;

        let appointment = created.appointment;
        info!(appointment_id = %appointment.id, "conversational booking created");
        Ok(RouteOutcome::succeeded(format!(
            "Your {} with {} is confirmed for {} at {}. See you then!",
            appointment.service_name,
            availability.stylist_name.as_deref().unwrap_or("our team"),
            render_local_date(appointment.start, self.timezone),
            render_local_time(appointment.start, self.timezone),
        )))
    }

    async fn route_cancellation(
        &self,
        classified: &ClassifiedIntent,
        sender_phone: &str,
    ) -> Result<RouteOutcome, Error> {
        let response = self
            .cancellations
            .cancel_booking(CancelBookingRequest {
                criteria: BookingCriteria {
                    client_phone: sender_phone.to_owned(),
                    client_name: present(&classified.client_name).map(str::to_owned),
                    date: present(&classified.date).map(str::to_owned),
                    time: present(&classified.time).map(str::to_owned),
                },
            })
            .await?;

        let mut reply = format!(
            "Your appointment has been canceled: {}.",
            describe_slots(&response.canceled)
        );
        if !response.failed.is_empty() {
            reply.push_str(&format!(
                " We couldn't cancel {}. Please try again or contact us directly.",
                describe_slots(&response.failed)
            ));
        }
        Ok(RouteOutcome::succeeded(reply))
    }

    async fn route_rescheduling(
        &self,
        classified: &ClassifiedIntent,
        sender_phone: &str,
    ) -> Result<RouteOutcome, Error> {
        let (Some(new_date), Some(new_time)) =
            (present(&classified.date), present(&classified.time))
        else {
            return Ok(RouteOutcome::failed(
                "Sure, I can move your appointment. What new date and time would you like?",
            ));
        };

        let response = self
            .reschedules
            .reschedule_booking(RescheduleBookingRequest {
                criteria: BookingCriteria {
                    client_phone: sender_phone.to_owned(),
                    client_name: present(&classified.client_name).map(str::to_owned),
                    date: present(&classified.old_date).map(str::to_owned),
                    time: present(&classified.old_time).map(str::to_owned),
                },
                new_date: new_date.to_owned(),
                new_time: new_time.to_owned(),
            })
            .await?;

        let appointment = response.appointment;
        Ok(RouteOutcome::succeeded(format!(
            "Done! Your {} has been moved to {} at {}.",
            appointment.service_name,
            render_local_date(appointment.start, self.timezone),
            render_local_time(appointment.start, self.timezone),
        )))
    }

    /// Render a domain error from a routed operation as a reply.
    fn render_error(intent: Intent, classified: &ClassifiedIntent, err: &Error) -> RouteOutcome {
        let reply = match (err.code(), intent) {
            (ErrorCode::InvalidRequest, _) => format!(
                "Sorry, I couldn't understand that: {}. Could you send the date as YYYY-MM-DD and the time as HH:MM?",
                err.message()
            ),
            (ErrorCode::NotFound, Intent::Cancellation) => {
                "We couldn't find a matching appointment to cancel.".to_owned()
            }
            (ErrorCode::NotFound, Intent::Rescheduling) => {
                "We couldn't find a matching appointment to reschedule.".to_owned()
            }
            (ErrorCode::Conflict, _) => {
                let mut reply = format!(
                    "Sorry, {} at {} is not available.",
                    classified.date.as_deref().unwrap_or("that date"),
                    classified.time.as_deref().unwrap_or("that time"),
                );
                push_alternatives(&mut reply, &conflict_alternatives(err));
                reply
            }
            _ => GENERIC_FAILURE_REPLY.to_owned(),
        };
        RouteOutcome::failed(reply)
    }
}

fn describe_slots(slots: &[CanceledSlot]) -> String {
    slots
        .iter()
        .map(|slot| format!("{} at {} with {}", slot.date, slot.time, slot.stylist))
        .collect::<Vec<_>>()
        .join("; ")
}

fn find_by_name<'a, T>(items: &'a [T], wanted: &str, name: fn(&T) -> &str) -> Option<&'a T> {
    items
        .iter()
        .find(|item| name(item).trim().eq_ignore_ascii_case(wanted.trim()))
}

fn unknown_service_reply(wanted: &str, services: &[Service]) -> String {
    let offered = services.iter().map(Service::name).collect::<Vec<_>>();
    if offered.is_empty() {
        return format!("Sorry, we don't offer \"{wanted}\".");
    }
    format!(
        "Sorry, we don't offer \"{wanted}\". Our services are: {}.",
        offered.join(", ")
    )
}

fn unknown_stylist_reply(wanted: &str, stylists: &[Stylist]) -> String {
    let names = stylists.iter().map(Stylist::name).collect::<Vec<_>>();
    format!(
        "Sorry, we couldn't find a stylist called \"{wanted}\". Our stylists are: {}.",
        names.join(", ")
    )
}

fn unavailable_reply(
    date: &str,
    time: &str,
    stylist: Option<&str>,
    availability: &AvailabilityResponse,
) -> String {
    let mut reply = match stylist {
        Some(who) => format!("Sorry, {who} is not available on {date} at {time}."),
        None => format!("Sorry, no stylist is available on {date} at {time}."),
    };
    push_alternatives(&mut reply, &availability.alternatives);
    reply
}

fn push_alternatives(reply: &mut String, alternatives: &[AlternativeSlot]) {
    if alternatives.is_empty() {
        reply.push_str(" Please try another time.");
        return;
    }
    let options = alternatives
        .iter()
        .map(|slot| format!("{} at {} with {}", slot.date, slot.time, slot.stylist))
        .collect::<Vec<_>>();
    reply.push_str(&format!(" Available alternatives: {}.", options.join("; ")));
}

#[async_trait]
impl IntentRouting for IntentRouterService {
    async fn route_intent(&self, request: RouteIntentRequest) -> Result<RouteOutcome, Error> {
        let RouteIntentRequest {
            classified_intent: classified,
            sender_phone,
            message_id,
        } = request;

        let intent = classified.intent;
        let routed = match intent {
            Intent::Booking => {
                self.route_booking(&classified, &sender_phone, &message_id)
                    .await
            }
            Intent::Cancellation => self.route_cancellation(&classified, &sender_phone).await,
            Intent::Rescheduling => self.route_rescheduling(&classified, &sender_phone).await,
            Intent::Other => Ok(RouteOutcome::succeeded(
                present(&classified.message).unwrap_or(DEFAULT_OTHER_REPLY),
            )),
        };

        Ok(routed.unwrap_or_else(|err| {
            warn!(
                ?intent,
                code = ?err.code(),
                error = %err,
                "routed operation failed"
            );
            Self::render_error(intent, &classified, &err)
        }))
    }
}

#[cfg(test)]
#[path = "intent_router_tests.rs"]
mod tests;
