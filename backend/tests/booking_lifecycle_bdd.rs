//! Behavioural tests for availability, booking, rescheduling and
//! cancellation over the in-memory store.

#[path = "support/salon.rs"]
mod salon;

use std::cell::RefCell;

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use salon_booking::domain::ports::{
    AvailabilityResponse, CancelBookingRequest, CheckAvailabilityRequest, RescheduleBookingRequest,
};
use salon_booking::domain::{AppointmentStatus, CalendarEntryStatus, Error, ErrorCode};
use salon::{BOOKING_DATE, CLIENT_PHONE, Salon, criteria_for};
use tokio::runtime::Runtime;

const OTHER_PHONE: &str = "+15559876543";

struct BookingWorld {
    runtime: Runtime,
    salon: RefCell<Option<Salon>>,
    availability: RefCell<Option<AvailabilityResponse>>,
    last_error: RefCell<Option<Error>>,
    last_succeeded: RefCell<bool>,
}

impl BookingWorld {
    fn new() -> Self {
        Self {
            runtime: Runtime::new().expect("tokio runtime"),
            salon: RefCell::new(None),
            availability: RefCell::new(None),
            last_error: RefCell::new(None),
            last_succeeded: RefCell::new(false),
        }
    }

    fn with_salon<T>(&self, f: impl FnOnce(&Salon) -> T) -> T {
        let salon = self.salon.borrow();
        f(salon.as_ref().expect("salon should be set up"))
    }

    fn record<T>(&self, result: Result<T, Error>) {
        match result {
            Ok(_) => {
                *self.last_succeeded.borrow_mut() = true;
                *self.last_error.borrow_mut() = None;
            }
            Err(err) => {
                *self.last_succeeded.borrow_mut() = false;
                *self.last_error.borrow_mut() = Some(err);
            }
        }
    }

    fn book(&self, stylist: &str, time: &str, phone: &str) -> Result<(), Error> {
        self.with_salon(|salon| {
            let request = salon.booking_request(salon.stylist_named(stylist), time, phone);
            self.runtime
                .block_on(salon.ports.bookings.create_booking(request))
                .map(drop)
        })
    }

    fn check(&self, time: &str, stylist: Option<&str>) {
        let response = self.with_salon(|salon| {
            let request = CheckAvailabilityRequest {
                service_id: salon.haircut.id(),
                date: BOOKING_DATE.to_owned(),
                time: time.to_owned(),
                stylist_id: stylist.map(|name| salon.stylist_named(name).id()),
            };
            self.runtime
                .block_on(salon.ports.availability.check_availability(request))
                .expect("availability check")
        });
        *self.availability.borrow_mut() = Some(response);
    }

    fn with_error(&self, f: impl FnOnce(&Error)) {
        let error = self.last_error.borrow();
        f(error.as_ref().expect("expected the last request to fail"));
    }

    fn with_availability(&self, f: impl FnOnce(&AvailabilityResponse)) {
        let response = self.availability.borrow();
        f(response.as_ref().expect("availability should be checked"));
    }
}

fn utc_at(time: &str) -> chrono::DateTime<Utc> {
    let date = NaiveDate::parse_from_str(BOOKING_DATE, "%Y-%m-%d").expect("date");
    let time = NaiveTime::parse_from_str(time, "%H:%M").expect("time");
    Utc.from_utc_datetime(&date.and_time(time))
}

#[fixture]
fn world() -> BookingWorld {
    BookingWorld::new()
}

#[given("a salon offering a 30 minute Haircut with Stylist A and Stylist B")]
fn a_salon_offering_a_haircut(world: &BookingWorld) {
    *world.salon.borrow_mut() = Some(Salon::new());
}

#[given("{stylist} is booked at {time} for another client")]
fn stylist_is_booked_for_another_client(world: &BookingWorld, stylist: String, time: String) {
    world
        .book(&stylist, &time, OTHER_PHONE)
        .expect("seed booking should succeed");
}

#[given("the client has booked {stylist} at {time}")]
fn the_client_has_booked(world: &BookingWorld, stylist: String, time: String) {
    world
        .book(&stylist, &time, CLIENT_PHONE)
        .expect("client booking should succeed");
}

#[when("availability is checked for {time} with any stylist")]
fn availability_is_checked_with_any_stylist(world: &BookingWorld, time: String) {
    world.check(&time, None);
}

#[when("availability is checked for {time} with preferred stylist {stylist}")]
fn availability_is_checked_with_preferred_stylist(
    world: &BookingWorld,
    time: String,
    stylist: String,
) {
    world.check(&time, Some(&stylist));
}

#[when("the client books {stylist} at {time}")]
fn the_client_books(world: &BookingWorld, stylist: String, time: String) {
    let result = world.book(&stylist, &time, CLIENT_PHONE);
    world.record(result);
}

#[when("another client books {stylist} at {time}")]
fn another_client_books(world: &BookingWorld, stylist: String, time: String) {
    let result = world.book(&stylist, &time, OTHER_PHONE);
    world.record(result);
}

#[when("the client reschedules to {time}")]
fn the_client_reschedules(world: &BookingWorld, time: String) {
    let result = world.with_salon(|salon| {
        world
            .runtime
            .block_on(
                salon
                    .ports
                    .reschedules
                    .reschedule_booking(RescheduleBookingRequest {
                        criteria: criteria_for(CLIENT_PHONE),
                        new_date: BOOKING_DATE.to_owned(),
                        new_time: time,
                    }),
            )
    });
    world.record(result);
}

#[when("the client cancels their bookings")]
fn the_client_cancels(world: &BookingWorld) {
    let result = world.with_salon(|salon| {
        world
            .runtime
            .block_on(salon.ports.cancellations.cancel_booking(CancelBookingRequest {
                criteria: criteria_for(CLIENT_PHONE),
            }))
    });
    world.record(result);
}

#[then("the slot is available with {stylist}")]
fn the_slot_is_available_with(world: &BookingWorld, stylist: String) {
    world.with_availability(|response| {
        assert!(response.available);
        assert_eq!(response.stylist_name.as_deref(), Some(stylist.as_str()));
        assert!(response.alternatives.is_empty());
    });
}

#[then("the slot is not available")]
fn the_slot_is_not_available(world: &BookingWorld) {
    world.with_availability(|response| {
        assert!(!response.available);
        assert!(response.stylist_id.is_none());
    });
}

#[then("the alternatives are 11:00, 12:00 and 13:00")]
fn the_alternatives_are_hourly(world: &BookingWorld) {
    world.with_availability(|response| {
        let times: Vec<&str> = response
            .alternatives
            .iter()
            .map(|slot| slot.time.as_str())
            .collect();
        assert_eq!(times, vec!["11:00", "12:00", "13:00"]);
        assert!(
            response
                .alternatives
                .iter()
                .all(|slot| slot.stylist == "Stylist A" && slot.date == BOOKING_DATE)
        );
    });
}

#[then("the booking succeeds")]
fn the_booking_succeeds(world: &BookingWorld) {
    assert!(*world.last_succeeded.borrow(), "{:?}", world.last_error.borrow());
}

#[then("the appointment and calendar entry are both active")]
fn both_views_are_active(world: &BookingWorld) {
    world.with_salon(|salon| {
        let appointments = salon.store.appointments();
        let entries = salon.store.calendar_entries();
        assert_eq!(appointments.len(), 1);
        assert_eq!(entries.len(), 1);
        assert_eq!(appointments[0].status, AppointmentStatus::Scheduled);
        assert_eq!(entries[0].status, CalendarEntryStatus::Confirmed);
        assert_eq!(entries[0].appointment_id, appointments[0].id);
    });
}

#[then("the booking fails with a retryable conflict")]
fn the_booking_fails_with_a_retryable_conflict(world: &BookingWorld) {
    world.with_error(|error| {
        assert_eq!(error.code(), ErrorCode::Conflict);
        let retryable = error
            .details()
            .and_then(|details| details.get("retryable"))
            .and_then(serde_json::Value::as_bool);
        assert_eq!(retryable, Some(true));
    });
}

#[then("only one appointment exists")]
fn only_one_appointment_exists(world: &BookingWorld) {
    world.with_salon(|salon| {
        assert_eq!(salon.store.appointments().len(), 1);
        assert_eq!(salon.store.calendar_entries().len(), 1);
    });
}

#[then("the appointment runs from {start} to {end}")]
fn the_appointment_runs(world: &BookingWorld, start: String, end: String) {
    world.with_salon(|salon| {
        let appointment = salon.store.appointments().remove(0);
        assert_eq!(appointment.start, utc_at(&start));
        assert_eq!(appointment.end, utc_at(&end));
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
    });
}

#[then("the calendar entry matches the appointment")]
fn the_calendar_entry_matches(world: &BookingWorld) {
    world.with_salon(|salon| {
        let appointment = salon.store.appointments().remove(0);
        let entry = salon.store.calendar_entries().remove(0);
        assert_eq!(entry.appointment_id, appointment.id);
        assert_eq!((entry.start, entry.end), (appointment.start, appointment.end));
    });
}

#[then("the appointment and calendar entry are both canceled")]
fn both_views_are_canceled(world: &BookingWorld) {
    world.with_salon(|salon| {
        let appointment = salon.store.appointments().remove(0);
        let entry = salon.store.calendar_entries().remove(0);
        assert_eq!(appointment.status, AppointmentStatus::Canceled);
        assert_eq!(entry.status, CalendarEntryStatus::Canceled);
    });
}

#[then("the request fails as not found")]
fn the_request_fails_as_not_found(world: &BookingWorld) {
    world.with_error(|error| {
        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(error.message(), "no matching appointment found");
    });
}

#[scenario(path = "tests/features/booking_lifecycle.feature")]
fn booking_lifecycle(world: BookingWorld) {
    drop(world);
}
