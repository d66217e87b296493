//! Behavioural tests for routing classified messages to booking operations.

#[expect(
    dead_code,
    reason = "Shared salon fixture includes helpers used only by other suites."
)]
#[path = "support/salon.rs"]
mod salon;

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use salon_booking::domain::ports::RouteIntentRequest;
use salon_booking::domain::{ClassifiedIntent, Intent, RouteOutcome};
use salon::{BOOKING_DATE, CLIENT_PHONE, Salon};
use tokio::runtime::Runtime;

/// Sender phone as relayed by the messaging provider, without `+`.
const SENDER: &str = "15551234567";

struct RoutingWorld {
    runtime: Runtime,
    salon: RefCell<Option<Salon>>,
    outcome: RefCell<Option<RouteOutcome>>,
    next_message: RefCell<u32>,
}

impl RoutingWorld {
    fn new() -> Self {
        Self {
            runtime: Runtime::new().expect("tokio runtime"),
            salon: RefCell::new(None),
            outcome: RefCell::new(None),
            next_message: RefCell::new(1),
        }
    }

    fn route(&self, classified: ClassifiedIntent) -> RouteOutcome {
        let message_id = {
            let mut next = self.next_message.borrow_mut();
            let id = format!("wamid.{next}");
            *next += 1;
            id
        };
        let salon = self.salon.borrow();
        let salon = salon.as_ref().expect("salon should be set up");
        self.runtime
            .block_on(salon.ports.intents.route_intent(RouteIntentRequest {
                classified_intent: classified,
                sender_phone: SENDER.to_owned(),
                message_id,
            }))
            .expect("routing never fails for domain errors")
    }

    fn with_outcome(&self, f: impl FnOnce(&RouteOutcome)) {
        let outcome = self.outcome.borrow();
        f(outcome.as_ref().expect("a message should be routed"));
    }
}

fn booking(service: &str, date: &str, time: Option<&str>) -> ClassifiedIntent {
    ClassifiedIntent {
        intent: Intent::Booking,
        service: Some(service.to_owned()),
        date: Some(date.to_owned()),
        time: time.map(str::to_owned),
        client_name: Some("Maria".to_owned()),
        ..ClassifiedIntent::default()
    }
}

#[fixture]
fn world() -> RoutingWorld {
    RoutingWorld::new()
}

#[given("a salon offering a 30 minute Haircut with Stylist A and Stylist B")]
fn a_salon_offering_a_haircut(world: &RoutingWorld) {
    *world.salon.borrow_mut() = Some(Salon::new());
}

#[given("both stylists are booked at {time}")]
fn both_stylists_are_booked(world: &RoutingWorld, time: String) {
    let salon = world.salon.borrow();
    let salon = salon.as_ref().expect("salon should be set up");
    for (stylist, phone) in [
        (&salon.stylist_a, "+15550000001"),
        (&salon.stylist_b, "+15550000002"),
    ] {
        world
            .runtime
            .block_on(
                salon
                    .ports
                    .bookings
                    .create_booking(salon.booking_request(stylist, &time, phone)),
            )
            .expect("seed booking should succeed");
    }
}

#[given("the client has booked a haircut at {time} by message")]
fn the_client_has_booked_by_message(world: &RoutingWorld, time: String) {
    let outcome = world.route(booking("Haircut", BOOKING_DATE, Some(&time)));
    assert!(outcome.success, "{}", outcome.message);
}

#[when("the client asks to book a {service} on {date} at {time}")]
fn the_client_asks_to_book(world: &RoutingWorld, service: String, date: String, time: String) {
    let outcome = world.route(booking(&service, &date, Some(&time)));
    *world.outcome.borrow_mut() = Some(outcome);
}

#[when("the client asks to book a {service} on {date} without a time")]
fn the_client_asks_to_book_without_time(world: &RoutingWorld, service: String, date: String) {
    let outcome = world.route(booking(&service, &date, None));
    *world.outcome.borrow_mut() = Some(outcome);
}

#[when("the client asks to cancel")]
fn the_client_asks_to_cancel(world: &RoutingWorld) {
    let outcome = world.route(ClassifiedIntent {
        intent: Intent::Cancellation,
        ..ClassifiedIntent::default()
    });
    *world.outcome.borrow_mut() = Some(outcome);
}

#[when("the client asks to move it to {date} at {time}")]
fn the_client_asks_to_move(world: &RoutingWorld, date: String, time: String) {
    let outcome = world.route(ClassifiedIntent {
        intent: Intent::Rescheduling,
        date: Some(date),
        time: Some(time),
        ..ClassifiedIntent::default()
    });
    *world.outcome.borrow_mut() = Some(outcome);
}

#[then("the reply reports success")]
fn the_reply_reports_success(world: &RoutingWorld) {
    world.with_outcome(|outcome| assert!(outcome.success, "{}", outcome.message));
}

#[then("the reply reports failure")]
fn the_reply_reports_failure(world: &RoutingWorld) {
    world.with_outcome(|outcome| assert!(!outcome.success, "{}", outcome.message));
}

#[then("the reply reads \"{reply}\"")]
fn the_reply_reads(world: &RoutingWorld, reply: String) {
    world.with_outcome(|outcome| assert_eq!(outcome.message, reply));
}

#[then("the client has one appointment with Stylist A")]
fn the_client_has_one_appointment(world: &RoutingWorld) {
    let salon = world.salon.borrow();
    let salon = salon.as_ref().expect("salon should be set up");
    let appointments = salon.store.appointments();
    assert_eq!(appointments.len(), 1);
    let appointment = appointments.first().expect("appointment");
    assert_eq!(appointment.stylist_id, salon.stylist_a.id());
    assert_eq!(appointment.client_phone.as_str(), CLIENT_PHONE);
    assert_eq!(appointment.correlation_id.as_deref(), Some("wamid.1"));
}

#[then("no appointment exists")]
fn no_appointment_exists(world: &RoutingWorld) {
    let salon = world.salon.borrow();
    let salon = salon.as_ref().expect("salon should be set up");
    assert!(salon.store.appointments().is_empty());
}

#[scenario(path = "tests/features/intent_routing.feature")]
fn intent_routing(world: RoutingWorld) {
    drop(world);
}
