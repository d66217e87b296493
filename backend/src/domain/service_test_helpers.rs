//! Builders shared by the domain service unit tests.

use chrono::{DateTime, Duration, TimeZone, Utc};

use super::{
    Appointment, AppointmentId, AppointmentStatus, ClientPhone, SalonId, Service, ServiceId,
    Stylist, StylistId,
};

pub const CLIENT_PHONE: &str = "+15551234567";

/// 2024-01-10 at the given UTC wall-clock time.
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 10, hour, minute, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub fn haircut(salon_id: SalonId) -> Service {
    Service::new(ServiceId::random(), salon_id, "Haircut", 30, 2_500).expect("valid service")
}

pub fn stylist(salon_id: SalonId, name: &str, position: i32) -> Stylist {
    Stylist::new(StylistId::random(), salon_id, name, position, Vec::new())
        .expect("valid stylist")
}

pub fn booked(stylist: &Stylist, start: DateTime<Utc>, minutes: i64) -> Appointment {
    Appointment {
        id: AppointmentId::random(),
        salon_id: stylist.salon_id(),
        stylist_id: stylist.id(),
        service_id: ServiceId::random(),
        service_name: "Haircut".to_owned(),
        client_name: "Maria".to_owned(),
        client_phone: ClientPhone::parse(CLIENT_PHONE).expect("valid phone"),
        start,
        end: start + Duration::minutes(minutes),
        status: AppointmentStatus::Scheduled,
        correlation_id: None,
        created_at: start - Duration::days(1),
    }
}
