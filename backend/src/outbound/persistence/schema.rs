//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. The exclusion
//! constraints on `appointments` and `calendar_entries` are invisible here
//! and surface only as database errors at write time.

diesel::table! {
    /// Bookable services offered by a salon.
    services (id) {
        id -> Uuid,
        salon_id -> Uuid,
        name -> Varchar,
        duration_minutes -> Int4,
        price_minor -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Stylists ordered by `position` within a salon.
    stylists (id) {
        id -> Uuid,
        salon_id -> Uuid,
        name -> Varchar,
        position -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Weekly working windows in salon-local time.
    working_hours (id) {
        id -> Uuid,
        stylist_id -> Uuid,
        /// ISO weekday, Monday = 1.
        day_of_week -> Int2,
        start_time -> Time,
        end_time -> Time,
        is_day_off -> Bool,
    }
}

diesel::table! {
    /// Authoritative appointment records.
    appointments (id) {
        id -> Uuid,
        salon_id -> Uuid,
        stylist_id -> Uuid,
        service_id -> Uuid,
        service_name -> Varchar,
        client_name -> Varchar,
        client_phone -> Varchar,
        start_time -> Timestamptz,
        end_time -> Timestamptz,
        status -> Varchar,
        correlation_id -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Display projection of appointments, joined on `appointment_id`.
    calendar_entries (id) {
        id -> Uuid,
        appointment_id -> Uuid,
        salon_id -> Uuid,
        stylist_id -> Uuid,
        title -> Varchar,
        client_name -> Varchar,
        service_name -> Varchar,
        start_time -> Timestamptz,
        end_time -> Timestamptz,
        status -> Varchar,
    }
}

diesel::table! {
    /// Audit trail of inbound and outbound messaging traffic.
    message_logs (id) {
        id -> Uuid,
        salon_id -> Uuid,
        phone -> Varchar,
        direction -> Varchar,
        body -> Text,
        external_id -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(working_hours -> stylists (stylist_id));
diesel::joinable!(calendar_entries -> appointments (appointment_id));

diesel::allow_tables_to_appear_in_same_query!(
    services,
    stylists,
    working_hours,
    appointments,
    calendar_entries,
    message_logs,
);
