//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Status and direction columns are stored as
//! lowercase strings and parsed back through the domain `FromStr` impls.

use chrono::{DateTime, NaiveTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    appointments, calendar_entries, message_logs, services, stylists, working_hours,
};

// ---------------------------------------------------------------------------
// Catalogue models
// ---------------------------------------------------------------------------

/// Row struct for reading from the services table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = services)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ServiceRow {
    pub id: Uuid,
    pub salon_id: Uuid,
    pub name: String,
    pub duration_minutes: i32,
    pub price_minor: i64,
}

/// Row struct for reading from the stylists table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = stylists)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StylistRow {
    pub id: Uuid,
    pub salon_id: Uuid,
    pub name: String,
    pub position: i32,
}

/// Row struct for reading from the working_hours table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = working_hours)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WorkingHoursRow {
    pub stylist_id: Uuid,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_day_off: bool,
}

// ---------------------------------------------------------------------------
// Appointment models
// ---------------------------------------------------------------------------

/// Row struct for reading from the appointments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = appointments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AppointmentRow {
    pub id: Uuid,
    pub salon_id: Uuid,
    pub stylist_id: Uuid,
    pub service_id: Uuid,
    pub service_name: String,
    pub client_name: String,
    pub client_phone: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub correlation_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating appointment records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = appointments)]
pub(crate) struct NewAppointmentRow<'a> {
    pub id: Uuid,
    pub salon_id: Uuid,
    pub stylist_id: Uuid,
    pub service_id: Uuid,
    pub service_name: &'a str,
    pub client_name: &'a str,
    pub client_phone: &'a str,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: &'a str,
    pub correlation_id: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

/// Changeset moving an appointment or calendar entry to a new interval.
#[derive(Debug, Clone, Copy, AsChangeset)]
#[diesel(table_name = appointments)]
pub(crate) struct IntervalUpdate {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Calendar entry models
// ---------------------------------------------------------------------------

/// Row struct for reading from the calendar_entries table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = calendar_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CalendarEntryRow {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub salon_id: Uuid,
    pub stylist_id: Uuid,
    pub title: String,
    pub client_name: String,
    pub service_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
}

/// Insertable struct for creating calendar entry records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = calendar_entries)]
pub(crate) struct NewCalendarEntryRow<'a> {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub salon_id: Uuid,
    pub stylist_id: Uuid,
    pub title: &'a str,
    pub client_name: &'a str,
    pub service_name: &'a str,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: &'a str,
}

/// Changeset moving a calendar entry to a new interval.
#[derive(Debug, Clone, Copy, AsChangeset)]
#[diesel(table_name = calendar_entries)]
pub(crate) struct CalendarIntervalUpdate {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Message log models
// ---------------------------------------------------------------------------

/// Insertable struct for message audit records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = message_logs)]
pub(crate) struct NewMessageLogRow<'a> {
    pub id: Uuid,
    pub salon_id: Uuid,
    pub phone: &'a str,
    pub direction: &'a str,
    pub body: &'a str,
    pub external_id: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}
