//! PostgreSQL-backed `CalendarEntryRepository` implementation.
//!
//! Mirror lookups and updates are keyed on `appointment_id`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CalendarEntryRepository, CalendarEntryRepositoryError};
use crate::domain::{
    AppointmentId, CalendarEntry, CalendarEntryId, CalendarEntryStatus, SalonId, StylistId,
    TimeInterval,
};

use super::diesel_basic_error_mapping::{
    ErrorConstructors, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{CalendarEntryRow, CalendarIntervalUpdate, NewCalendarEntryRow};
use super::pool::{DbPool, PoolError};
use super::schema::calendar_entries;

/// Diesel-backed implementation of the calendar entry repository port.
#[derive(Clone)]
pub struct DieselCalendarEntryRepository {
    pool: DbPool,
}

impl DieselCalendarEntryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CalendarEntryRepositoryError {
    map_basic_pool_error(error, |message| {
        CalendarEntryRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: diesel::result::Error) -> CalendarEntryRepositoryError {
    map_basic_diesel_error(
        error,
        &ErrorConstructors {
            query: |message| CalendarEntryRepositoryError::query(message),
            connection: |message| CalendarEntryRepositoryError::connection(message),
            conflict: Some(|message| CalendarEntryRepositoryError::conflict(message)),
        },
    )
}

fn row_to_calendar_entry(
    row: CalendarEntryRow,
) -> Result<CalendarEntry, CalendarEntryRepositoryError> {
    let status = row
        .status
        .parse::<CalendarEntryStatus>()
        .map_err(|err| CalendarEntryRepositoryError::query(err.to_string()))?;
    Ok(CalendarEntry {
        id: CalendarEntryId::from_uuid(row.id),
        appointment_id: AppointmentId::from_uuid(row.appointment_id),
        salon_id: SalonId::from_uuid(row.salon_id),
        stylist_id: StylistId::from_uuid(row.stylist_id),
        title: row.title,
        client_name: row.client_name,
        service_name: row.service_name,
        start: row.start_time,
        end: row.end_time,
        status,
    })
}

#[async_trait]
impl CalendarEntryRepository for DieselCalendarEntryRepository {
    async fn insert(&self, entry: &CalendarEntry) -> Result<(), CalendarEntryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewCalendarEntryRow {
            id: *entry.id.as_uuid(),
            appointment_id: *entry.appointment_id.as_uuid(),
            salon_id: *entry.salon_id.as_uuid(),
            stylist_id: *entry.stylist_id.as_uuid(),
            title: &entry.title,
            client_name: &entry.client_name,
            service_name: &entry.service_name,
            start_time: entry.start,
            end_time: entry.end,
            status: entry.status.as_str(),
        };
        diesel::insert_into(calendar_entries::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_appointment(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<Option<CalendarEntry>, CalendarEntryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = calendar_entries::table
            .filter(calendar_entries::appointment_id.eq(appointment_id.as_uuid()))
            .select(CalendarEntryRow::as_select())
            .first::<CalendarEntryRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_calendar_entry).transpose()
    }

    async fn update_status_by_appointment(
        &self,
        appointment_id: &AppointmentId,
        status: CalendarEntryStatus,
    ) -> Result<bool, CalendarEntryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            calendar_entries::table
                .filter(calendar_entries::appointment_id.eq(appointment_id.as_uuid())),
        )
        .set(calendar_entries::status.eq(status.as_str()))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn update_interval_by_appointment(
        &self,
        appointment_id: &AppointmentId,
        interval: &TimeInterval,
    ) -> Result<bool, CalendarEntryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = CalendarIntervalUpdate {
            start_time: interval.start(),
            end_time: interval.end(),
        };
        let updated = diesel::update(
            calendar_entries::table
                .filter(calendar_entries::appointment_id.eq(appointment_id.as_uuid())),
        )
        .set(&changes)
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }
}
