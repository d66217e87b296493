//! PostgreSQL-backed `AppointmentRepository` implementation using Diesel ORM.
//!
//! The `appointments_no_overlap` exclusion constraint rejects overlapping
//! scheduled rows per stylist; such rejections surface as
//! [`AppointmentRepositoryError::Conflict`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{AppointmentRepository, AppointmentRepositoryError};
use crate::domain::{
    Appointment, AppointmentId, AppointmentStatus, ClientPhone, SalonId, ServiceId, StylistId,
    TimeInterval,
};

use super::diesel_basic_error_mapping::{
    ErrorConstructors, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{AppointmentRow, IntervalUpdate, NewAppointmentRow};
use super::pool::{DbPool, PoolError};
use super::schema::appointments;

/// Diesel-backed implementation of the appointment repository port.
#[derive(Clone)]
pub struct DieselAppointmentRepository {
    pool: DbPool,
}

impl DieselAppointmentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AppointmentRepositoryError {
    map_basic_pool_error(error, |message| {
        AppointmentRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: diesel::result::Error) -> AppointmentRepositoryError {
    map_basic_diesel_error(
        error,
        &ErrorConstructors {
            query: |message| AppointmentRepositoryError::query(message),
            connection: |message| AppointmentRepositoryError::connection(message),
            conflict: Some(|message| AppointmentRepositoryError::conflict(message)),
        },
    )
}

/// Convert a database row into a domain appointment.
fn row_to_appointment(row: AppointmentRow) -> Result<Appointment, AppointmentRepositoryError> {
    let status = row
        .status
        .parse::<AppointmentStatus>()
        .map_err(|err| AppointmentRepositoryError::query(err.to_string()))?;
    let client_phone = ClientPhone::parse(&row.client_phone)
        .map_err(|err| AppointmentRepositoryError::query(format!("client_phone: {err}")))?;
    Ok(Appointment {
        id: AppointmentId::from_uuid(row.id),
        salon_id: SalonId::from_uuid(row.salon_id),
        stylist_id: StylistId::from_uuid(row.stylist_id),
        service_id: ServiceId::from_uuid(row.service_id),
        service_name: row.service_name,
        client_name: row.client_name,
        client_phone,
        start: row.start_time,
        end: row.end_time,
        status,
        correlation_id: row.correlation_id,
        created_at: row.created_at,
    })
}

#[async_trait]
impl AppointmentRepository for DieselAppointmentRepository {
    async fn insert(&self, appointment: &Appointment) -> Result<(), AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewAppointmentRow {
            id: *appointment.id.as_uuid(),
            salon_id: *appointment.salon_id.as_uuid(),
            stylist_id: *appointment.stylist_id.as_uuid(),
            service_id: *appointment.service_id.as_uuid(),
            service_name: &appointment.service_name,
            client_name: &appointment.client_name,
            client_phone: appointment.client_phone.as_str(),
            start_time: appointment.start,
            end_time: appointment.end,
            status: appointment.status.as_str(),
            correlation_id: appointment.correlation_id.as_deref(),
            created_at: appointment.created_at,
        };

        diesel::insert_into(appointments::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete(&self, id: &AppointmentId) -> Result<(), AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(appointments::table.filter(appointments::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if deleted == 0 {
            return Err(AppointmentRepositoryError::not_found(*id));
        }
        debug!(appointment_id = %id, "appointment row deleted");
        Ok(())
    }

    async fn list_active_for_stylist(
        &self,
        stylist_id: &StylistId,
        window: &TimeInterval,
    ) -> Result<Vec<Appointment>, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AppointmentRow> = appointments::table
            .filter(appointments::stylist_id.eq(stylist_id.as_uuid()))
            .filter(appointments::status.eq(AppointmentStatus::Scheduled.as_str()))
            .filter(appointments::start_time.lt(window.end()))
            .filter(appointments::end_time.gt(window.start()))
            .order(appointments::start_time.asc())
            .select(AppointmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_appointment).collect()
    }

    async fn list_active_for_phone(
        &self,
        phone: &ClientPhone,
    ) -> Result<Vec<Appointment>, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AppointmentRow> = appointments::table
            .filter(appointments::client_phone.eq(phone.as_str()))
            .filter(appointments::status.eq(AppointmentStatus::Scheduled.as_str()))
            .order((appointments::start_time.asc(), appointments::id.asc()))
            .select(AppointmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_appointment).collect()
    }

    async fn update_status(
        &self,
        id: &AppointmentId,
        status: AppointmentStatus,
    ) -> Result<(), AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(appointments::table.filter(appointments::id.eq(id.as_uuid())))
            .set(appointments::status.eq(status.as_str()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(AppointmentRepositoryError::not_found(*id));
        }
        Ok(())
    }

    async fn update_interval(
        &self,
        id: &AppointmentId,
        interval: &TimeInterval,
    ) -> Result<Appointment, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = IntervalUpdate {
            start_time: interval.start(),
            end_time: interval.end(),
        };
        let row = diesel::update(appointments::table.filter(appointments::id.eq(id.as_uuid())))
            .set(&changes)
            .returning(AppointmentRow::as_returning())
            .get_result::<AppointmentRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .ok_or_else(|| AppointmentRepositoryError::not_found(*id))?;
        row_to_appointment(row)
    }
}
