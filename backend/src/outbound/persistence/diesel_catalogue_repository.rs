//! PostgreSQL-backed catalogue read adapter.
//!
//! Stylists are loaded with their working hours in a second query keyed by
//! the returned stylist ids.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Weekday;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{CatalogueRepository, CatalogueRepositoryError};
use crate::domain::{SalonId, Service, ServiceId, Stylist, StylistId, WorkingHours};

use super::diesel_basic_error_mapping::{
    ErrorConstructors, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{ServiceRow, StylistRow, WorkingHoursRow};
use super::pool::{DbPool, PoolError};
use super::schema::{services, stylists, working_hours};

/// Diesel-backed implementation of the catalogue read port.
#[derive(Clone)]
pub struct DieselCatalogueRepository {
    pool: DbPool,
}

impl DieselCatalogueRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn load_working_hours(
        &self,
        stylist_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<WorkingHours>>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<WorkingHoursRow> = working_hours::table
            .filter(working_hours::stylist_id.eq_any(stylist_ids))
            .order((working_hours::stylist_id, working_hours::day_of_week))
            .select(WorkingHoursRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut grouped: HashMap<Uuid, Vec<WorkingHours>> = HashMap::new();
        for row in rows {
            let stylist_id = row.stylist_id;
            grouped
                .entry(stylist_id)
                .or_default()
                .push(row_to_working_hours(row)?);
        }
        Ok(grouped)
    }

    async fn hydrate_stylists(
        &self,
        rows: Vec<StylistRow>,
    ) -> Result<Vec<Stylist>, CatalogueRepositoryError> {
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut hours = if ids.is_empty() {
            HashMap::new()
        } else {
            self.load_working_hours(&ids).await?
        };
        rows.into_iter()
            .map(|row| {
                let schedule = hours.remove(&row.id).unwrap_or_default();
                row_to_stylist(row, schedule)
            })
            .collect()
    }
}

fn map_pool_error(error: PoolError) -> CatalogueRepositoryError {
    map_basic_pool_error(error, |message| CatalogueRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> CatalogueRepositoryError {
    map_basic_diesel_error(
        error,
        &ErrorConstructors {
            query: |message| CatalogueRepositoryError::query(message),
            connection: |message| CatalogueRepositoryError::connection(message),
            conflict: None,
        },
    )
}

fn weekday_from_iso(day: i16) -> Option<Weekday> {
    match day {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        7 => Some(Weekday::Sun),
        _ => None,
    }
}

fn row_to_service(row: ServiceRow) -> Result<Service, CatalogueRepositoryError> {
    Service::new(
        ServiceId::from_uuid(row.id),
        SalonId::from_uuid(row.salon_id),
        row.name,
        row.duration_minutes,
        row.price_minor,
    )
    .map_err(|err| CatalogueRepositoryError::query(err.to_string()))
}

fn row_to_working_hours(row: WorkingHoursRow) -> Result<WorkingHours, CatalogueRepositoryError> {
    let weekday = weekday_from_iso(row.day_of_week).ok_or_else(|| {
        CatalogueRepositoryError::query(format!("invalid day_of_week {}", row.day_of_week))
    })?;
    WorkingHours::new(weekday, row.start_time, row.end_time, row.is_day_off)
        .map_err(|err| CatalogueRepositoryError::query(err.to_string()))
}

fn row_to_stylist(
    row: StylistRow,
    schedule: Vec<WorkingHours>,
) -> Result<Stylist, CatalogueRepositoryError> {
    Stylist::new(
        StylistId::from_uuid(row.id),
        SalonId::from_uuid(row.salon_id),
        row.name,
        row.position,
        schedule,
    )
    .map_err(|err| CatalogueRepositoryError::query(err.to_string()))
}

#[async_trait]
impl CatalogueRepository for DieselCatalogueRepository {
    async fn find_service(
        &self,
        service_id: &ServiceId,
    ) -> Result<Option<Service>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = services::table
            .filter(services::id.eq(service_id.as_uuid()))
            .select(ServiceRow::as_select())
            .first::<ServiceRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_service).transpose()
    }

    async fn list_services(
        &self,
        salon_id: &SalonId,
    ) -> Result<Vec<Service>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ServiceRow> = services::table
            .filter(services::salon_id.eq(salon_id.as_uuid()))
            .order(services::name.asc())
            .select(ServiceRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_service).collect()
    }

    async fn find_stylist(
        &self,
        stylist_id: &StylistId,
    ) -> Result<Option<Stylist>, CatalogueRepositoryError> {
        let row = {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            stylists::table
                .filter(stylists::id.eq(stylist_id.as_uuid()))
                .select(StylistRow::as_select())
                .first::<StylistRow>(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?
        };
        let Some(row) = row else {
            return Ok(None);
        };
        let mut hydrated = self.hydrate_stylists(vec![row]).await?;
        Ok(hydrated.pop())
    }

    async fn list_stylists(
        &self,
        salon_id: &SalonId,
    ) -> Result<Vec<Stylist>, CatalogueRepositoryError> {
        let rows = {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            stylists::table
                .filter(stylists::salon_id.eq(salon_id.as_uuid()))
                .order((stylists::position.asc(), stylists::name.asc()))
                .select(StylistRow::as_select())
                .load::<StylistRow>(&mut conn)
                .await
                .map_err(map_diesel_error)?
        };
        self.hydrate_stylists(rows).await
    }
}
