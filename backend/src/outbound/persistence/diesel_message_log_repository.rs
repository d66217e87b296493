//! PostgreSQL-backed message audit log.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::domain::MessageLogEntry;
use crate::domain::ports::{MessageLogRepository, MessageLogRepositoryError};

use super::diesel_basic_error_mapping::{
    ErrorConstructors, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::NewMessageLogRow;
use super::pool::DbPool;
use super::schema::message_logs;

/// Diesel-backed implementation of the message log port.
#[derive(Clone)]
pub struct DieselMessageLogRepository {
    pool: DbPool,
}

impl DieselMessageLogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageLogRepository for DieselMessageLogRepository {
    async fn record(&self, entry: &MessageLogEntry) -> Result<(), MessageLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| {
            map_basic_pool_error(err, |message| MessageLogRepositoryError::connection(message))
        })?;
        let row = NewMessageLogRow {
            id: *entry.id.as_uuid(),
            salon_id: *entry.salon_id.as_uuid(),
            phone: &entry.phone,
            direction: entry.direction.as_str(),
            body: &entry.body,
            external_id: entry.external_id.as_deref(),
            created_at: entry.created_at,
        };
        diesel::insert_into(message_logs::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                map_basic_diesel_error(
                    err,
                    &ErrorConstructors {
                        query: |message| MessageLogRepositoryError::query(message),
                        connection: |message| MessageLogRepositoryError::connection(message),
                        conflict: None,
                    },
                )
            })
    }
}
