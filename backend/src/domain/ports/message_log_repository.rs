//! Port for auditing conversational messages.

use async_trait::async_trait;

use crate::domain::MessageLogEntry;

use super::define_port_error;

define_port_error! {
    /// Errors raised by message log adapters.
    pub enum MessageLogRepositoryError {
        Connection { message: String } =>
            "message log connection failed: {message}",
        Query { message: String } =>
            "message log write failed: {message}",
    }
}

/// Append-only audit log of inbound and outbound messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageLogRepository: Send + Sync {
    async fn record(&self, entry: &MessageLogEntry) -> Result<(), MessageLogRepositoryError>;
}

