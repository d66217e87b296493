//! Driven port for sending replies over the messaging channel.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced while delivering an outbound message.
    pub enum MessageSenderError {
        Transport { message: String } =>
            "message delivery transport failed: {message}",
        Timeout { message: String } =>
            "message delivery timeout: {message}",
        Rejected { status: u16, message: String } =>
            "messaging provider rejected message with status {status}: {message}",
    }
}

/// Port delivering a text message to a phone number.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), MessageSenderError>;
}

/// Fixture sender that accepts and discards every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMessageSender;

#[async_trait]
impl MessageSender for FixtureMessageSender {
    async fn send_text(&self, _to: &str, _body: &str) -> Result<(), MessageSenderError> {
        Ok(())
    }
}
