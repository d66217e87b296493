//! Reqwest-backed WhatsApp Cloud API text sender.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::domain::ports::{MessageSender, MessageSenderError};
use crate::outbound::http_support::status_message;

/// Graph API base used when none is configured.
pub const DEFAULT_GRAPH_API_BASE: &str = "https://graph.facebook.com/v19.0/";

/// Credentials and endpoint for one WhatsApp business phone number.
pub struct WhatsAppSettings {
    /// Graph API base URL, with a trailing slash.
    pub api_base: Url,
    pub access_token: String,
    pub phone_number_id: String,
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct TextMessageRequest<'a> {
    messaging_product: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    text: TextBody<'a>,
}

#[derive(Debug, Serialize)]
struct TextBody<'a> {
    body: &'a str,
}

/// Message sender posting to `{api_base}{phone_number_id}/messages`.
pub struct WhatsAppCloudSender {
    client: Client,
    messages_url: Url,
    access_token: String,
}

impl WhatsAppCloudSender {
    /// Build a sender.
    ///
    /// # Errors
    ///
    /// Returns a transport error when the reqwest client cannot be built or
    /// the messages URL cannot be derived from the base.
    pub fn new(settings: WhatsAppSettings) -> Result<Self, MessageSenderError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|err| MessageSenderError::transport(err.to_string()))?;
        let messages_url = messages_url(&settings.api_base, &settings.phone_number_id)?;
        Ok(Self {
            client,
            messages_url,
            access_token: settings.access_token,
        })
    }
}

fn messages_url(api_base: &Url, phone_number_id: &str) -> Result<Url, MessageSenderError> {
    let id = phone_number_id.trim();
    if id.is_empty() {
        return Err(MessageSenderError::transport("phone number id must not be empty"));
    }
    api_base
        .join(&format!("{id}/messages"))
        .map_err(|err| MessageSenderError::transport(format!("invalid messages URL: {err}")))
}

/// WhatsApp expects recipients as bare digits.
fn recipient(to: &str) -> String {
    to.chars().filter(char::is_ascii_digit).collect()
}

#[async_trait]
impl MessageSender for WhatsAppCloudSender {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), MessageSenderError> {
        let to = recipient(to);
        let request = TextMessageRequest {
            messaging_product: "whatsapp",
            to: &to,
            kind: "text",
            text: TextBody { body },
        };
        let response = self
            .client
            .post(self.messages_url.clone())
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            debug!(status = status.as_u16(), "reply delivered");
            return Ok(());
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref()))
    }
}

fn map_transport_error(error: reqwest::Error) -> MessageSenderError {
    if error.is_timeout() {
        MessageSenderError::timeout(error.to_string())
    } else {
        MessageSenderError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> MessageSenderError {
    let message = status_message(status.as_u16(), body);
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            MessageSenderError::timeout(message)
        }
        _ => MessageSenderError::rejected(status.as_u16(), message),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn base() -> Url {
        Url::parse(DEFAULT_GRAPH_API_BASE).expect("valid base")
    }

    #[rstest]
    fn messages_url_appends_phone_number_id() {
        let url = messages_url(&base(), "1234567890").expect("valid url");
        assert_eq!(
            url.as_str(),
            "https://graph.facebook.com/v19.0/1234567890/messages"
        );
    }

    #[rstest]
    fn blank_phone_number_id_is_rejected() {
        assert!(messages_url(&base(), "  ").is_err());
    }

    #[rstest]
    #[case("+15551234567", "15551234567")]
    #[case("15551234567", "15551234567")]
    fn recipients_are_bare_digits(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(recipient(raw), expected);
    }

    #[rstest]
    fn request_serialises_in_cloud_api_shape() {
        let request = TextMessageRequest {
            messaging_product: "whatsapp",
            to: "15551234567",
            kind: "text",
            text: TextBody { body: "See you!" },
        };
        let value = serde_json::to_value(&request).expect("serialises");
        assert_eq!(value["type"], "text");
        assert_eq!(value["text"]["body"], "See you!");
        assert_eq!(value["messaging_product"], "whatsapp");
    }

    #[rstest]
    #[case(StatusCode::UNAUTHORIZED)]
    #[case(StatusCode::BAD_REQUEST)]
    fn client_errors_are_rejections(#[case] status: StatusCode) {
        let err = map_status_error(status, b"{\"error\":{\"message\":\"invalid token\"}}");
        assert!(matches!(err, MessageSenderError::Rejected { .. }));
        assert!(err.to_string().contains("invalid token"));
    }

    #[rstest]
    fn gateway_timeout_is_timeout() {
        let err = map_status_error(StatusCode::GATEWAY_TIMEOUT, b"");
        assert!(matches!(err, MessageSenderError::Timeout { .. }));
    }
}
