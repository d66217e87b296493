//! Reqwest-backed intent classifier speaking the OpenAI chat completions API.
//!
//! The adapter owns prompt construction, transport and status mapping, and
//! decoding of the model's JSON answer into a [`ClassifiedIntent`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use super::dto::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ResponseFormat};
use crate::domain::ClassifiedIntent;
use crate::domain::ports::{ClassificationContext, IntentClassifier, IntentClassifierError};
use crate::outbound::http_support::status_message;

/// Model used when none is configured.
pub const DEFAULT_CLASSIFIER_MODEL: &str = "gpt-4o-mini";

/// Connection settings for the chat completions endpoint.
pub struct ClassifierHttpSettings {
    /// Full URL of the chat completions resource.
    pub endpoint: Url,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

/// Classifier adapter calling one chat completions endpoint.
pub struct OpenAiIntentClassifier {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl OpenAiIntentClassifier {
    /// Build an adapter using a reqwest client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(settings: ClassifierHttpSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            client,
            endpoint: settings.endpoint,
            api_key: settings.api_key,
            model: settings.model,
        })
    }
}

#[async_trait]
impl IntentClassifier for OpenAiIntentClassifier {
    async fn classify(
        &self,
        text: &str,
        context: &ClassificationContext,
    ) -> Result<ClassifiedIntent, IntentClassifierError> {
        let system_prompt = build_system_prompt(context);
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
            temperature: 0.0,
            response_format: ResponseFormat::JSON_OBJECT,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        let classified = parse_classification(body.as_ref())?;
        debug!(intent = ?classified.intent, "message classified");
        Ok(classified)
    }
}

/// Instructions asking the model for the `ClassifiedIntent` JSON shape.
pub(crate) fn build_system_prompt(context: &ClassificationContext) -> String {
    let services = if context.service_names.is_empty() {
        "(none listed)".to_owned()
    } else {
        context.service_names.join(", ")
    };
    let stylists = if context.stylist_names.is_empty() {
        "(none listed)".to_owned()
    } else {
        context.stylist_names.join(", ")
    };
    format!(
        "You are the booking assistant of a hair salon. Today is {today} in the {tz} timezone.\n\
         Services offered: {services}.\n\
         Stylists: {stylists}.\n\
         Classify the client's message and answer with a single JSON object with the keys:\n\
         \"intent\" (one of \"booking\", \"cancellation\", \"rescheduling\", \"other\"),\n\
         \"service\", \"date\" (YYYY-MM-DD), \"time\" (HH:MM, 24-hour), \"stylist\",\n\
         \"client_name\", \"old_date\", \"old_time\" and \"message\".\n\
         Resolve relative dates against today. For rescheduling put the current appointment in\n\
         old_date/old_time and the requested new slot in date/time. Use null for anything the\n\
         client did not say. For \"other\", put a short friendly reply in \"message\".",
        today = context.today.format("%Y-%m-%d"),
        tz = context.timezone,
    )
}

/// Strip an optional Markdown code fence around the model's JSON.
fn unfenced(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn parse_classification(body: &[u8]) -> Result<ClassifiedIntent, IntentClassifierError> {
    let decoded: ChatCompletionResponse = serde_json::from_slice(body).map_err(|error| {
        IntentClassifierError::decode(format!("invalid chat completion payload: {error}"))
    })?;
    let content = decoded
        .into_content()
        .ok_or_else(|| IntentClassifierError::decode("chat completion had no content"))?;
    serde_json::from_str(unfenced(&content)).map_err(|error| {
        IntentClassifierError::decode(format!("classification is not the expected JSON: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> IntentClassifierError {
    if error.is_timeout() {
        IntentClassifierError::timeout(error.to_string())
    } else {
        IntentClassifierError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> IntentClassifierError {
    let message = status_message(status.as_u16(), body);
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            IntentClassifierError::timeout(message)
        }
        _ => IntentClassifierError::upstream(status.as_u16(), message),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network classifier helpers.

    use chrono::NaiveDate;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::Intent;

    #[fixture]
    fn context() -> ClassificationContext {
        ClassificationContext {
            today: NaiveDate::from_ymd_opt(2024, 1, 10).expect("valid date"),
            timezone: "Europe/Madrid".to_owned(),
            service_names: vec!["Haircut".to_owned(), "Colour".to_owned()],
            stylist_names: vec!["Ana".to_owned()],
        }
    }

    fn completion(content: &str) -> Vec<u8> {
        serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })
        .to_string()
        .into_bytes()
    }

    #[rstest]
    fn prompt_carries_salon_context(context: ClassificationContext) {
        let prompt = build_system_prompt(&context);
        assert!(prompt.contains("Today is 2024-01-10 in the Europe/Madrid timezone"));
        assert!(prompt.contains("Services offered: Haircut, Colour."));
        assert!(prompt.contains("Stylists: Ana."));
    }

    #[rstest]
    fn decodes_booking_classification() {
        let body = completion(
            r#"{"intent":"booking","service":"Haircut","date":"2024-01-11","time":"10:00","stylist":null,"client_name":"Maria"}"#,
        );
        let classified = parse_classification(&body).expect("decodes");
        assert_eq!(classified.intent, Intent::Booking);
        assert_eq!(classified.date.as_deref(), Some("2024-01-11"));
        assert_eq!(classified.client_name.as_deref(), Some("Maria"));
        assert!(classified.stylist.is_none());
    }

    #[rstest]
    fn accepts_fenced_json_and_unknown_intents() {
        let body = completion("```json\n{\"intent\":\"complaint\",\"message\":\"Sorry!\"}\n```");
        let classified = parse_classification(&body).expect("decodes");
        assert_eq!(classified.intent, Intent::Other);
        assert_eq!(classified.message.as_deref(), Some("Sorry!"));
    }

    #[rstest]
    #[case(br#"{"choices": []}"#.to_vec())]
    #[case(b"not json".to_vec())]
    fn malformed_completions_are_decode_errors(#[case] body: Vec<u8>) {
        let err = parse_classification(&body).expect_err("decode fails");
        assert!(matches!(err, IntentClassifierError::Decode { .. }));
    }

    #[rstest]
    fn non_json_content_is_decode_error() {
        let err = parse_classification(&completion("I think it's a booking")).expect_err("fails");
        assert!(err.to_string().contains("expected JSON"));
    }

    #[rstest]
    #[case(StatusCode::GATEWAY_TIMEOUT, true)]
    #[case(StatusCode::TOO_MANY_REQUESTS, false)]
    #[case(StatusCode::UNAUTHORIZED, false)]
    fn maps_statuses(#[case] status: StatusCode, #[case] is_timeout: bool) {
        let err = map_status_error(status, b"{\"error\":\"nope\"}");
        if is_timeout {
            assert!(matches!(err, IntentClassifierError::Timeout { .. }));
        } else {
            assert!(matches!(
                err,
                IntentClassifierError::Upstream { status: code, .. } if code == status.as_u16()
            ));
        }
    }
}
