//! Messaging-channel webhook handler.
//!
//! ```text
//! POST /api/v1/messages/inbound
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{InboundMessage, InboundMessageOutcome};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Inbound text message as relayed from the messaging provider.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessageBody {
    /// Sender phone number; the leading `+` may be omitted.
    #[schema(example = "15551234567")]
    pub from: String,
    pub message_id: String,
    pub text: String,
}

/// Reply produced for an inbound message.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessageResponseBody {
    pub success: bool,
    pub reply: String,
    /// Whether the reply reached the messaging provider.
    pub delivered: bool,
}

impl From<InboundMessageBody> for InboundMessage {
    fn from(value: InboundMessageBody) -> Self {
        Self {
            from: value.from,
            message_id: value.message_id,
            text: value.text,
        }
    }
}

impl From<InboundMessageOutcome> for InboundMessageResponseBody {
    fn from(value: InboundMessageOutcome) -> Self {
        Self {
            success: value.success,
            reply: value.reply,
            delivered: value.delivered,
        }
    }
}

/// Classify a client message, act on it and send the reply back.
#[utoipa::path(
    post,
    path = "/api/v1/messages/inbound",
    request_body = InboundMessageBody,
    responses(
        (status = 200, description = "Message handled", body = InboundMessageResponseBody),
        (status = 400, description = "Empty sender or text", body = ErrorSchema)
    ),
    tags = ["conversation"],
    operation_id = "receiveMessage"
)]
#[post("/messages/inbound")]
pub async fn receive_message(
    state: web::Data<HttpState>,
    payload: web::Json<InboundMessageBody>,
) -> ApiResult<web::Json<InboundMessageResponseBody>> {
    let outcome = state.messages.handle_inbound(payload.into_inner().into()).await?;
    Ok(web::Json(InboundMessageResponseBody::from(outcome)))
}

#[cfg(test)]
mod tests {
    //! End-to-end coverage of the conversational path over the in-memory store.

    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::domain::ports::{
        IntentClassifierError, MessageSenderError, MockIntentClassifier, MockMessageSender,
    };
    use crate::domain::{ClassifiedIntent, GENERIC_FAILURE_REPLY, Intent, MessageDirection};
    use crate::inbound::http::test_utils::{SalonHarness, test_app};
    use crate::wiring::MessagingAdapters;

    fn booking_classification() -> ClassifiedIntent {
        ClassifiedIntent {
            intent: Intent::Booking,
            service: Some("Haircut".to_owned()),
            date: Some("2024-01-10".to_owned()),
            time: Some("10:00".to_owned()),
            client_name: Some("Maria".to_owned()),
            ..ClassifiedIntent::default()
        }
    }

    async fn send(harness: &SalonHarness, messaging: MessagingAdapters) -> (StatusCode, Value) {
        let app = actix_test::init_service(test_app(harness.state_with(messaging))).await;
        let request = actix_test::TestRequest::post()
            .uri("/api/v1/messages/inbound")
            .set_json(json!({
                "from": "15551234567",
                "messageId": "wamid.42",
                "text": "Can I get a haircut tomorrow at 10?",
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        let status = response.status();
        (status, actix_test::read_body_json(response).await)
    }

    #[rstest]
    #[actix_web::test]
    async fn books_audits_and_replies() {
        let harness = SalonHarness::new();
        let mut classifier = MockIntentClassifier::new();
        classifier
            .expect_classify()
            .withf(|_, context| context.service_names == vec!["Haircut".to_owned()])
            .times(1)
            .return_once(|_, _| Ok(booking_classification()));
        let mut sender = MockMessageSender::new();
        sender
            .expect_send_text()
            .withf(|to, _| to.to_string() == "15551234567")
            .times(1)
            .return_once(|_, _| Ok(()));

        let (status, body) = send(
            &harness,
            MessagingAdapters {
                classifier: Arc::new(classifier),
                message_log: harness.store.clone(),
                sender: Arc::new(sender),
            },
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["delivered"], true);
        assert_eq!(harness.store.appointments().len(), 1);
        let directions: Vec<MessageDirection> = harness
            .store
            .messages()
            .iter()
            .map(|entry| entry.direction)
            .collect();
        assert_eq!(
            directions,
            vec![MessageDirection::Inbound, MessageDirection::Outbound]
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn classifier_outage_degrades_to_generic_reply() {
        let harness = SalonHarness::new();
        let mut classifier = MockIntentClassifier::new();
        classifier
            .expect_classify()
            .return_once(|_, _| Err(IntentClassifierError::timeout("deadline elapsed")));
        let mut sender = MockMessageSender::new();
        sender
            .expect_send_text()
            .return_once(|_, _| Err(MessageSenderError::rejected(401_u16, "invalid token")));

        let (status, body) = send(
            &harness,
            MessagingAdapters {
                classifier: Arc::new(classifier),
                message_log: harness.store.clone(),
                sender: Arc::new(sender),
            },
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert_eq!(body["reply"], GENERIC_FAILURE_REPLY);
        assert_eq!(body["delivered"], false);
        assert!(harness.store.appointments().is_empty());
    }

    #[rstest]
    #[actix_web::test]
    async fn empty_text_is_rejected() {
        let harness = SalonHarness::new();
        let app = actix_test::init_service(test_app(harness.state())).await;
        let request = actix_test::TestRequest::post()
            .uri("/api/v1/messages/inbound")
            .set_json(json!({"from": "15551234567", "messageId": "wamid.1", "text": "  "}))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(harness.store.messages().is_empty());
    }
}
