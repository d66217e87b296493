//! Driven port for classifying free-text client messages.
//!
//! The language model behind it is external; the domain only consumes the
//! structured [`ClassifiedIntent`] it returns.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::ClassifiedIntent;

use super::define_port_error;

/// Salon context offered to the classifier alongside the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationContext {
    /// Salon-local date, so relative dates ("tomorrow") can be resolved.
    pub today: NaiveDate,
    /// IANA timezone name of the salon.
    pub timezone: String,
    pub service_names: Vec<String>,
    pub stylist_names: Vec<String>,
}

define_port_error! {
    /// Errors surfaced while calling the classifier.
    pub enum IntentClassifierError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "classifier transport failed: {message}",
        /// Classifier call exceeded the client timeout.
        Timeout { message: String } =>
            "classifier timeout: {message}",
        /// Classifier answered with a non-success status.
        Upstream { status: u16, message: String } =>
            "classifier returned status {status}: {message}",
        /// Classifier output could not be decoded.
        Decode { message: String } =>
            "classifier response decode failed: {message}",
    }
}

/// Port turning message text into a [`ClassifiedIntent`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(
        &self,
        text: &str,
        context: &ClassificationContext,
    ) -> Result<ClassifiedIntent, IntentClassifierError>;
}

/// Fixture classifier that treats every message as small talk.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIntentClassifier;

#[async_trait]
impl IntentClassifier for FixtureIntentClassifier {
    async fn classify(
        &self,
        _text: &str,
        _context: &ClassificationContext,
    ) -> Result<ClassifiedIntent, IntentClassifierError> {
        Ok(ClassifiedIntent::other(
            "Thanks for your message! How can we help you today?",
        ))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::Intent;

    #[tokio::test]
    async fn fixture_returns_other_intent() {
        let context = ClassificationContext {
            today: NaiveDate::from_ymd_opt(2024, 1, 10).expect("valid date"),
            timezone: "UTC".to_owned(),
            service_names: Vec::new(),
            stylist_names: Vec::new(),
        };
        let classified = FixtureIntentClassifier
            .classify("hello", &context)
            .await
            .expect("fixture classify");
        assert_eq!(classified.intent, Intent::Other);
        assert!(classified.message.is_some());
    }

    #[test]
    fn upstream_error_includes_status() {
        let err = IntentClassifierError::upstream(429_u16, "slow down");
        assert_eq!(err.to_string(), "classifier returned status 429: slow down");
    }
}
