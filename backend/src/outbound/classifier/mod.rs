//! Outbound intent classifier adapter for OpenAI-compatible chat APIs.

mod dto;
mod http_classifier;

pub use http_classifier::{ClassifierHttpSettings, DEFAULT_CLASSIFIER_MODEL, OpenAiIntentClassifier};
