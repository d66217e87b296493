//! Outbound messaging adapter for the WhatsApp Cloud API.

mod http_sender;

pub use http_sender::{DEFAULT_GRAPH_API_BASE, WhatsAppCloudSender, WhatsAppSettings};
