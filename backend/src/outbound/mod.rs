//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: process-local store implementing the same repository ports
//! - **classifier**: OpenAI-compatible chat completions intent classifier
//! - **whatsapp**: WhatsApp Cloud API reply sender
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod classifier;
pub(crate) mod http_support;
pub mod memory;
pub mod persistence;
pub mod whatsapp;
