//! Inbound adapters that translate external requests into domain service
//! calls while keeping framework details at the edge.
//!
//! HTTP handlers, including the messaging-channel webhook, live under
//! [`http`].

pub mod http;
