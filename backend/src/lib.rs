//! Salon appointment scheduling backend.
//!
//! Hexagonal layout: [`domain`] holds the booking model, services and ports;
//! [`inbound`] exposes them over HTTP; [`outbound`] implements the driven
//! ports against PostgreSQL, process memory and external HTTP APIs.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod wiring;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
