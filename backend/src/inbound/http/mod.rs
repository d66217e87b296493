//! HTTP inbound adapter exposing REST endpoints.

pub mod availability;
pub mod bookings;
pub mod error;
pub mod health;
pub mod intents;
pub mod messages;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;
pub(crate) mod validation;

pub use error::ApiResult;
