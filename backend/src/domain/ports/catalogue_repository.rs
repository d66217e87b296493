//! Port for reading the salon catalogue: services, stylists and working hours.

use async_trait::async_trait;

use crate::domain::{SalonId, Service, ServiceId, Stylist, StylistId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by catalogue repository adapters.
    pub enum CatalogueRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "catalogue repository connection failed: {message}",
        /// Query failed during execution or returned an invalid row.
        Query { message: String } =>
            "catalogue repository query failed: {message}",
    }
}

/// Read-only access to the bookable catalogue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueRepository: Send + Sync {
    /// Find a service by id.
    async fn find_service(
        &self,
        service_id: &ServiceId,
    ) -> Result<Option<Service>, CatalogueRepositoryError>;

    /// List the services a salon offers, ordered by name.
    async fn list_services(
        &self,
        salon_id: &SalonId,
    ) -> Result<Vec<Service>, CatalogueRepositoryError>;

    /// Find a stylist by id, with working hours loaded.
    async fn find_stylist(
        &self,
        stylist_id: &StylistId,
    ) -> Result<Option<Stylist>, CatalogueRepositoryError>;

    /// List a salon's stylists in listing order, with working hours loaded.
    async fn list_stylists(
        &self,
        salon_id: &SalonId,
    ) -> Result<Vec<Stylist>, CatalogueRepositoryError>;
}
