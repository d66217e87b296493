//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories translate between Diesel rows and domain types and contain
//! no business logic. Row structs (`models.rs`) and table definitions
//! (`schema.rs`) stay private to this module. Overlap protection lives in the
//! database as `btree_gist` exclusion constraints; the adapters only map their
//! violations onto port `Conflict` errors.
//!
//! # Example
//!
//! ```ignore
//! use salon_booking::outbound::persistence::{DbPool, DieselAppointmentRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/salon")).await?;
//! let appointments = DieselAppointmentRepository::new(pool);
//! ```

mod diesel_appointment_repository;
mod diesel_basic_error_mapping;
mod diesel_calendar_entry_repository;
mod diesel_catalogue_repository;
mod diesel_message_log_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_appointment_repository::DieselAppointmentRepository;
pub use diesel_calendar_entry_repository::DieselCalendarEntryRepository;
pub use diesel_catalogue_repository::DieselCatalogueRepository;
pub use diesel_message_log_repository::DieselMessageLogRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
