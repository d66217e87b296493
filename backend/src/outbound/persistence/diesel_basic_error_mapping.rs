//! Shared Diesel error mapping for the salon repositories.

use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Exclusion constraints guarding against overlapping bookings.
pub(crate) const OVERLAP_CONSTRAINTS: [&str; 2] =
    ["appointments_no_overlap", "calendar_entries_no_overlap"];

/// Constructors a repository error type provides for mapping.
pub(crate) struct ErrorConstructors<E> {
    pub query: fn(String) -> E,
    pub connection: fn(String) -> E,
    /// `None` for repositories with no overlap constraint.
    pub conflict: Option<fn(String) -> E>,
}

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

fn names_overlap_constraint(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| OVERLAP_CONSTRAINTS.contains(&name))
        || info.message().contains("conflicting key value violates exclusion constraint")
}

/// Whether a Diesel error is an overlap rejection from an exclusion constraint.
pub(crate) fn is_overlap_violation(error: &DieselError) -> bool {
    match error {
        DieselError::DatabaseError(_, info) => names_overlap_constraint(info.as_ref()),
        _ => false,
    }
}

/// Map Diesel errors onto repository constructors.
///
/// Exclusion-constraint violations become conflicts when the repository has
/// a conflict variant. A closed connection maps to a connection error, and
/// everything else is a query error with a generic message.
pub(crate) fn map_basic_diesel_error<E>(error: DieselError, ctors: &ErrorConstructors<E>) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = ?info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    if let Some(conflict) = ctors.conflict.filter(|_| is_overlap_violation(&error)) {
        return conflict("overlapping interval for stylist".to_owned());
    }

    match error {
        DieselError::NotFound => (ctors.query)("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => (ctors.query)("database query error".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            (ctors.connection)("database connection error".to_owned())
        }
        _ => (ctors.query)("database error".to_owned()),
    }
}
