//! Strongly typed identifiers for salon aggregates.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Wrap an existing UUID.
            pub const fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Generate a new random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

uuid_identifier!(
    /// Salon (tenant) identifier.
    SalonId
);
uuid_identifier!(
    /// Bookable service identifier.
    ServiceId
);
uuid_identifier!(
    /// Stylist identifier.
    StylistId
);
uuid_identifier!(
    /// Authoritative appointment identifier.
    AppointmentId
);
uuid_identifier!(
    /// Calendar projection row identifier.
    CalendarEntryId
);
uuid_identifier!(
    /// Audited conversational message identifier.
    MessageLogId
);
