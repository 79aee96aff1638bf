use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppError;

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID value.
            #[must_use]
            pub fn from_uuid(value: Uuid) -> Self {
                Self(value)
            }

            /// Returns the underlying UUID value.
            #[must_use]
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $name {
            fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(value.trim()).map(Self).map_err(|error| {
                    AppError::Validation(format!("invalid {} '{value}': {error}", $label))
                })
            }
        }
    };
}

uuid_identifier!(
    /// Identifier of a platform user.
    UserId,
    "user id"
);

uuid_identifier!(
    /// Identifier of a department.
    DepartmentId,
    "department id"
);

uuid_identifier!(
    /// Identifier of a service-level policy.
    SlaPolicyId,
    "sla policy id"
);

uuid_identifier!(
    /// Identifier of a ticket record.
    TicketId,
    "ticket id"
);

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{DepartmentId, UserId};

    #[test]
    fn identifier_formats_as_uuid() {
        let department_id = DepartmentId::new();
        assert_eq!(department_id.to_string().len(), 36);
    }

    #[test]
    fn identifier_parse_rejects_garbage() {
        let parsed = UserId::from_str("auto-assign");
        assert!(parsed.is_err());
    }

    #[test]
    fn identifier_serializes_transparently() {
        let user_id = UserId::new();
        let json = serde_json::to_string(&user_id).unwrap_or_default();
        assert_eq!(json, format!("\"{user_id}\""));
    }
}
