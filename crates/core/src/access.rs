//! Roles and the capabilities they grant.
//!
//! Route handlers never branch on a role directly. They ask whether the
//! caller's role grants a [`Capability`] and fail with an authorization
//! error otherwise.

use serde::{Deserialize, Serialize};

use crate::errors::{WashError, WashResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
    Customer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ViewAvailability,
    CreateBooking,
    ViewBookings,
    ManageBookings,
    StreamEvents,
    ManageSettings,
}

impl Role {
    pub fn grants(self, capability: Capability) -> bool {
        match capability {
            Capability::ViewAvailability | Capability::CreateBooking => true,
            Capability::ViewBookings | Capability::ManageBookings | Capability::StreamEvents => {
                matches!(self, Role::Admin | Role::Staff)
            }
            Capability::ManageSettings => self == Role::Admin,
        }
    }

    /// Returns an authorization error unless the role grants `capability`.
    pub fn require(self, capability: Capability) -> WashResult<()> {
        if self.grants(capability) {
            Ok(())
        } else {
            Err(WashError::Authorization(format!(
                "Role {:?} is not allowed to {:?}",
                self, capability
            )))
        }
    }
}
