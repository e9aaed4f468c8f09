//! User directory entities.

use crate::model::identifiers::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Authorization role of a user account.
///
/// Wire names keep the backend's `ROLE_` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    /// Administrative account.
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
    /// Regular customer account.
    #[serde(rename = "ROLE_CUSTOMER")]
    Customer,
}

impl UserRole {
    /// The wire name of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ROLE_ADMIN",
            UserRole::Customer => "ROLE_CUSTOMER",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the users list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// User identifier.
    pub id: UserId,
    /// Account email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Authorization role.
    pub role: UserRole,
    /// Whether the account is activated.
    pub enabled: bool,
}
