//! User domain models.

use serde::{Deserialize, Serialize};

/// Back-office role of the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    SuperAdmin,
    Admin,
    #[default]
    Staff,
}

impl UserRole {
    pub fn label(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "Super Admin",
            UserRole::Admin => "Admin",
            UserRole::Staff => "Staff",
        }
    }

    /// Staff record payments but never classify them as service charge.
    pub fn can_allocate_service_charge(&self) -> bool {
        !matches!(self, UserRole::Staff)
    }

    /// Only admins may ask the server to rebuild an admission's totals.
    pub fn can_recalculate(&self) -> bool {
        matches!(self, UserRole::SuperAdmin | UserRole::Admin)
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "super_admin" => Ok(UserRole::SuperAdmin),
            "admin" => Ok(UserRole::Admin),
            "staff" => Ok(UserRole::Staff),
            other => Err(format!("Unknown role '{}'", other)),
        }
    }
}

/// The signed-in user, as returned by the profile endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub role: UserRole,
}
