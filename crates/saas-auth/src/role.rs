//! Organization roles
//!
//! A role is a permission template a user holds inside one organization.
//! It is not an identity; the same user may hold different roles in
//! different organizations.

use serde::{Deserialize, Serialize};

/// User role within an organization.
///
/// # Permission Model
///
/// - **Owner**: Full control, including transferring the organization
/// - **Admin**: Manages projects, members, billing and organization settings
/// - **Member**: Creates projects and edits the ones they own
/// - **Billing**: Reads and updates billing only
///
/// # Examples
///
/// ```
/// use saas_auth::Role;
///
/// assert_eq!(Role::parse("admin"), Some(Role::Admin));
/// assert_eq!(Role::Billing.as_str(), "BILLING");
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Full organization control
    Owner,

    /// Organization administration without ownership transfer
    Admin,

    /// Regular organization member
    Member,

    /// Billing contact
    Billing,
}

impl Role {
    /// Parse role from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive)
    ///
    /// # Returns
    ///
    /// `Some(Role)` if valid, `None` otherwise
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "OWNER" => Some(Self::Owner),
            "ADMIN" => Some(Self::Admin),
            "MEMBER" => Some(Self::Member),
            "BILLING" => Some(Self::Billing),
            _ => None,
        }
    }

    /// Get string representation of the role, as stored on memberships.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "OWNER",
            Self::Admin => "ADMIN",
            Self::Member => "MEMBER",
            Self::Billing => "BILLING",
        }
    }

    /// Get all roles.
    pub fn all() -> Vec<Self> {
        vec![Self::Owner, Self::Admin, Self::Member, Self::Billing]
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::Member
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
