//! Membership domain models
//!
//! A membership links a user to an organization and carries the role the
//! user holds there. The role on the membership is what the policy engine
//! compiles abilities from.

use chrono::{DateTime, Utc};
use saas_auth::{MemberView, ResourceView, Role};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Organization membership linking a user to an organization.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use saas_auth::Role;
/// use saas_org::Member;
///
/// let org_id = Uuid::now_v7();
/// let user_id = Uuid::now_v7();
/// let member = Member::new(org_id, user_id, Role::Member);
/// assert_eq!(member.role, Role::Member);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Member {
    /// Unique membership ID
    pub id: Uuid,

    /// Organization ID
    pub organization_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role within the organization
    pub role: Role,

    /// When the user joined
    pub joined_at: DateTime<Utc>,
}

impl Member {
    /// Creates a new membership.
    ///
    /// # Arguments
    ///
    /// * `organization_id` - The organization ID
    /// * `user_id` - The user ID
    /// * `role` - The user's role in the organization
    pub fn new(organization_id: Uuid, user_id: Uuid, role: Role) -> Self {
        Self {
            id: Uuid::now_v7(),
            organization_id,
            user_id,
            role,
            joined_at: Utc::now(),
        }
    }

    /// Authorization view of this membership.
    pub fn auth_view(&self) -> ResourceView {
        MemberView {
            id: self.id,
            organization_id: Some(self.organization_id),
            user_id: self.user_id,
            role: self.role,
        }
        .into_view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use saas_auth::ResourceType;

    #[test]
    fn test_member_creation() {
        let org_id = Uuid::now_v7();
        let user_id = Uuid::now_v7();
        let member = Member::new(org_id, user_id, Role::Billing);

        assert_eq!(member.organization_id, org_id);
        assert_eq!(member.user_id, user_id);
        assert_eq!(member.role, Role::Billing);
    }

    #[test]
    fn test_member_view_is_owned_by_the_user() {
        let user_id = Uuid::now_v7();
        let member = Member::new(Uuid::now_v7(), user_id, Role::Member);
        let view = member.auth_view();

        assert_eq!(view.resource_type(), ResourceType::Member);
        assert_eq!(view.owner_id(), Some(user_id));
    }

    #[test]
    fn test_role_serializes_in_storage_format() {
        let member = Member::new(Uuid::now_v7(), Uuid::now_v7(), Role::Admin);
        let json = serde_json::to_value(&member).unwrap();
        assert_eq!(json["role"], "ADMIN");
    }
}
