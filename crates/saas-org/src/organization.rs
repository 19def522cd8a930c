//! Organization domain models
//!
//! This module provides the Organization entity, the top-level tenant that
//! owns projects and members.

use chrono::{DateTime, Utc};
use saas_auth::{OrganizationView, ResourceView};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An organization represents a tenant in the multi-tenant system.
///
/// Users can belong to multiple organizations with different roles.
/// Exactly one user owns an organization at a time.
///
/// # Architecture
///
/// ```text
/// Organization
///   ├─ Members (role per user)
///   └─ Projects (owned by a member)
/// ```
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use saas_org::Organization;
///
/// let owner_id = Uuid::now_v7();
/// let org = Organization::new("Acme Corp", "acme-corp", owner_id);
/// assert_eq!(org.name, "Acme Corp");
/// assert!(org.is_owned_by(owner_id));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Organization {
    /// Unique identifier for the organization
    pub id: Uuid,

    /// Human-readable name
    pub name: String,

    /// URL-friendly slug (unique across platform)
    pub slug: String,

    /// Email domain claimed by the organization (unique across platform)
    pub domain: Option<String>,

    /// Whether users signing up with a matching email domain join automatically
    pub should_attach_users_by_domain: bool,

    /// Avatar URL for branding
    pub avatar_url: Option<String>,

    /// Owner user ID
    pub owner_id: Uuid,

    /// When the organization was created
    pub created_at: DateTime<Utc>,

    /// When the organization was last updated
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    /// Creates a new organization.
    ///
    /// # Arguments
    ///
    /// * `name` - The organization name
    /// * `slug` - URL-friendly slug (must be unique)
    /// * `owner_id` - The user ID who owns this organization
    pub fn new(name: impl Into<String>, slug: impl Into<String>, owner_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            slug: slug.into(),
            domain: None,
            should_attach_users_by_domain: false,
            avatar_url: None,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the claimed email domain.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Check if a user owns the organization.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    /// Authorization view of this organization.
    pub fn auth_view(&self) -> ResourceView {
        OrganizationView {
            id: self.id,
            owner_id: Some(self.owner_id),
            domain: self.domain.clone(),
            should_attach_users_by_domain: self.should_attach_users_by_domain,
        }
        .into_view()
    }

    /// Mark the organization as modified.
    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
