//! Project domain models
//!
//! Projects group work inside an organization. Every project has an owner,
//! which is what lets regular members edit their own projects only.

use chrono::{DateTime, Utc};
use saas_auth::{ProjectView, ResourceView};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A project within an organization.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use saas_org::Project;
///
/// let org_id = Uuid::now_v7();
/// let user_id = Uuid::now_v7();
/// let project = Project::new(org_id, "Marketing Docs", "marketing-docs", user_id);
/// assert_eq!(project.name, "Marketing Docs");
/// assert_eq!(project.owner_id, user_id);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    /// Unique identifier for the project
    pub id: Uuid,

    /// Organization this project belongs to
    pub organization_id: Uuid,

    /// Human-readable name
    pub name: String,

    /// URL-friendly slug
    pub slug: String,

    /// Project description
    pub description: String,

    /// Avatar URL
    pub avatar_url: Option<String>,

    /// User who owns the project
    pub owner_id: Uuid,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new project owned by `owner_id`.
    ///
    /// # Arguments
    ///
    /// * `organization_id` - The parent organization
    /// * `name` - Project name
    /// * `slug` - URL-friendly slug
    /// * `owner_id` - User who owns the project
    pub fn new(
        organization_id: Uuid,
        name: impl Into<String>,
        slug: impl Into<String>,
        owner_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            organization_id,
            name: name.into(),
            slug: slug.into(),
            description: String::new(),
            avatar_url: None,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Authorization view of this project.
    pub fn auth_view(&self) -> ResourceView {
        ProjectView::new(self.id, self.owner_id)
            .in_organization(self.organization_id)
            .into_view()
    }

    /// Mark the project as modified.
    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
