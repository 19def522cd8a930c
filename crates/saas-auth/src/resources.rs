//! # Resource Types
//!
//! Defines the kinds of tenant entities a rule or a check can target.

use serde::{Deserialize, Serialize};

/// Resource types that can have rules assigned.
///
/// A resource type can be checked on its own ("may I create *any* project")
/// or through a concrete [`ResourceView`](crate::views::ResourceView) carrying
/// the attributes conditions need.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// The tenant itself.
    Organization,
    /// Projects within an organization.
    Project,
    /// Subscription and invoicing for an organization.
    Billing,
    /// User accounts.
    User,
    /// Organization memberships.
    Member,
}

impl ResourceType {
    /// Get the string representation of the resource type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Organization => "organization",
            ResourceType::Project => "project",
            ResourceType::Billing => "billing",
            ResourceType::User => "user",
            ResourceType::Member => "member",
        }
    }

    /// Get a human-readable display name for the resource type.
    ///
    /// # Example
    ///
    /// ```
    /// use saas_auth::resources::ResourceType;
    ///
    /// assert_eq!(ResourceType::Project.display_name(), "Project");
    /// ```
    pub fn display_name(&self) -> &'static str {
        match self {
            ResourceType::Organization => "Organization",
            ResourceType::Project => "Project",
            ResourceType::Billing => "Billing",
            ResourceType::User => "User",
            ResourceType::Member => "Member",
        }
    }

    /// Parse resource type from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive, supports plurals)
    ///
    /// # Returns
    ///
    /// `Some(ResourceType)` if valid, `None` otherwise
    ///
    /// # Example
    ///
    /// ```
    /// use saas_auth::resources::ResourceType;
    ///
    /// assert_eq!(ResourceType::parse("Project"), Some(ResourceType::Project));
    /// assert_eq!(ResourceType::parse("orgs"), Some(ResourceType::Organization));
    /// assert_eq!(ResourceType::parse("invoice"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "organization" | "organizations" | "org" | "orgs" => Some(ResourceType::Organization),
            "project" | "projects" => Some(ResourceType::Project),
            "billing" => Some(ResourceType::Billing),
            "user" | "users" => Some(ResourceType::User),
            "member" | "members" | "membership" => Some(ResourceType::Member),
            _ => None,
        }
    }

    /// Get all resource types.
    pub fn all() -> Vec<Self> {
        vec![
            ResourceType::Organization,
            ResourceType::Project,
            ResourceType::Billing,
            ResourceType::User,
            ResourceType::Member,
        ]
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
