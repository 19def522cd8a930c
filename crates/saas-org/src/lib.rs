//! # SaaS Organization Management
//!
//! Multi-tenant organization and project services, authorized by the
//! `saas-auth` policy engine.
//!
//! ## Overview
//!
//! The saas-org crate handles:
//! - **Organizations**: Top-level tenant entities, optionally claiming an email domain
//! - **Projects**: Workspaces owned by a member within an organization
//! - **Members**: User-organization relationships carrying a [`saas_auth::Role`]
//! - **Services**: Operations that check the caller's ability before touching storage
//! - **Config**: Environment-driven API configuration and policy catalog loading
//!
//! ## Architecture
//!
//! ```text
//! OrganizationService
//!   ├─ membership(user, slug) ─→ Member (role)
//!   ├─ compile_ability(user, role) ─→ Ability
//!   ├─ ability.decide(action, entity.auth_view())
//!   └─ OrganizationStore (InMemoryStore, database)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use saas_auth::{compile_ability, Action, Role};
//! use saas_org::{Organization, Project};
//! use uuid::Uuid;
//!
//! let owner_id = Uuid::now_v7();
//! let org = Organization::new("Acme Corp", "acme-corp", owner_id);
//! let project = Project::new(org.id, "Marketing Docs", "marketing-docs", owner_id);
//!
//! let member = compile_ability(owner_id, Role::Member).unwrap();
//! assert!(member.can(Action::Delete, &project.auth_view()));
//! assert!(member.cannot(Action::Update, &org.auth_view()));
//! ```

pub mod config;
pub mod error;
pub mod membership;
pub mod organization;
pub mod project;
pub mod service;
pub mod slug;
pub mod store;

// Re-export main types for convenience
pub use config::{ApiConfig, ConfigError, GithubOAuthConfig};
pub use error::{OrgError, OrgResult};
pub use membership::Member;
pub use organization::Organization;
pub use project::Project;
pub use service::{
    CreateOrganization, CreateProject, OrganizationService, UpdateOrganization, UpdateProject,
};
pub use slug::create_slug;
pub use store::{InMemoryStore, OrganizationStore};
