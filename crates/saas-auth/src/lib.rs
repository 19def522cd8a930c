//! # SaaS Authorization
//!
//! This crate is the authorization policy engine of the SaaS platform.
//! Route handlers ask it one question: may this subject perform this action
//! on this resource?
//!
//! ## Overview
//!
//! The saas-auth crate handles:
//! - **Roles**: The closed set of organization roles
//! - **Actions** and **Resources**: The vocabulary of checks
//! - **Grant Rules**: Declarative allow/deny rules with optional conditions
//! - **Role Catalog**: The validated, process-wide role to rules table
//! - **Abilities**: Per-request compiled rule lists answering `can`/`cannot`
//! - **Views**: Validated authorization snapshots of tenant entities
//!
//! ## Architecture
//!
//! ```text
//! Subject { id, role }
//!   └─ AbilityCompiler ── RoleCatalog::grants_for(role) [+ overrides]
//!         └─ Ability
//!               └─ can(action, ResourceType | &ResourceView) -> bool
//!
//! raw entity ── to_view(type, json) ──→ ResourceView
//! ```
//!
//! ## Decision Rules
//!
//! 1. Keep the rules whose resource type matches and whose actions include
//!    the requested action or `manage`.
//! 2. Drop conditional rules when the target is a bare type, and rules whose
//!    condition does not hold for the instance.
//! 3. The last remaining rule decides. No remaining rule means deny.
//!
//! ## Usage
//!
//! ```rust
//! use saas_auth::{compile_ability, Action, ProjectView, ResourceType, Role};
//! use uuid::Uuid;
//!
//! let user_id = Uuid::now_v7();
//! let ability = compile_ability(user_id, Role::Member).unwrap();
//!
//! if ability.cannot(Action::Create, ResourceType::Project) {
//!     // the route handler answers 403
//! }
//!
//! let project = ProjectView::new(Uuid::now_v7(), user_id).into_view();
//! assert!(ability.can(Action::Update, &project));
//! ```

pub mod ability;
pub mod actions;
pub mod catalog;
pub mod error;
pub mod resources;
pub mod role;
pub mod rule;
pub mod views;

// Re-export main types for convenience
pub use ability::{
    compile_ability, compile_ability_for_role_name, Ability, AbilityCompiler, Decision, Subject,
};
pub use actions::Action;
pub use catalog::RoleCatalog;
pub use error::{ConfigurationError, PolicyError, PolicyResult, ValidationError};
pub use resources::ResourceType;
pub use role::Role;
pub use rule::{Condition, Effect, GrantRule};
pub use views::{
    to_view, BillingView, MemberView, OrganizationView, ProjectView, ResourceView, Target,
    UserView,
};
