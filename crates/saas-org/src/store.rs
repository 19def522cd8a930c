//! Persistence boundary for organization services
//!
//! [`OrganizationStore`] is everything the services need from the database.
//! [`InMemoryStore`] implements it for tests and local development.

use async_trait::async_trait;
use saas_auth::Role;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{OrgError, OrgResult};
use crate::membership::Member;
use crate::organization::Organization;
use crate::project::Project;

/// Storage operations used by the organization services.
#[async_trait]
pub trait OrganizationStore: Send + Sync {
    /// Find an organization by slug.
    async fn find_organization_by_slug(&self, slug: &str) -> OrgResult<Option<Organization>>;

    /// Insert a new organization together with its owner's membership.
    ///
    /// Fails with `BadRequest` when the slug or the claimed domain is already
    /// used by another organization. The check and the write are atomic.
    async fn insert_organization(&self, organization: Organization, owner: Member)
        -> OrgResult<()>;

    /// Update an existing organization's details.
    ///
    /// The owner, slug and creation time are left untouched. Fails with `BadRequest` when the domain is claimed by another
    /// organization. The check and the write are atomic.
    async fn update_organization(&self, organization: Organization) -> OrgResult<()>;

    /// Find a user's membership in an organization.
    async fn find_membership(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> OrgResult<Option<Member>>;

    /// Insert a membership.
    async fn insert_member(&self, member: Member) -> OrgResult<()>;

    /// Insert a project.
    async fn insert_project(&self, project: Project) -> OrgResult<()>;

    /// Find a project within an organization.
    async fn find_project(
        &self,
        organization_id: Uuid,
        project_id: Uuid,
    ) -> OrgResult<Option<Project>>;

    /// Replace an existing project.
    async fn update_project(&self, project: Project) -> OrgResult<()>;

    /// Delete a project.
    async fn delete_project(&self, project_id: Uuid) -> OrgResult<()>;

    /// Atomically hand an organization from `current_owner_id` to `new_owner_id`.
    ///
    /// Sets the organization owner, promotes the new owner's membership to
    /// `OWNER` and demotes the previous owner's membership to `ADMIN`.
    /// Fails with `Forbidden` when `current_owner_id` no longer owns the
    /// organization, and with `BadRequest` when the target is not a member.
    async fn transfer_ownership(
        &self,
        organization_id: Uuid,
        current_owner_id: Uuid,
        new_owner_id: Uuid,
    ) -> OrgResult<()>;
}

/// Message for a domain claimed by another organization.
pub const DOMAIN_TAKEN: &str = "Another organization with same domain already exists.";

/// Message for a transfer attempted by someone who no longer owns the organization.
pub const NOT_OWNER: &str = "Only the organization owner can transfer ownership.";

#[derive(Debug, Default)]
struct State {
    organizations: HashMap<Uuid, Organization>,
    members: HashMap<(Uuid, Uuid), Member>,
    projects: HashMap<Uuid, Project>,
}

impl State {
    fn domain_taken(&self, organization: &Organization) -> bool {
        let Some(domain) = organization.domain.as_deref() else {
            return false;
        };
        self.organizations
            .values()
            .any(|org| org.id != organization.id && org.domain.as_deref() == Some(domain))
    }
}

/// In-memory store.
///
/// All writes go through a single lock, so multi-row operations such as
/// ownership transfer are atomic.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of projects in an organization.
    pub async fn project_count(&self, organization_id: Uuid) -> usize {
        self.state
            .read()
            .await
            .projects
            .values()
            .filter(|p| p.organization_id == organization_id)
            .count()
    }
}

#[async_trait]
impl OrganizationStore for InMemoryStore {
    async fn find_organization_by_slug(&self, slug: &str) -> OrgResult<Option<Organization>> {
        let state = self.state.read().await;
        Ok(state
            .organizations
            .values()
            .find(|org| org.slug == slug)
            .cloned())
    }

    async fn insert_organization(
        &self,
        organization: Organization,
        owner: Member,
    ) -> OrgResult<()> {
        let mut state = self.state.write().await;
        if state
            .organizations
            .values()
            .any(|org| org.slug == organization.slug)
        {
            return Err(OrgError::BadRequest(format!(
                "Organization slug `{}` is already taken.",
                organization.slug
            )));
        }
        if state.domain_taken(&organization) {
            return Err(OrgError::BadRequest(DOMAIN_TAKEN.into()));
        }
        state
            .members
            .insert((owner.organization_id, owner.user_id), owner);
        state.organizations.insert(organization.id, organization);
        Ok(())
    }

    async fn update_organization(&self, organization: Organization) -> OrgResult<()> {
        let mut state = self.state.write().await;
        if state.domain_taken(&organization) {
            return Err(OrgError::BadRequest(DOMAIN_TAKEN.into()));
        }
        match state.organizations.get_mut(&organization.id) {
            Some(existing) => {
                // Ownership only changes through `transfer_ownership`.
                existing.name = organization.name;
                existing.domain = organization.domain;
                existing.should_attach_users_by_domain = organization.should_attach_users_by_domain;
                existing.avatar_url = organization.avatar_url;
                existing.updated_at = organization.updated_at;
                Ok(())
            }
            None => Err(OrgError::NotFound("Organization not found.".into())),
        }
    }

    async fn find_membership(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> OrgResult<Option<Member>> {
        let state = self.state.read().await;
        Ok(state.members.get(&(organization_id, user_id)).cloned())
    }

    async fn insert_member(&self, member: Member) -> OrgResult<()> {
        let mut state = self.state.write().await;
        if !state.organizations.contains_key(&member.organization_id) {
            return Err(OrgError::NotFound("Organization not found.".into()));
        }
        state
            .members
            .insert((member.organization_id, member.user_id), member);
        Ok(())
    }

    async fn insert_project(&self, project: Project) -> OrgResult<()> {
        let mut state = self.state.write().await;
        state.projects.insert(project.id, project);
        Ok(())
    }

    async fn find_project(
        &self,
        organization_id: Uuid,
        project_id: Uuid,
    ) -> OrgResult<Option<Project>> {
        let state = self.state.read().await;
        Ok(state
            .projects
            .get(&project_id)
            .filter(|p| p.organization_id == organization_id)
            .cloned())
    }

    async fn update_project(&self, project: Project) -> OrgResult<()> {
        let mut state = self.state.write().await;
        match state.projects.get_mut(&project.id) {
            Some(existing) => {
                *existing = project;
                Ok(())
            }
            None => Err(OrgError::NotFound("Project not found.".into())),
        }
    }

    async fn delete_project(&self, project_id: Uuid) -> OrgResult<()> {
        let mut state = self.state.write().await;
        state
            .projects
            .remove(&project_id)
            .map(|_| ())
            .ok_or_else(|| OrgError::NotFound("Project not found.".into()))
    }

    async fn transfer_ownership(
        &self,
        organization_id: Uuid,
        current_owner_id: Uuid,
        new_owner_id: Uuid,
    ) -> OrgResult<()> {
        let mut state = self.state.write().await;

        let previous_owner_id = state
            .organizations
            .get(&organization_id)
            .map(|org| org.owner_id)
            .ok_or_else(|| OrgError::NotFound("Organization not found.".into()))?;

        let still_owner = previous_owner_id == current_owner_id
            && state
                .members
                .get(&(organization_id, current_owner_id))
                .is_some_and(|member| member.role == Role::Owner);
        if !still_owner {
            return Err(OrgError::Forbidden(NOT_OWNER.into()));
        }

        if !state.members.contains_key(&(organization_id, new_owner_id)) {
            return Err(OrgError::BadRequest(
                "Target user is not a member of this organization".into(),
            ));
        }

        // Validated above; mutate only after every check passes.
        if let Some(member) = state.members.get_mut(&(organization_id, new_owner_id)) {
            member.role = Role::Owner;
        }
        if previous_owner_id != new_owner_id {
            if let Some(member) = state.members.get_mut(&(organization_id, previous_owner_id)) {
                member.role = Role::Admin;
            }
        }
        if let Some(org) = state.organizations.get_mut(&organization_id) {
            org.owner_id = new_owner_id;
            org.touch();
        }

        Ok(())
    }
}
