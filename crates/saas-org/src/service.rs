//! Organization and project services
//!
//! Each operation resolves the caller's membership, compiles an ability from
//! the membership role, checks it, and only then touches the store. A denial
//! becomes [`OrgError::Forbidden`] carrying the deciding rule's reason when it
//! has one, otherwise the operation's own message.

use saas_auth::{compile_ability, Ability, Action, ResourceType, Role, Target};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{OrgError, OrgResult};
use crate::membership::Member;
use crate::organization::Organization;
use crate::project::Project;
use crate::slug::create_slug;
use crate::store::OrganizationStore;

/// Input for creating an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganization {
    /// Organization name
    pub name: String,
    /// Email domain to claim
    pub domain: Option<String>,
    /// Auto-join users with a matching email domain
    #[serde(default)]
    pub should_attach_users_by_domain: Option<bool>,
}

/// Input for updating an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOrganization {
    /// New name
    pub name: String,
    /// New domain; `None` clears it
    pub domain: Option<String>,
    /// New auto-join flag; `None` keeps the current value
    #[serde(default)]
    pub should_attach_users_by_domain: Option<bool>,
}

/// Input for creating a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    /// Project name
    pub name: String,
    /// Project description
    pub description: String,
}

/// Input for updating a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProject {
    /// New name
    pub name: String,
    /// New description
    pub description: String,
}

/// Organization and project operations gated by the policy engine.
///
/// # Example
///
/// ```rust,no_run
/// use saas_org::{CreateOrganization, CreateProject, InMemoryStore, OrganizationService};
/// use uuid::Uuid;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), saas_org::OrgError> {
/// let service = OrganizationService::new(InMemoryStore::new());
/// let owner = Uuid::now_v7();
///
/// service
///     .create_organization(owner, CreateOrganization {
///         name: "Acme Corp".into(),
///         domain: None,
///         should_attach_users_by_domain: None,
///     })
///     .await?;
///
/// let project_id = service
///     .create_project(owner, "acme-corp", CreateProject {
///         name: "Website".into(),
///         description: "Marketing site".into(),
///     })
///     .await?;
/// # let _ = project_id;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct OrganizationService<S> {
    store: S,
}

impl<S: OrganizationStore> OrganizationService<S> {
    /// Create a service over a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve a user's membership in the organization identified by `slug`.
    pub async fn membership(&self, user_id: Uuid, slug: &str) -> OrgResult<(Organization, Member)> {
        let organization = self
            .store
            .find_organization_by_slug(slug)
            .await?
            .ok_or_else(|| OrgError::NotFound("Organization not found.".into()))?;

        let member = self
            .store
            .find_membership(organization.id, user_id)
            .await?
            .ok_or_else(|| {
                OrgError::Unauthorized("You're not a member of this organization.".into())
            })?;

        Ok((organization, member))
    }

    /// Compile the caller's ability within their membership.
    pub fn ability_for(&self, member: &Member) -> OrgResult<Ability> {
        Ok(compile_ability(member.user_id, member.role)?)
    }

    /// Create an organization owned by the caller.
    ///
    /// Any authenticated user may create an organization; the caller becomes
    /// its `OWNER`. A domain claimed by another organization is rejected.
    pub async fn create_organization(
        &self,
        user_id: Uuid,
        input: CreateOrganization,
    ) -> OrgResult<Uuid> {
        let mut organization = Organization::new(&input.name, create_slug(&input.name), user_id);
        organization.domain = input.domain;
        organization.should_attach_users_by_domain =
            input.should_attach_users_by_domain.unwrap_or(false);

        let id = organization.id;
        let owner = Member::new(id, user_id, Role::Owner);
        self.store.insert_organization(organization, owner).await?;

        tracing::info!(organization = %id, owner = %user_id, "organization created");
        Ok(id)
    }

    /// Update organization details.
    ///
    /// Requires `update` on the organization. A domain already claimed by
    /// another organization is rejected.
    pub async fn update_organization(
        &self,
        user_id: Uuid,
        slug: &str,
        input: UpdateOrganization,
    ) -> OrgResult<()> {
        let (mut organization, member) = self.membership(user_id, slug).await?;
        let ability = self.ability_for(&member)?;

        let view = organization.auth_view();
        ensure(
            &ability,
            Action::Update,
            &view,
            "You're not allowed to update this organization.",
        )?;

        organization.name = input.name;
        organization.domain = input.domain;
        if let Some(attach) = input.should_attach_users_by_domain {
            organization.should_attach_users_by_domain = attach;
        }
        organization.touch();

        let id = organization.id;
        self.store.update_organization(organization).await?;

        tracing::info!(organization = %id, user = %user_id, "organization updated");
        Ok(())
    }

    /// Transfer organization ownership to another member.
    ///
    /// Requires `transfer_ownership` on the organization. The target must
    /// already be a member; they become `OWNER` and the previous owner
    /// becomes `ADMIN`. The store re-checks that the caller still owns the
    /// organization when the transfer is written.
    pub async fn transfer_organization(
        &self,
        user_id: Uuid,
        slug: &str,
        transfer_to_user_id: Uuid,
    ) -> OrgResult<()> {
        let (organization, member) = self.membership(user_id, slug).await?;
        let ability = self.ability_for(&member)?;

        let view = organization.auth_view();
        ensure(
            &ability,
            Action::TransferOwnership,
            &view,
            "You're not allowed to transfer this organization ownership.",
        )?;

        self.store
            .transfer_ownership(organization.id, user_id, transfer_to_user_id)
            .await?;

        tracing::info!(
            organization = %organization.id,
            from = %user_id,
            to = %transfer_to_user_id,
            "organization ownership transferred"
        );
        Ok(())
    }

    /// Create a project owned by the caller.
    ///
    /// Requires `create` on projects in general.
    pub async fn create_project(
        &self,
        user_id: Uuid,
        slug: &str,
        input: CreateProject,
    ) -> OrgResult<Uuid> {
        let (organization, member) = self.membership(user_id, slug).await?;
        let ability = self.ability_for(&member)?;

        ensure(
            &ability,
            Action::Create,
            ResourceType::Project,
            "You're not allowed to create new projects.",
        )?;

        let project = Project::new(
            organization.id,
            &input.name,
            create_slug(&input.name),
            user_id,
        )
        .with_description(input.description);

        let id = project.id;
        self.store.insert_project(project).await?;

        tracing::info!(organization = %organization.id, project = %id, owner = %user_id, "project created");
        Ok(id)
    }

    /// Update a project.
    ///
    /// Requires `update` on the project; members may only update their own.
    pub async fn update_project(
        &self,
        user_id: Uuid,
        slug: &str,
        project_id: Uuid,
        input: UpdateProject,
    ) -> OrgResult<()> {
        let (organization, member) = self.membership(user_id, slug).await?;
        let ability = self.ability_for(&member)?;
        let mut project = self.find_project(organization.id, project_id).await?;

        let view = project.auth_view();
        ensure(
            &ability,
            Action::Update,
            &view,
            "You're not allowed to update this project.",
        )?;

        project.name = input.name;
        project.description = input.description;
        project.touch();
        self.store.update_project(project).await?;

        tracing::info!(project = %project_id, user = %user_id, "project updated");
        Ok(())
    }

    /// Delete a project.
    ///
    /// Requires `delete` on the project; members may only delete their own.
    pub async fn delete_project(&self, user_id: Uuid, slug: &str, project_id: Uuid) -> OrgResult<()> {
        let (organization, member) = self.membership(user_id, slug).await?;
        let ability = self.ability_for(&member)?;
        let project = self.find_project(organization.id, project_id).await?;

        let view = project.auth_view();
        ensure(
            &ability,
            Action::Delete,
            &view,
            "You're not allowed to delete this project.",
        )?;

        self.store.delete_project(project.id).await?;

        tracing::info!(project = %project_id, user = %user_id, "project deleted");
        Ok(())
    }

    async fn find_project(&self, organization_id: Uuid, project_id: Uuid) -> OrgResult<Project> {
        self.store
            .find_project(organization_id, project_id)
            .await?
            .ok_or_else(|| OrgError::NotFound("Project not found.".into()))
    }
}

/// Turn a denial into `Forbidden`.
fn ensure<'t>(
    ability: &Ability,
    action: Action,
    target: impl Into<Target<'t>>,
    message: &str,
) -> OrgResult<()> {
    let target = target.into();
    let decision = ability.decide(action, target);
    if decision.allowed {
        return Ok(());
    }

    let reason = decision.reason().unwrap_or(message);
    tracing::warn!(
        user = %ability.subject().id,
        role = %ability.subject().role,
        action = %action,
        resource = %target.resource_type(),
        reason = %reason,
        "request denied"
    );
    Err(OrgError::Forbidden(reason.to_string()))
}
