//! # Resource Authorization Views
//!
//! Minimal, validated snapshots of tenant entities carrying only the
//! attributes rule conditions look at. Views are built by callers after the
//! entity has been fetched; the engine never mutates or re-fetches them.
//!
//! [`to_view`] is the boundary where raw rows enter the engine. It rejects
//! entities whose authorization fields are absent or malformed, so a missing
//! `ownerId` is reported instead of being read as "no owner".

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{PolicyResult, ValidationError};
use crate::resources::ResourceType;
use crate::role::Role;

/// Authorization view of an organization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrganizationView {
    /// Organization ID
    pub id: Uuid,
    /// Owning user
    pub owner_id: Option<Uuid>,
    /// Verified email domain, if any
    pub domain: Option<String>,
    /// Whether users with a matching email domain join automatically
    pub should_attach_users_by_domain: bool,
}

impl OrganizationView {
    /// Create a view of an organization owned by `owner_id`.
    pub fn new(id: Uuid, owner_id: Uuid) -> Self {
        Self {
            id,
            owner_id: Some(owner_id),
            domain: None,
            should_attach_users_by_domain: false,
        }
    }

    /// Wrap into a [`ResourceView`].
    pub fn into_view(self) -> ResourceView {
        ResourceView::Organization(self)
    }
}

/// Authorization view of a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectView {
    /// Project ID
    pub id: Uuid,
    /// Organization the project belongs to
    pub organization_id: Option<Uuid>,
    /// Owning user
    pub owner_id: Option<Uuid>,
}

impl ProjectView {
    /// Create a view of a project owned by `owner_id`.
    pub fn new(id: Uuid, owner_id: Uuid) -> Self {
        Self {
            id,
            organization_id: None,
            owner_id: Some(owner_id),
        }
    }

    /// Set the owning organization.
    pub fn in_organization(mut self, organization_id: Uuid) -> Self {
        self.organization_id = Some(organization_id);
        self
    }

    /// Wrap into a [`ResourceView`].
    pub fn into_view(self) -> ResourceView {
        ResourceView::Project(self)
    }
}

/// Authorization view of a user account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserView {
    /// User ID
    pub id: Uuid,
}

impl UserView {
    /// Create a view of a user.
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }

    /// Wrap into a [`ResourceView`].
    pub fn into_view(self) -> ResourceView {
        ResourceView::User(self)
    }
}

/// Authorization view of an organization's billing record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BillingView {
    /// Billing record ID
    pub id: Uuid,
    /// Organization being billed
    pub organization_id: Option<Uuid>,
    /// Subscribed plan
    pub plan_id: Option<String>,
}

impl BillingView {
    /// Create a view of a billing record.
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            organization_id: None,
            plan_id: None,
        }
    }

    /// Wrap into a [`ResourceView`].
    pub fn into_view(self) -> ResourceView {
        ResourceView::Billing(self)
    }
}

/// Authorization view of an organization membership.
///
/// A membership is owned by the user it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemberView {
    /// Membership ID
    pub id: Uuid,
    /// Organization the membership belongs to
    pub organization_id: Option<Uuid>,
    /// Member user
    pub user_id: Uuid,
    /// Role held through this membership
    pub role: Role,
}

impl MemberView {
    /// Create a view of a membership.
    pub fn new(id: Uuid, user_id: Uuid, role: Role) -> Self {
        Self {
            id,
            organization_id: None,
            user_id,
            role,
        }
    }

    /// Wrap into a [`ResourceView`].
    pub fn into_view(self) -> ResourceView {
        ResourceView::Member(self)
    }
}

/// A concrete resource instance as seen by the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResourceView {
    /// Organization instance
    Organization(OrganizationView),
    /// Project instance
    Project(ProjectView),
    /// User instance
    User(UserView),
    /// Billing instance
    Billing(BillingView),
    /// Membership instance
    Member(MemberView),
}

impl ResourceView {
    /// Resource type of this instance.
    pub fn resource_type(&self) -> ResourceType {
        match self {
            ResourceView::Organization(_) => ResourceType::Organization,
            ResourceView::Project(_) => ResourceType::Project,
            ResourceView::User(_) => ResourceType::User,
            ResourceView::Billing(_) => ResourceType::Billing,
            ResourceView::Member(_) => ResourceType::Member,
        }
    }

    /// Instance identifier.
    pub fn id(&self) -> Uuid {
        match self {
            ResourceView::Organization(v) => v.id,
            ResourceView::Project(v) => v.id,
            ResourceView::User(v) => v.id,
            ResourceView::Billing(v) => v.id,
            ResourceView::Member(v) => v.id,
        }
    }

    /// Owning user, when the resource kind has one and it is known.
    pub fn owner_id(&self) -> Option<Uuid> {
        match self {
            ResourceView::Organization(v) => v.owner_id,
            ResourceView::Project(v) => v.owner_id,
            ResourceView::Member(v) => Some(v.user_id),
            ResourceView::User(_) | ResourceView::Billing(_) => None,
        }
    }
}

/// What a check is aimed at: a whole resource type or one instance.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    /// Any instance of the type; only unconditional rules can match.
    Type(ResourceType),
    /// A concrete instance.
    Instance(&'a ResourceView),
}

impl Target<'_> {
    /// Resource type being checked.
    pub fn resource_type(&self) -> ResourceType {
        match self {
            Target::Type(resource) => *resource,
            Target::Instance(view) => view.resource_type(),
        }
    }

    /// Instance identifier, if the target is an instance.
    pub fn instance_id(&self) -> Option<Uuid> {
        match self {
            Target::Type(_) => None,
            Target::Instance(view) => Some(view.id()),
        }
    }
}

impl From<ResourceType> for Target<'_> {
    fn from(resource: ResourceType) -> Self {
        Target::Type(resource)
    }
}

impl<'a> From<&'a ResourceView> for Target<'a> {
    fn from(view: &'a ResourceView) -> Self {
        Target::Instance(view)
    }
}

/// Shape a raw entity into an authorization view.
///
/// Field names are accepted in camelCase or snake_case. A `null` required
/// field counts as missing. If the entity carries a `__typename` tag it must
/// name `resource_type`.
///
/// Required fields:
///
/// | Type | Fields |
/// |------|--------|
/// | Organization | `id`, `ownerId` |
/// | Project | `id`, `ownerId` |
/// | User | `id` |
/// | Billing | `id` |
/// | Member | `id`, `userId`, `role` |
///
/// # Example
///
/// ```
/// use saas_auth::{to_view, ResourceType};
/// use serde_json::json;
///
/// let row = json!({
///     "id": "0190a6c4-5b5e-7c3a-8f00-000000000001",
///     "ownerId": "0190a6c4-5b5e-7c3a-8f00-000000000002",
///     "name": "Website",
/// });
/// let view = to_view(ResourceType::Project, &row).unwrap();
/// assert!(view.owner_id().is_some());
///
/// let missing_owner = json!({ "id": "0190a6c4-5b5e-7c3a-8f00-000000000001" });
/// assert!(to_view(ResourceType::Project, &missing_owner).is_err());
/// ```
pub fn to_view(resource_type: ResourceType, raw: &Value) -> PolicyResult<ResourceView> {
    let fields = RawEntity::new(resource_type, raw)?;

    let view = match resource_type {
        ResourceType::Organization => ResourceView::Organization(OrganizationView {
            id: fields.required_uuid("id", "id")?,
            owner_id: Some(fields.required_uuid("ownerId", "owner_id")?),
            domain: fields.optional_string("domain", "domain")?,
            should_attach_users_by_domain: fields
                .optional_bool("shouldAttachUsersByDomain", "should_attach_users_by_domain")?
                .unwrap_or(false),
        }),
        ResourceType::Project => ResourceView::Project(ProjectView {
            id: fields.required_uuid("id", "id")?,
            organization_id: fields.optional_uuid("organizationId", "organization_id")?,
            owner_id: Some(fields.required_uuid("ownerId", "owner_id")?),
        }),
        ResourceType::User => ResourceView::User(UserView {
            id: fields.required_uuid("id", "id")?,
        }),
        ResourceType::Billing => ResourceView::Billing(BillingView {
            id: fields.required_uuid("id", "id")?,
            organization_id: fields.optional_uuid("organizationId", "organization_id")?,
            plan_id: fields.optional_string("planId", "plan_id")?,
        }),
        ResourceType::Member => ResourceView::Member(MemberView {
            id: fields.required_uuid("id", "id")?,
            organization_id: fields.optional_uuid("organizationId", "organization_id")?,
            user_id: fields.required_uuid("userId", "user_id")?,
            role: fields.required_role("role")?,
        }),
    };

    Ok(view)
}

/// Field accessor over a raw JSON object.
struct RawEntity<'a> {
    resource: ResourceType,
    map: &'a Map<String, Value>,
}

impl<'a> RawEntity<'a> {
    fn new(resource: ResourceType, raw: &'a Value) -> PolicyResult<Self> {
        let map = raw
            .as_object()
            .ok_or(ValidationError::NotAnObject { resource })?;

        if let Some(tag) = map.get("__typename") {
            let found = tag.as_str().unwrap_or_default();
            if ResourceType::parse(found) != Some(resource) {
                return Err(ValidationError::TypeMismatch {
                    expected: resource,
                    found: tag.to_string(),
                }
                .into());
            }
        }

        Ok(Self { resource, map })
    }

    /// Look a field up under either spelling; `null` counts as absent.
    fn get(&self, camel: &str, snake: &str) -> Option<&'a Value> {
        self.map
            .get(camel)
            .or_else(|| self.map.get(snake))
            .filter(|value| !value.is_null())
    }

    fn missing(&self, field: &'static str) -> ValidationError {
        ValidationError::MissingField {
            resource: self.resource,
            field,
        }
    }

    fn malformed(&self, field: &'static str, reason: impl Into<String>) -> ValidationError {
        ValidationError::MalformedField {
            resource: self.resource,
            field,
            reason: reason.into(),
        }
    }

    fn parse_uuid(&self, field: &'static str, value: &Value) -> PolicyResult<Uuid> {
        let text = value
            .as_str()
            .ok_or_else(|| self.malformed(field, "expected a string"))?;
        Uuid::parse_str(text)
            .map_err(|e| self.malformed(field, format!("not a UUID: {}", e)).into())
    }

    fn required_uuid(&self, camel: &'static str, snake: &str) -> PolicyResult<Uuid> {
        let value = self.get(camel, snake).ok_or_else(|| self.missing(camel))?;
        self.parse_uuid(camel, value)
    }

    fn optional_uuid(&self, camel: &'static str, snake: &str) -> PolicyResult<Option<Uuid>> {
        self.get(camel, snake)
            .map(|value| self.parse_uuid(camel, value))
            .transpose()
    }

    fn optional_string(&self, camel: &'static str, snake: &str) -> PolicyResult<Option<String>> {
        match self.get(camel, snake) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(self.malformed(camel, "expected a string").into()),
        }
    }

    fn optional_bool(&self, camel: &'static str, snake: &str) -> PolicyResult<Option<bool>> {
        match self.get(camel, snake) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(self.malformed(camel, "expected a boolean").into()),
        }
    }

    fn required_role(&self, field: &'static str) -> PolicyResult<Role> {
        let value = self.get(field, field).ok_or_else(|| self.missing(field))?;
        let text = value
            .as_str()
            .ok_or_else(|| self.malformed(field, "expected a string"))?;
        Role::parse(text)
            .ok_or_else(|| self.malformed(field, format!("unknown role `{}`", text)).into())
    }
}
