//! # Role Catalog
//!
//! Maps every [`Role`] to its ordered list of base [`GrantRule`]s.
//!
//! The built-in policy:
//!
//! | Role | Grants |
//! |------|--------|
//! | OWNER | `manage` on every resource type |
//! | ADMIN | `manage` on Organization, Project, Member, Billing; `transfer_ownership` on Organization denied |
//! | MEMBER | `create`, `read` on Project; `update`, `delete` on owned Projects; `read` on Organization |
//! | BILLING | `read`, `update` on Billing; `read` on Organization |
//!
//! A catalog is validated when it is built. The process-wide catalog is
//! built once, on first use or through [`RoleCatalog::install`], and is
//! read-only afterwards.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::actions::Action;
use crate::error::{ConfigurationError, PolicyResult};
use crate::resources::ResourceType;
use crate::role::Role;
use crate::rule::{Condition, Effect, GrantRule};

static GLOBAL_CATALOG: OnceLock<RoleCatalog> = OnceLock::new();

/// Validated mapping from role to base grant rules.
///
/// # Example
///
/// ```
/// use saas_auth::{Role, RoleCatalog};
///
/// let catalog = RoleCatalog::builtin().unwrap();
/// assert_eq!(catalog.grants_for(Role::Billing).unwrap().len(), 2);
///
/// let json = catalog.to_json().unwrap();
/// let reloaded = RoleCatalog::from_json(&json).unwrap();
/// assert_eq!(reloaded, catalog);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleCatalog {
    grants: BTreeMap<Role, Vec<GrantRule>>,
}

impl RoleCatalog {
    /// Build the built-in catalog.
    pub fn builtin() -> PolicyResult<Self> {
        Self::from_rules(builtin_grants())
    }

    /// Build a catalog from explicit rule lists and validate it.
    pub fn from_rules(grants: BTreeMap<Role, Vec<GrantRule>>) -> PolicyResult<Self> {
        let catalog = Self { grants };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse and validate a JSON catalog.
    ///
    /// The document is an object keyed by role name (`"OWNER"`, ...) whose
    /// values are rule lists.
    pub fn from_json(json: &str) -> PolicyResult<Self> {
        let grants: BTreeMap<Role, Vec<GrantRule>> = serde_json::from_str(json)
            .map_err(|e| ConfigurationError::InvalidCatalog(e.to_string()))?;
        Self::from_rules(grants)
    }

    /// Serialize the catalog to pretty JSON.
    pub fn to_json(&self) -> PolicyResult<String> {
        serde_json::to_string_pretty(&self.grants)
            .map_err(|e| ConfigurationError::InvalidCatalog(e.to_string()).into())
    }

    /// Base rules for a role, in declaration order.
    pub fn grants_for(&self, role: Role) -> PolicyResult<&[GrantRule]> {
        self.grants
            .get(&role)
            .map(Vec::as_slice)
            .ok_or_else(|| ConfigurationError::MissingRole(role).into())
    }

    /// Check the table for structural problems.
    ///
    /// Rejects:
    /// - a role without a rule list
    /// - a rule with no actions
    /// - the same rule declared twice for a role
    /// - an allow and a deny with identical scope for a role
    pub fn validate(&self) -> PolicyResult<()> {
        for role in Role::all() {
            let rules = self
                .grants
                .get(&role)
                .ok_or(ConfigurationError::MissingRole(role))?;
            if let Err(err) = validate_rules(role, rules) {
                tracing::error!(role = %role, error = %err, "role catalog rejected");
                return Err(err.into());
            }
        }
        Ok(())
    }

    /// Install a catalog as the process-wide catalog.
    ///
    /// Must run before the first call to [`RoleCatalog::global`]. Installing
    /// twice is a configuration error.
    pub fn install(catalog: RoleCatalog) -> PolicyResult<&'static RoleCatalog> {
        catalog.validate()?;
        GLOBAL_CATALOG.set(catalog).map_err(|_| {
            ConfigurationError::InvalidCatalog("process-wide catalog already initialized".into())
        })?;
        Self::global()
    }

    /// The process-wide catalog, building the built-in one on first use.
    pub fn global() -> PolicyResult<&'static RoleCatalog> {
        if let Some(catalog) = GLOBAL_CATALOG.get() {
            return Ok(catalog);
        }
        let built = Self::builtin()?;
        Ok(GLOBAL_CATALOG.get_or_init(|| built))
    }
}

fn validate_rules(role: Role, rules: &[GrantRule]) -> Result<(), ConfigurationError> {
    for (index, rule) in rules.iter().enumerate() {
        if rule.actions.is_empty() {
            return Err(ConfigurationError::EmptyActions { role, index });
        }
    }

    for (second, later) in rules.iter().enumerate() {
        for (first, earlier) in rules[..second].iter().enumerate() {
            if !earlier.same_scope(later) {
                continue;
            }
            return Err(if earlier.effect == later.effect {
                ConfigurationError::DuplicateRule {
                    role,
                    first,
                    second,
                }
            } else {
                ConfigurationError::ContradictoryRule {
                    role,
                    first,
                    second,
                }
            });
        }
    }

    Ok(())
}

fn builtin_grants() -> BTreeMap<Role, Vec<GrantRule>> {
    let mut grants = BTreeMap::new();

    grants.insert(
        Role::Owner,
        ResourceType::all()
            .into_iter()
            .map(|resource| GrantRule::allow([Action::Manage], resource))
            .collect(),
    );

    grants.insert(
        Role::Admin,
        vec![
            GrantRule::allow([Action::Manage], ResourceType::Organization),
            GrantRule::allow([Action::Manage], ResourceType::Project),
            GrantRule::allow([Action::Manage], ResourceType::Member),
            GrantRule::allow([Action::Manage], ResourceType::Billing),
            GrantRule {
                effect: Effect::Deny,
                actions: vec![Action::TransferOwnership],
                resource: ResourceType::Organization,
                condition: None,
                reason: Some("Only the organization owner can transfer ownership.".into()),
            },
        ],
    );

    grants.insert(
        Role::Member,
        vec![
            GrantRule::allow([Action::Create, Action::Read], ResourceType::Project),
            GrantRule::allow([Action::Update, Action::Delete], ResourceType::Project)
                .when(Condition::SubjectOwnsResource),
            GrantRule::allow([Action::Read], ResourceType::Organization),
        ],
    );

    grants.insert(
        Role::Billing,
        vec![
            GrantRule::allow([Action::Read, Action::Update], ResourceType::Billing),
            GrantRule::allow([Action::Read], ResourceType::Organization),
        ],
    );

    grants
}
