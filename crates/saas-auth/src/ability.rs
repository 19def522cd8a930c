//! # Abilities
//!
//! An [`Ability`] is the ordered rule list compiled for one subject at one
//! point in time. It answers `can`/`cannot` by scanning the rules that
//! cover the requested action and resource type; the last rule whose
//! condition holds decides, and no match means deny.
//!
//! Abilities are built per request and never shared across requests, since
//! the same user can hold different roles in different organizations.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::actions::Action;
use crate::catalog::RoleCatalog;
use crate::error::{ConfigurationError, PolicyResult};
use crate::role::Role;
use crate::rule::{Effect, GrantRule};
use crate::views::Target;

/// The authenticated actor of a check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Subject {
    /// User ID
    pub id: Uuid,
    /// Role within the organization being accessed
    pub role: Role,
}

impl Subject {
    /// Create a subject.
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }
}

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision<'a> {
    /// Whether the action is permitted
    pub allowed: bool,
    /// Position of the deciding rule, `None` when nothing matched
    pub rule_index: Option<usize>,
    /// The deciding rule
    pub rule: Option<&'a GrantRule>,
}

impl<'a> Decision<'a> {
    fn default_deny() -> Self {
        Self {
            allowed: false,
            rule_index: None,
            rule: None,
        }
    }

    fn from_rule(index: usize, rule: &'a GrantRule) -> Self {
        Self {
            allowed: rule.effect == Effect::Allow,
            rule_index: Some(index),
            rule: Some(rule),
        }
    }

    /// Reason attached to the deciding rule, if any.
    pub fn reason(&self) -> Option<&'a str> {
        self.rule.and_then(|rule| rule.reason.as_deref())
    }

    /// Check if the verdict came from the default deny.
    pub fn is_default(&self) -> bool {
        self.rule.is_none()
    }
}

/// Compiled, immutable rule set for one subject.
///
/// # Example
///
/// ```
/// use saas_auth::{compile_ability, Action, ProjectView, ResourceType, Role};
/// use uuid::Uuid;
///
/// let user_id = Uuid::now_v7();
/// let ability = compile_ability(user_id, Role::Member).unwrap();
///
/// let own = ProjectView::new(Uuid::now_v7(), user_id).into_view();
/// let other = ProjectView::new(Uuid::now_v7(), Uuid::now_v7()).into_view();
///
/// assert!(ability.can(Action::Create, ResourceType::Project));
/// assert!(ability.can(Action::Update, &own));
/// assert!(ability.cannot(Action::Update, &other));
/// assert!(ability.can(Action::Read, &other));
/// ```
#[derive(Debug, Clone)]
pub struct Ability {
    subject: Subject,
    rules: Vec<GrantRule>,
}

impl Ability {
    /// Build an ability from an explicit rule list, in declaration order.
    ///
    /// Most callers go through [`AbilityCompiler`]; this is for ad-hoc rule
    /// sets such as tests or previews of a catalog change.
    pub fn from_rules(subject: Subject, rules: Vec<GrantRule>) -> Self {
        Self { subject, rules }
    }

    /// Subject this ability was compiled for.
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[GrantRule] {
        &self.rules
    }

    /// Decide a check and report which rule decided it.
    pub fn decide<'t>(&self, action: Action, target: impl Into<Target<'t>>) -> Decision<'_> {
        let target = target.into();
        let resource = target.resource_type();

        let decision = self
            .rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| rule.covers(action, resource))
            .filter(|(_, rule)| rule.applies_to(&self.subject, &target))
            .last()
            .map(|(index, rule)| Decision::from_rule(index, rule))
            .unwrap_or_else(Decision::default_deny);

        tracing::debug!(
            subject = %self.subject.id,
            role = %self.subject.role,
            action = %action,
            resource = %resource,
            instance = ?target.instance_id(),
            allowed = decision.allowed,
            rule = ?decision.rule_index,
            "authorization decision"
        );

        decision
    }

    /// Check whether the subject may perform `action` on `target`.
    pub fn can<'t>(&self, action: Action, target: impl Into<Target<'t>>) -> bool {
        self.decide(action, target).allowed
    }

    /// Negation of [`Ability::can`].
    pub fn cannot<'t>(&self, action: Action, target: impl Into<Target<'t>>) -> bool {
        !self.can(action, target)
    }

    /// Check an action given by name.
    ///
    /// Names outside the action vocabulary are denied.
    pub fn can_named<'t>(&self, action: &str, target: impl Into<Target<'t>>) -> bool {
        match Action::parse(action) {
            Some(action) => self.can(action, target),
            None => {
                tracing::warn!(
                    subject = %self.subject.id,
                    action = %action,
                    "unknown action denied"
                );
                false
            }
        }
    }
}

/// Builds abilities from a role catalog.
#[derive(Debug, Clone, Copy)]
pub struct AbilityCompiler<'c> {
    catalog: &'c RoleCatalog,
}

impl<'c> AbilityCompiler<'c> {
    /// Create a compiler over a catalog.
    pub fn new(catalog: &'c RoleCatalog) -> Self {
        Self { catalog }
    }

    /// Compile the role-derived rules for a subject.
    pub fn compile(&self, subject: &Subject) -> PolicyResult<Ability> {
        self.compile_with_overrides(subject, Vec::new())
    }

    /// Compile role-derived rules followed by subject-specific overrides.
    ///
    /// Overrides are evaluated after the role's rules, so an allow override
    /// widens access and a deny override narrows it.
    pub fn compile_with_overrides(
        &self,
        subject: &Subject,
        overrides: impl IntoIterator<Item = GrantRule>,
    ) -> PolicyResult<Ability> {
        let mut rules = self.catalog.grants_for(subject.role)?.to_vec();
        let base = rules.len();

        for (offset, rule) in overrides.into_iter().enumerate() {
            if rule.actions.is_empty() {
                return Err(ConfigurationError::EmptyActions {
                    role: subject.role,
                    index: base + offset,
                }
                .into());
            }
            rules.push(rule);
        }

        Ok(Ability::from_rules(*subject, rules))
    }
}

/// Compile an ability against the process-wide catalog.
pub fn compile_ability(subject_id: Uuid, role: Role) -> PolicyResult<Ability> {
    let catalog = RoleCatalog::global()?;
    AbilityCompiler::new(catalog).compile(&Subject::new(subject_id, role))
}

/// Compile an ability from a stored role name.
///
/// Role names outside the enumeration are a configuration error, not a
/// denial.
pub fn compile_ability_for_role_name(subject_id: Uuid, role: &str) -> PolicyResult<Ability> {
    let role = Role::parse(role).ok_or_else(|| ConfigurationError::UnknownRole(role.to_string()))?;
    compile_ability(subject_id, role)
}
