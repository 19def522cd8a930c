//! # Grant Rules
//!
//! A grant rule is plain data: an effect, the actions it covers, the resource
//! type it targets and an optional declarative condition. Rules carry no
//! behavior beyond matching, so a rule table can be serialized, diffed and
//! tested on its own.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::ability::Subject;
use crate::actions::Action;
use crate::resources::ResourceType;
use crate::views::{ResourceView, Target};

/// Whether a matching rule grants or withholds access.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    /// Grant access
    Allow,
    /// Withhold access
    Deny,
}

/// Declarative comparator between the subject and a resource instance.
///
/// Conditions only ever hold for concrete instances. Checking a bare
/// resource type never satisfies a condition, and an instance lacking the
/// compared attribute never satisfies one either.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// The instance's owner is the subject.
    SubjectOwnsResource,

    /// The instance is the subject (a user acting on their own account).
    SubjectIsResource,
}

impl Condition {
    /// Evaluate the condition for a subject against an instance.
    ///
    /// # Example
    ///
    /// ```
    /// use saas_auth::{Condition, ProjectView, Role, Subject};
    /// use uuid::Uuid;
    ///
    /// let subject = Subject::new(Uuid::now_v7(), Role::Member);
    /// let mine = ProjectView::new(Uuid::now_v7(), subject.id).into_view();
    /// let orphan = ProjectView { owner_id: None, ..ProjectView::new(Uuid::now_v7(), subject.id) }.into_view();
    ///
    /// assert!(Condition::SubjectOwnsResource.evaluate(&subject, &mine));
    /// assert!(!Condition::SubjectOwnsResource.evaluate(&subject, &orphan));
    /// ```
    pub fn evaluate(&self, subject: &Subject, instance: &ResourceView) -> bool {
        match self {
            Condition::SubjectOwnsResource => match instance.owner_id() {
                Some(owner_id) => owner_id == subject.id,
                None => false,
            },
            Condition::SubjectIsResource => instance.id() == subject.id,
        }
    }
}

/// A single authorization rule.
///
/// # Example
///
/// ```
/// use saas_auth::{Action, Condition, GrantRule, ResourceType};
///
/// let rule = GrantRule::allow([Action::Update, Action::Delete], ResourceType::Project)
///     .when(Condition::SubjectOwnsResource);
/// assert!(rule.covers(Action::Update, ResourceType::Project));
/// assert!(!rule.covers(Action::Read, ResourceType::Project));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GrantRule {
    /// Allow or deny.
    pub effect: Effect,

    /// Actions the rule covers. `Manage` covers all of them.
    pub actions: Vec<Action>,

    /// Resource type the rule targets.
    pub resource: ResourceType,

    /// Optional instance condition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,

    /// Human-readable explanation surfaced when this rule decides a check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl GrantRule {
    /// Create an unconditional allow rule.
    pub fn allow(actions: impl IntoIterator<Item = Action>, resource: ResourceType) -> Self {
        Self::with_effect(Effect::Allow, actions, resource)
    }

    /// Create an unconditional deny rule.
    pub fn deny(actions: impl IntoIterator<Item = Action>, resource: ResourceType) -> Self {
        Self::with_effect(Effect::Deny, actions, resource)
    }

    fn with_effect(
        effect: Effect,
        actions: impl IntoIterator<Item = Action>,
        resource: ResourceType,
    ) -> Self {
        Self {
            effect,
            actions: actions.into_iter().collect(),
            resource,
            condition: None,
            reason: None,
        }
    }

    /// Restrict the rule to instances satisfying a condition.
    pub fn when(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Attach a human-readable reason.
    pub fn because(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Check if the rule only applies to instances.
    pub fn is_conditional(&self) -> bool {
        self.condition.is_some()
    }

    /// Check whether the rule's resource type and action list cover a request.
    ///
    /// This ignores the condition.
    pub fn covers(&self, action: Action, resource: ResourceType) -> bool {
        self.resource == resource && self.actions.iter().any(|a| a.covers(action))
    }

    /// Check whether the rule's condition holds for a target.
    ///
    /// Unconditional rules hold for the bare type and for every instance.
    /// Conditional rules never hold for a bare type.
    pub fn applies_to(&self, subject: &Subject, target: &Target<'_>) -> bool {
        match (&self.condition, target) {
            (None, _) => true,
            (Some(_), Target::Type(_)) => false,
            (Some(condition), Target::Instance(instance)) => condition.evaluate(subject, instance),
        }
    }

    /// Check whether two rules target exactly the same requests.
    ///
    /// Effect and reason are ignored; action order is ignored.
    pub fn same_scope(&self, other: &GrantRule) -> bool {
        if self.resource != other.resource || self.condition != other.condition {
            return false;
        }
        let mine: HashSet<Action> = self.actions.iter().copied().collect();
        let theirs: HashSet<Action> = other.actions.iter().copied().collect();
        mine == theirs
    }
}

impl std::fmt::Display for GrantRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let effect = match self.effect {
            Effect::Allow => "allow",
            Effect::Deny => "deny",
        };
        let actions: Vec<&str> = self.actions.iter().map(Action::as_str).collect();
        write!(f, "{} [{}] on {}", effect, actions.join(", "), self.resource)?;
        if let Some(condition) = &self.condition {
            write!(f, " when {:?}", condition)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::Role;
    use crate::views::{ProjectView, UserView};
    use uuid::Uuid;

    fn member() -> Subject {
        Subject::new(Uuid::now_v7(), Role::Member)
    }

    #[test]
    fn test_covers_matches_type_and_action() {
        let rule = GrantRule::allow([Action::Create, Action::Read], ResourceType::Project);
        assert!(rule.covers(Action::Create, ResourceType::Project));
        assert!(rule.covers(Action::Read, ResourceType::Project));
        assert!(!rule.covers(Action::Update, ResourceType::Project));
        assert!(!rule.covers(Action::Read, ResourceType::Organization));
    }

    #[test]
    fn test_manage_rule_covers_every_action_on_its_type_only() {
        let rule = GrantRule::allow([Action::Manage], ResourceType::Billing);
        for action in Action::all() {
            assert!(rule.covers(action, ResourceType::Billing));
        }
        assert!(!rule.covers(Action::Read, ResourceType::Project));
    }

    #[test]
    fn test_conditional_rule_never_applies_to_bare_type() {
        let subject = member();
        let rule = GrantRule::allow([Action::Update], ResourceType::Project)
            .when(Condition::SubjectOwnsResource);
        assert!(!rule.applies_to(&subject, &Target::Type(ResourceType::Project)));
    }

    #[test]
    fn test_unconditional_rule_applies_to_type_and_instance() {
        let subject = member();
        let rule = GrantRule::allow([Action::Read], ResourceType::Project);
        let view = ProjectView::new(Uuid::now_v7(), Uuid::now_v7()).into_view();
        assert!(rule.applies_to(&subject, &Target::Type(ResourceType::Project)));
        assert!(rule.applies_to(&subject, &Target::Instance(&view)));
    }

    #[test]
    fn test_owner_condition_fails_closed_without_owner() {
        let subject = member();
        let mut project = ProjectView::new(Uuid::now_v7(), subject.id);
        project.owner_id = None;
        let view = project.into_view();
        assert!(!Condition::SubjectOwnsResource.evaluate(&subject, &view));
    }

    #[test]
    fn test_owner_condition_compares_ids() {
        let subject = member();
        let mine = ProjectView::new(Uuid::now_v7(), subject.id).into_view();
        let theirs = ProjectView::new(Uuid::now_v7(), Uuid::now_v7()).into_view();
        assert!(Condition::SubjectOwnsResource.evaluate(&subject, &mine));
        assert!(!Condition::SubjectOwnsResource.evaluate(&subject, &theirs));
    }

    #[test]
    fn test_self_condition() {
        let subject = member();
        let me = UserView::new(subject.id).into_view();
        let other = UserView::new(Uuid::now_v7()).into_view();
        assert!(Condition::SubjectIsResource.evaluate(&subject, &me));
        assert!(!Condition::SubjectIsResource.evaluate(&subject, &other));
    }

    #[test]
    fn test_same_scope_ignores_action_order_and_effect() {
        let a = GrantRule::allow([Action::Update, Action::Delete], ResourceType::Project);
        let b = GrantRule::deny([Action::Delete, Action::Update], ResourceType::Project);
        assert!(a.same_scope(&b));

        let conditional = a.clone().when(Condition::SubjectOwnsResource);
        assert!(!a.same_scope(&conditional));
    }

    #[test]
    fn test_rule_serialization_is_inspectable() {
        let rule = GrantRule::allow([Action::Update], ResourceType::Project)
            .when(Condition::SubjectOwnsResource);
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["effect"], "allow");
        assert_eq!(json["actions"][0], "update");
        assert_eq!(json["resource"], "project");
        assert_eq!(json["condition"], "subject_owns_resource");
        assert!(json.get("reason").is_none());
    }

    #[test]
    fn test_display() {
        let rule = GrantRule::deny([Action::TransferOwnership], ResourceType::Organization);
        assert_eq!(rule.to_string(), "deny [transfer_ownership] on Organization");
    }
}
