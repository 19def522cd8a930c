//! Policy tests for the built-in role catalog.
//!
//! These exercise the engine through its public surface only: compile an
//! ability for a role, shape entities into views, and check verdicts.

use saas_auth::{
    compile_ability, to_view, Ability, AbilityCompiler, Action, BillingView, Condition,
    GrantRule, MemberView, OrganizationView, PolicyError, ProjectView, ResourceType, ResourceView,
    Role, RoleCatalog, Subject, UserView, ValidationError,
};
use serde_json::json;
use uuid::Uuid;

fn ability(user_id: Uuid, role: Role) -> Ability {
    compile_ability(user_id, role).expect("built-in catalog compiles")
}

/// One instance of every resource type, owned by `owner`.
fn instances(owner: Uuid) -> Vec<ResourceView> {
    vec![
        OrganizationView::new(Uuid::now_v7(), owner).into_view(),
        ProjectView::new(Uuid::now_v7(), owner).into_view(),
        UserView::new(Uuid::now_v7()).into_view(),
        BillingView::new(Uuid::now_v7()).into_view(),
        MemberView::new(Uuid::now_v7(), Uuid::now_v7(), Role::Member).into_view(),
    ]
}

#[test]
fn test_default_deny_for_unmatched_pairs() {
    let user = Uuid::now_v7();

    let member = ability(user, Role::Member);
    assert!(member.cannot(Action::Read, ResourceType::Billing));
    assert!(member.cannot(Action::Create, ResourceType::Member));
    assert!(member.cannot(Action::Update, ResourceType::Organization));
    assert!(member.cannot(Action::Read, ResourceType::User));

    let billing = ability(user, Role::Billing);
    assert!(billing.cannot(Action::Read, ResourceType::Project));
    assert!(billing.cannot(Action::Delete, ResourceType::Billing));

    let admin = ability(user, Role::Admin);
    assert!(admin.cannot(Action::Read, ResourceType::User));
}

#[test]
fn test_owner_can_do_anything() {
    let user = Uuid::now_v7();
    let owner = ability(user, Role::Owner);
    let someone_else = Uuid::now_v7();

    for view in instances(someone_else) {
        for action in Action::all() {
            assert!(
                owner.can(action, &view),
                "owner denied {} on {:?}",
                action,
                view.resource_type()
            );
        }
    }
    for resource in ResourceType::all() {
        assert!(owner.can(Action::TransferOwnership, resource));
    }
}

#[test]
fn test_admin_cannot_transfer_ownership() {
    let user = Uuid::now_v7();
    let admin = ability(user, Role::Admin);

    let owned_by_admin = OrganizationView::new(Uuid::now_v7(), user).into_view();
    let owned_by_other = OrganizationView::new(Uuid::now_v7(), Uuid::now_v7()).into_view();
    let unowned = OrganizationView {
        owner_id: None,
        ..OrganizationView::new(Uuid::now_v7(), user)
    }
    .into_view();

    for org in [&owned_by_admin, &owned_by_other, &unowned] {
        assert!(admin.cannot(Action::TransferOwnership, org));
        assert!(admin.can(Action::Update, org));
        assert!(admin.can(Action::Delete, org));
    }
    assert!(admin.cannot(Action::TransferOwnership, ResourceType::Organization));

    let decision = admin.decide(Action::TransferOwnership, &owned_by_admin);
    assert_eq!(
        decision.reason(),
        Some("Only the organization owner can transfer ownership.")
    );
}

#[test]
fn test_admin_manages_projects_members_and_billing() {
    let user = Uuid::now_v7();
    let admin = ability(user, Role::Admin);
    for view in instances(Uuid::now_v7()) {
        if view.resource_type() == ResourceType::User {
            continue;
        }
        assert!(admin.can(Action::Manage, &view));
        assert!(admin.can(Action::Delete, &view));
    }
}

#[test]
fn test_member_ownership_gate() {
    let user = Uuid::now_v7();
    let member = ability(user, Role::Member);

    let own = ProjectView::new(Uuid::now_v7(), user).into_view();
    let other = ProjectView::new(Uuid::now_v7(), Uuid::now_v7()).into_view();
    let orphan = ProjectView {
        owner_id: None,
        ..ProjectView::new(Uuid::now_v7(), user)
    }
    .into_view();

    assert!(member.can(Action::Update, &own));
    assert!(member.can(Action::Delete, &own));
    assert!(member.cannot(Action::Update, &other));
    assert!(member.cannot(Action::Delete, &other));
    assert!(member.cannot(Action::Update, &orphan));
    assert!(member.cannot(Action::Delete, &orphan));

    for project in [&own, &other, &orphan] {
        assert!(member.can(Action::Read, project));
    }
}

#[test]
fn test_bare_type_only_matches_unconditional_rules() {
    let member = ability(Uuid::now_v7(), Role::Member);
    assert!(member.can(Action::Create, ResourceType::Project));
    assert!(member.can(Action::Read, ResourceType::Project));
    assert!(member.cannot(Action::Update, ResourceType::Project));
    assert!(member.cannot(Action::Delete, ResourceType::Project));
}

#[test]
fn test_member_scenario() {
    let u1 = Uuid::now_v7();
    let u2 = Uuid::now_v7();
    let member = ability(u1, Role::Member);

    let p1 = ProjectView::new(Uuid::now_v7(), u1).into_view();
    let p2 = ProjectView::new(Uuid::now_v7(), u2).into_view();

    assert!(member.can(Action::Update, &p1));
    assert!(member.cannot(Action::Update, &p2));
    assert!(member.can(Action::Read, &p1));
    assert!(member.can(Action::Read, &p2));
    assert!(member.can(Action::Read, ResourceType::Organization));
}

#[test]
fn test_billing_scenario() {
    let u9 = Uuid::now_v7();
    let billing = ability(u9, Role::Billing);

    let p2 = ProjectView::new(Uuid::now_v7(), u9).into_view();
    let b1 = BillingView::new(Uuid::now_v7()).into_view();

    assert!(billing.cannot(Action::Update, &p2));
    assert!(billing.can(Action::Update, &b1));
    assert!(billing.can(Action::Read, &b1));
    assert!(billing.can(Action::Read, ResourceType::Organization));
    assert!(billing.cannot(Action::Update, ResourceType::Organization));
}

#[test]
fn test_declaration_order_decides_conflicts() {
    let subject = Subject::new(Uuid::now_v7(), Role::Member);
    let allow = GrantRule::allow([Action::Update], ResourceType::Organization);
    let deny = GrantRule::deny([Action::Update], ResourceType::Organization);

    let allow_last = Ability::from_rules(subject, vec![deny.clone(), allow.clone()]);
    let deny_last = Ability::from_rules(subject, vec![allow, deny]);

    let org = OrganizationView::new(Uuid::now_v7(), subject.id).into_view();
    assert!(allow_last.can(Action::Update, &org));
    assert!(deny_last.cannot(Action::Update, &org));
}

#[test]
fn test_broad_deny_after_specific_allow_still_wins() {
    // A conditional allow is more specific than a blanket deny, but order decides.
    let subject = Subject::new(Uuid::now_v7(), Role::Member);
    let own = ProjectView::new(Uuid::now_v7(), subject.id).into_view();
    let ability = Ability::from_rules(
        subject,
        vec![
            GrantRule::allow([Action::Update], ResourceType::Project)
                .when(Condition::SubjectOwnsResource),
            GrantRule::deny([Action::Manage], ResourceType::Project),
        ],
    );
    assert!(ability.cannot(Action::Update, &own));
}

#[test]
fn test_overrides_widen_and_narrow() {
    let catalog = RoleCatalog::builtin().unwrap();
    let compiler = AbilityCompiler::new(&catalog);
    let subject = Subject::new(Uuid::now_v7(), Role::Member);

    let beta_billing = compiler
        .compile_with_overrides(
            &subject,
            vec![GrantRule::allow([Action::Read], ResourceType::Billing)],
        )
        .unwrap();
    assert!(beta_billing.can(Action::Read, ResourceType::Billing));

    let read_only = compiler
        .compile_with_overrides(
            &subject,
            vec![GrantRule::deny([Action::Create], ResourceType::Project)
                .because("Project creation is disabled for this account.")],
        )
        .unwrap();
    assert!(read_only.cannot(Action::Create, ResourceType::Project));
    assert_eq!(
        read_only.decide(Action::Create, ResourceType::Project).reason(),
        Some("Project creation is disabled for this account.")
    );
    assert!(read_only.can(Action::Read, ResourceType::Project));
}

#[test]
fn test_raw_rows_without_owner_never_reach_the_ability() {
    let user = Uuid::now_v7();
    let row = json!({ "id": Uuid::now_v7().to_string(), "name": "Website" });

    match to_view(ResourceType::Project, &row) {
        Err(PolicyError::Validation(ValidationError::MissingField { field, .. })) => {
            assert_eq!(field, "ownerId");
        }
        other => panic!("expected missing ownerId, got {:?}", other),
    }

    let row = json!({ "id": Uuid::now_v7().to_string(), "ownerId": user.to_string() });
    let view = to_view(ResourceType::Project, &row).unwrap();
    assert!(ability(user, Role::Member).can(Action::Update, &view));
}

#[test]
fn test_unknown_action_names_are_denied() {
    let owner = ability(Uuid::now_v7(), Role::Owner);
    assert!(owner.can_named("transfer_ownership", ResourceType::Organization));
    assert!(!owner.can_named("impersonate", ResourceType::User));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_checks_agree() {
    let owner_id = Uuid::now_v7();
    let project = ProjectView::new(Uuid::now_v7(), owner_id).into_view();

    let mut handles = Vec::new();
    for i in 0..64 {
        let project = project.clone();
        handles.push(tokio::spawn(async move {
            let user = if i % 2 == 0 { owner_id } else { Uuid::now_v7() };
            let member = compile_ability(user, Role::Member).unwrap();
            (i % 2 == 0, member.can(Action::Update, &project))
        }));
    }

    for handle in handles {
        let (is_owner, allowed) = handle.await.unwrap();
        assert_eq!(is_owner, allowed);
    }
}
