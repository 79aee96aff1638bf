use deskward_core::DepartmentId;
use proptest::prelude::*;
use uuid::Uuid;

use super::{PermissionSnapshot, granted_permissions, has_permission};
use crate::security::{PermissionGrant, PermissionKey, Role, UserContext};

fn department(index: u8) -> DepartmentId {
    DepartmentId::from_uuid(Uuid::from_u128(u128::from(index) + 1))
}

#[test]
fn department_head_scoped_grant_allows_matching_department() {
    let d1 = department(1);
    let grants = vec![PermissionGrant::scoped(
        Role::DepartmentHead,
        PermissionKey::AccessCrmTickets,
        d1,
    )];
    let context = UserContext::new(Role::DepartmentHead, Some(d1));

    assert!(has_permission(
        &context,
        PermissionKey::AccessCrmTickets,
        &grants
    ));
    assert!(!has_permission(&context, PermissionKey::ManageRoles, &grants));
}

#[test]
fn scoped_grant_denies_other_department() {
    let grants = vec![PermissionGrant::scoped(
        Role::Agent,
        PermissionKey::EditTickets,
        department(1),
    )];
    let context = UserContext::new(Role::Agent, Some(department(2)));

    assert!(!has_permission(&context, PermissionKey::EditTickets, &grants));
}

#[test]
fn scoped_grant_denies_context_without_department() {
    let grants = vec![PermissionGrant::scoped(
        Role::Agent,
        PermissionKey::EditTickets,
        department(1),
    )];
    let context = UserContext::new(Role::Agent, None);

    assert!(!has_permission(&context, PermissionKey::EditTickets, &grants));
}

#[test]
fn global_grant_allows_any_department() {
    let grants = vec![
        PermissionGrant::scoped(Role::Agent, PermissionKey::ViewAnalytics, department(1)),
        PermissionGrant::global(Role::Agent, PermissionKey::ViewAnalytics),
    ];

    assert!(has_permission(
        &UserContext::new(Role::Agent, Some(department(3))),
        PermissionKey::ViewAnalytics,
        &grants
    ));
    assert!(has_permission(
        &UserContext::new(Role::Agent, None),
        PermissionKey::ViewAnalytics,
        &grants
    ));
}

#[test]
fn grant_for_other_role_is_ignored() {
    let grants = vec![PermissionGrant::global(
        Role::Manager,
        PermissionKey::ManageRoles,
    )];
    let context = UserContext::new(Role::Agent, None);

    assert!(!has_permission(&context, PermissionKey::ManageRoles, &grants));
}

#[test]
fn superusers_bypass_empty_grant_table() {
    for role in [Role::SystemAdmin, Role::SuperAdmin, Role::Ceo] {
        let context = UserContext::new(role, None);
        assert!(has_permission(&context, PermissionKey::ManageRoles, &[]));
        assert_eq!(
            granted_permissions(&context, &[]).len(),
            PermissionKey::all().len()
        );
    }
}

#[test]
fn snapshot_lists_only_granted_keys() {
    let d1 = department(1);
    let snapshot = PermissionSnapshot::new(
        UserContext::new(Role::Agent, Some(d1)),
        vec![
            PermissionGrant::scoped(Role::Agent, PermissionKey::AccessCrmTickets, d1),
            PermissionGrant::global(Role::Agent, PermissionKey::CreateTickets),
            PermissionGrant::scoped(Role::Agent, PermissionKey::DeleteTickets, department(2)),
        ],
    );

    let granted: Vec<PermissionKey> = snapshot.granted().into_iter().collect();
    assert_eq!(
        granted,
        vec![PermissionKey::AccessCrmTickets, PermissionKey::CreateTickets]
    );
    assert!(!snapshot.allows(PermissionKey::DeleteTickets));
}

fn role_strategy() -> impl Strategy<Value = Role> {
    prop::sample::select(Role::all())
}

fn permission_strategy() -> impl Strategy<Value = PermissionKey> {
    prop::sample::select(PermissionKey::all())
}

fn department_strategy() -> impl Strategy<Value = Option<DepartmentId>> {
    prop::option::of((0u8..4).prop_map(department))
}

fn grant_strategy() -> impl Strategy<Value = PermissionGrant> {
    (role_strategy(), permission_strategy(), department_strategy()).prop_map(
        |(role, permission, department_id)| PermissionGrant {
            role,
            permission,
            department_id,
        },
    )
}

proptest! {
    #[test]
    fn has_permission_matches_declarative_definition(
        role in role_strategy(),
        context_department in department_strategy(),
        permission in permission_strategy(),
        grants in prop::collection::vec(grant_strategy(), 0..16),
    ) {
        let context = UserContext::new(role, context_department);
        let expected = role.is_superuser()
            || grants.iter().any(|grant| {
                grant.role == role
                    && grant.permission == permission
                    && (grant.department_id.is_none()
                        || grant.department_id == context_department)
            });

        prop_assert_eq!(has_permission(&context, permission, &grants), expected);
    }

    #[test]
    fn grant_order_does_not_change_decision(
        role in role_strategy(),
        context_department in department_strategy(),
        permission in permission_strategy(),
        grants in prop::collection::vec(grant_strategy(), 0..16),
    ) {
        let context = UserContext::new(role, context_department);
        let mut reversed = grants.clone();
        reversed.reverse();

        prop_assert_eq!(
            has_permission(&context, permission, &grants),
            has_permission(&context, permission, &reversed)
        );
    }
}
