use std::sync::Arc;

use deskward_core::{AppError, DepartmentId, UserId};
use deskward_domain::{PermissionGrant, PermissionKey, Role, UserContext};

use crate::test_support::{FakeDirectoryRepository, FakeGrantRepository, actor};

use super::AuthorizationService;

fn service(
    grants: FakeGrantRepository,
    directory: FakeDirectoryRepository,
) -> AuthorizationService {
    AuthorizationService::new(Arc::new(grants), Arc::new(directory))
}

#[tokio::test]
async fn require_permission_allows_department_scoped_grant() {
    let user_id = UserId::new();
    let d1 = DepartmentId::new();
    let service = service(
        FakeGrantRepository::with_grants(vec![PermissionGrant::scoped(
            Role::DepartmentHead,
            PermissionKey::AccessCrmTickets,
            d1,
        )]),
        FakeDirectoryRepository::default()
            .with_user(user_id, UserContext::new(Role::DepartmentHead, Some(d1))),
    );

    let result = service
        .require_permission(&actor(user_id), PermissionKey::AccessCrmTickets)
        .await;
    assert!(result.is_ok());

    let result = service
        .require_permission(&actor(user_id), PermissionKey::ManageRoles)
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn require_permission_denies_missing_grant() {
    let user_id = UserId::new();
    let service = service(
        FakeGrantRepository::default(),
        FakeDirectoryRepository::default().with_user(user_id, UserContext::new(Role::Agent, None)),
    );

    let result = service
        .require_permission(&actor(user_id), PermissionKey::CreateTickets)
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn superuser_skips_grant_store() {
    let user_id = UserId::new();
    let service = service(
        FakeGrantRepository {
            fail_reads: true,
            ..FakeGrantRepository::default()
        },
        FakeDirectoryRepository::default().with_user(user_id, UserContext::new(Role::Ceo, None)),
    );

    let result = service
        .has_permission(&actor(user_id), PermissionKey::ManageRoles)
        .await;
    assert!(matches!(result, Ok(true)));
}

#[tokio::test]
async fn grant_store_failure_fails_closed() {
    let user_id = UserId::new();
    let service = service(
        FakeGrantRepository {
            fail_reads: true,
            ..FakeGrantRepository::default()
        },
        FakeDirectoryRepository::default().with_user(user_id, UserContext::new(Role::Agent, None)),
    );

    let result = service
        .require_permission(&actor(user_id), PermissionKey::CreateTickets)
        .await;
    assert!(matches!(result, Err(AppError::Internal(_))));
}

#[tokio::test]
async fn unknown_user_is_unauthorized() {
    let service = service(
        FakeGrantRepository::default(),
        FakeDirectoryRepository::default(),
    );

    let result = service.resolve_context(&actor(UserId::new())).await;
    assert!(matches!(result, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn accessible_permissions_lists_granted_keys() {
    let user_id = UserId::new();
    let d1 = DepartmentId::new();
    let service = service(
        FakeGrantRepository::with_grants(vec![
            PermissionGrant::global(Role::Agent, PermissionKey::AccessKnowledgeBase),
            PermissionGrant::scoped(Role::Agent, PermissionKey::EditTickets, d1),
            PermissionGrant::scoped(Role::Agent, PermissionKey::DeleteTickets, DepartmentId::new()),
            PermissionGrant::global(Role::Manager, PermissionKey::ViewAnalytics),
        ]),
        FakeDirectoryRepository::default()
            .with_user(user_id, UserContext::new(Role::Agent, Some(d1))),
    );

    let summary = service.accessible_permissions(&actor(user_id)).await;
    assert!(summary.is_ok());

    if let Ok(summary) = summary {
        assert_eq!(summary.context.role, Role::Agent);
        assert_eq!(
            summary.permissions.into_iter().collect::<Vec<_>>(),
            vec![PermissionKey::EditTickets, PermissionKey::AccessKnowledgeBase]
        );
    }
}
