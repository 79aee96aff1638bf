use std::collections::BTreeSet;

use async_trait::async_trait;
use deskward_application::GrantRepository;
use deskward_core::AppResult;
use deskward_domain::{PermissionGrant, Role};
use tokio::sync::RwLock;

/// In-memory grant table.
///
/// Replacement holds the write lock across the delete and the insert, so
/// readers never observe a role with its grants half swapped.
#[derive(Debug, Default)]
pub struct InMemoryGrantRepository {
    grants: RwLock<BTreeSet<PermissionGrant>>,
}

impl InMemoryGrantRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository seeded with grant rows.
    #[must_use]
    pub fn with_grants(grants: impl IntoIterator<Item = PermissionGrant>) -> Self {
        Self {
            grants: RwLock::new(grants.into_iter().collect()),
        }
    }
}

#[async_trait]
impl GrantRepository for InMemoryGrantRepository {
    async fn list_grants_for_role(&self, role: Role) -> AppResult<Vec<PermissionGrant>> {
        Ok(self
            .grants
            .read()
            .await
            .iter()
            .filter(|grant| grant.role == role)
            .copied()
            .collect())
    }

    async fn list_grants(&self) -> AppResult<Vec<PermissionGrant>> {
        Ok(self.grants.read().await.iter().copied().collect())
    }

    async fn delete_grants_for_roles(&self, roles: &[Role]) -> AppResult<u64> {
        let mut grants = self.grants.write().await;
        let before = grants.len();
        grants.retain(|grant| !roles.contains(&grant.role));

        Ok(u64::try_from(before - grants.len()).unwrap_or(u64::MAX))
    }

    async fn insert_grants(&self, grants: &[PermissionGrant]) -> AppResult<()> {
        self.grants.write().await.extend(grants.iter().copied());
        Ok(())
    }

    async fn replace_grants_for_roles(
        &self,
        roles: &[Role],
        grants: &[PermissionGrant],
    ) -> AppResult<()> {
        let mut stored = self.grants.write().await;
        stored.retain(|grant| !roles.contains(&grant.role));
        stored.extend(grants.iter().copied());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use deskward_application::GrantRepository;
    use deskward_core::DepartmentId;
    use deskward_domain::{PermissionGrant, PermissionKey, Role};

    use super::InMemoryGrantRepository;

    #[tokio::test]
    async fn replace_leaves_other_roles_untouched() {
        let department_id = DepartmentId::new();
        let repository = InMemoryGrantRepository::with_grants([
            PermissionGrant::global(Role::Agent, PermissionKey::AccessCrmTickets),
            PermissionGrant::global(Role::Manager, PermissionKey::ViewAnalytics),
        ]);

        let result = repository
            .replace_grants_for_roles(
                &[Role::Agent],
                &[PermissionGrant::scoped(
                    Role::Agent,
                    PermissionKey::EditTickets,
                    department_id,
                )],
            )
            .await;
        assert!(result.is_ok());

        let agent = repository
            .list_grants_for_role(Role::Agent)
            .await
            .unwrap_or_default();
        assert_eq!(
            agent,
            vec![PermissionGrant::scoped(
                Role::Agent,
                PermissionKey::EditTickets,
                department_id,
            )]
        );

        let manager = repository
            .list_grants_for_role(Role::Manager)
            .await
            .unwrap_or_default();
        assert_eq!(manager.len(), 1);
    }

    #[tokio::test]
    async fn insert_ignores_duplicate_rows() {
        let repository = InMemoryGrantRepository::new();
        let grant = PermissionGrant::global(Role::Agent, PermissionKey::CreateTickets);

        assert!(repository.insert_grants(&[grant, grant]).await.is_ok());
        assert!(repository.insert_grants(&[grant]).await.is_ok());

        assert_eq!(repository.list_grants().await.unwrap_or_default(), vec![grant]);
    }

    #[tokio::test]
    async fn delete_reports_removed_rows() {
        let repository = InMemoryGrantRepository::with_grants([
            PermissionGrant::global(Role::Agent, PermissionKey::CreateTickets),
            PermissionGrant::global(Role::Agent, PermissionKey::EditTickets),
            PermissionGrant::global(Role::Employee, PermissionKey::CreateTickets),
        ]);

        let removed = repository.delete_grants_for_roles(&[Role::Agent]).await;
        assert_eq!(removed.ok(), Some(2));
        assert_eq!(repository.list_grants().await.unwrap_or_default().len(), 1);
    }
}
