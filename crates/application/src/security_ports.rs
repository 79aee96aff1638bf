use async_trait::async_trait;
use deskward_core::{AppError, AppResult, DepartmentId, UserId};
use deskward_domain::{Department, PermissionGrant, Role, UserContext};

/// Repository port over the grant table.
#[async_trait]
pub trait GrantRepository: Send + Sync {
    /// Lists every grant held by one role.
    async fn list_grants_for_role(&self, role: Role) -> AppResult<Vec<PermissionGrant>>;

    /// Lists the whole grant table.
    async fn list_grants(&self) -> AppResult<Vec<PermissionGrant>>;

    /// Deletes every grant held by the roles and returns the number of removed rows.
    async fn delete_grants_for_roles(&self, roles: &[Role]) -> AppResult<u64>;

    /// Inserts grant rows.
    async fn insert_grants(&self, grants: &[PermissionGrant]) -> AppResult<()>;

    /// Replaces every grant held by `roles` with `grants`.
    ///
    /// The default implementation deletes then inserts as two separate steps. When
    /// the insert fails after the delete succeeded, the affected roles hold no
    /// grants at all and the returned error says so. Adapters backed by a
    /// transactional store override this to apply both steps atomically.
    async fn replace_grants_for_roles(
        &self,
        roles: &[Role],
        grants: &[PermissionGrant],
    ) -> AppResult<()> {
        self.delete_grants_for_roles(roles).await?;

        self.insert_grants(grants).await.map_err(|error| {
            AppError::Internal(format!(
                "grants for roles [{}] were deleted but the replacement grants failed to persist; \
                 these roles hold no permissions until the replacement is retried: {error}",
                role_list(roles)
            ))
        })
    }
}

/// Repository port over users and departments.
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// Returns the current role and department of a user.
    async fn find_user_context(&self, user_id: UserId) -> AppResult<Option<UserContext>>;

    /// Lists users holding the department head role for one department.
    async fn list_department_head_ids(&self, department_id: DepartmentId)
    -> AppResult<Vec<UserId>>;

    /// Returns the departments that exist among `department_ids`.
    async fn find_departments(&self, department_ids: &[DepartmentId])
    -> AppResult<Vec<Department>>;
}

/// Formats roles as a comma-separated list of storage values.
#[must_use]
pub fn role_list(roles: &[Role]) -> String {
    roles
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
