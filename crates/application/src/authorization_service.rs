use std::collections::BTreeSet;
use std::sync::Arc;

use deskward_core::{AppError, AppResult, UserIdentity};
use deskward_domain::{PermissionKey, PermissionSnapshot, UserContext};

use crate::{DirectoryRepository, GrantRepository};

/// Advisory permission listing for UI gating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessSummary {
    /// Evaluated principal context.
    pub context: UserContext,
    /// Permission keys the principal holds.
    pub permissions: BTreeSet<PermissionKey>,
}

/// Application service for authorization checks.
///
/// Every privileged mutation calls [`AuthorizationService::require_permission`]
/// regardless of what a client-side gate decided.
#[derive(Clone)]
pub struct AuthorizationService {
    grant_repository: Arc<dyn GrantRepository>,
    directory_repository: Arc<dyn DirectoryRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from repository implementations.
    #[must_use]
    pub fn new(
        grant_repository: Arc<dyn GrantRepository>,
        directory_repository: Arc<dyn DirectoryRepository>,
    ) -> Self {
        Self {
            grant_repository,
            directory_repository,
        }
    }

    /// Resolves the current role and department of the actor.
    pub async fn resolve_context(&self, actor: &UserIdentity) -> AppResult<UserContext> {
        self.directory_repository
            .find_user_context(actor.user_id())
            .await?
            .ok_or_else(|| {
                AppError::Unauthorized(format!(
                    "user '{}' has no directory entry",
                    actor.user_id()
                ))
            })
    }

    /// Loads an immutable grant snapshot for the actor.
    pub async fn permission_snapshot(&self, actor: &UserIdentity) -> AppResult<PermissionSnapshot> {
        let context = self.resolve_context(actor).await?;
        if context.role.is_superuser() {
            return Ok(PermissionSnapshot::new(context, Vec::new()));
        }

        let grants = self
            .grant_repository
            .list_grants_for_role(context.role)
            .await?;

        Ok(PermissionSnapshot::new(context, grants))
    }

    /// Returns whether the actor currently has the permission.
    pub async fn has_permission(
        &self,
        actor: &UserIdentity,
        permission: PermissionKey,
    ) -> AppResult<bool> {
        Ok(self.permission_snapshot(actor).await?.allows(permission))
    }

    /// Ensures the actor has the required permission and returns the evaluated snapshot.
    pub async fn require_permission(
        &self,
        actor: &UserIdentity,
        permission: PermissionKey,
    ) -> AppResult<PermissionSnapshot> {
        let snapshot = self.permission_snapshot(actor).await?;
        if snapshot.allows(permission) {
            return Ok(snapshot);
        }

        Err(AppError::Forbidden(format!(
            "user '{}' with role '{}' is missing permission '{}'",
            actor.user_id(),
            snapshot.context().role.as_str(),
            permission.as_str()
        )))
    }

    /// Lists the permissions the actor holds, for advisory UI gating.
    pub async fn accessible_permissions(&self, actor: &UserIdentity) -> AppResult<AccessSummary> {
        let snapshot = self.permission_snapshot(actor).await?;

        Ok(AccessSummary {
            context: *snapshot.context(),
            permissions: snapshot.granted(),
        })
    }
}

#[cfg(test)]
mod tests;
