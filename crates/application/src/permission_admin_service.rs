use std::sync::Arc;

use deskward_core::{AppError, AppResult, UserIdentity};
use deskward_domain::{
    AuditAction, PermissionGrant, PermissionKey, RoleGrantReplacement, has_permission,
};
use tracing::{error, info, warn};

use crate::security_ports::role_list;
use crate::{AuditEvent, AuditRepository, AuthorizationService, GrantRepository};

/// Application service for administering the grant table.
#[derive(Clone)]
pub struct PermissionAdminService {
    authorization_service: AuthorizationService,
    grant_repository: Arc<dyn GrantRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl PermissionAdminService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        grant_repository: Arc<dyn GrantRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            grant_repository,
            audit_repository,
        }
    }

    /// Returns the whole grant table for administrative users.
    pub async fn list_grants(&self, actor: &UserIdentity) -> AppResult<Vec<PermissionGrant>> {
        self.authorization_service
            .require_permission(actor, PermissionKey::ManageRoles)
            .await?;

        let mut grants = self.grant_repository.list_grants().await?;
        grants.sort_unstable();
        Ok(grants)
    }

    /// Replaces every grant held by the affected roles.
    ///
    /// A replacement that would revoke `manage_roles` from the actor's own role is
    /// rejected. A failure between deleting and inserting is returned to the caller
    /// unchanged; it names the roles left without permissions.
    pub async fn replace_role_grants(
        &self,
        actor: &UserIdentity,
        replacement: RoleGrantReplacement,
    ) -> AppResult<Vec<PermissionGrant>> {
        let snapshot = self
            .authorization_service
            .require_permission(actor, PermissionKey::ManageRoles)
            .await?;

        let context = *snapshot.context();
        let (roles, grants) = replacement.into_parts();

        if !context.role.is_superuser()
            && roles.contains(&context.role)
            && !has_permission(&context, PermissionKey::ManageRoles, &grants)
        {
            return Err(AppError::Validation(format!(
                "replacement would revoke '{}' from your own role '{}'",
                PermissionKey::ManageRoles.as_str(),
                context.role.as_str()
            )));
        }

        let affected = role_list(&roles);
        if let Err(replace_error) = self
            .grant_repository
            .replace_grants_for_roles(&roles, &grants)
            .await
        {
            error!(
                actor = %actor.user_id(),
                roles = %affected,
                error = %replace_error,
                "permission grant replacement failed"
            );
            return Err(replace_error);
        }

        info!(
            actor = %actor.user_id(),
            roles = %affected,
            grant_count = grants.len(),
            "replaced permission grants"
        );

        let event = AuditEvent {
            subject: actor.user_id().to_string(),
            action: AuditAction::SecurityPermissionsReplaced,
            resource_type: "permission_grants".to_owned(),
            resource_id: affected.clone(),
            detail: Some(format!(
                "replaced grants for roles [{affected}] with {} rows",
                grants.len()
            )),
        };
        if let Err(audit_error) = self.audit_repository.append_event(event).await {
            warn!(error = %audit_error, "failed to append permission replacement audit event");
        }

        Ok(grants)
    }
}
