use std::sync::Arc;

use deskward_core::{AppResult, UserIdentity};
use deskward_domain::{PermissionKey, SlaPolicy};

use crate::{AuthorizationService, SlaPolicyRepository};

/// Application service exposing the SLA policy table to administrators.
#[derive(Clone)]
pub struct SlaPolicyService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn SlaPolicyRepository>,
}

impl SlaPolicyService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn SlaPolicyRepository>,
    ) -> Self {
        Self {
            authorization_service,
            repository,
        }
    }

    /// Lists every policy ordered by priority, with department-specific rows first.
    pub async fn list_policies(&self, actor: &UserIdentity) -> AppResult<Vec<SlaPolicy>> {
        self.authorization_service
            .require_permission(actor, PermissionKey::ManageSlaPolicies)
            .await?;

        let mut policies = self.repository.list_policies().await?;
        policies.sort_by(|left, right| {
            left.priority
                .cmp(&right.priority)
                .then_with(|| right.department_id.is_some().cmp(&left.department_id.is_some()))
                .then_with(|| left.id.cmp(&right.id))
        });

        Ok(policies)
    }
}
