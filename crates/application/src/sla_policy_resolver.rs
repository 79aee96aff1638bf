use std::sync::Arc;

use deskward_core::{DepartmentId, SlaPolicyId};
use deskward_domain::{RoutingSelection, TicketPriority, select_sla_policy};
use tracing::warn;

use crate::SlaPolicyRepository;

/// Picks the SLA policy governing a ticket.
#[derive(Clone)]
pub struct SlaPolicyResolver {
    repository: Arc<dyn SlaPolicyRepository>,
}

impl SlaPolicyResolver {
    /// Creates a resolver over the policy table.
    #[must_use]
    pub fn new(repository: Arc<dyn SlaPolicyRepository>) -> Self {
        Self { repository }
    }

    /// Returns the policy for the priority and primary department, if any applies.
    pub async fn resolve_policy(
        &self,
        priority: TicketPriority,
        primary_department_id: Option<DepartmentId>,
    ) -> Option<SlaPolicyId> {
        let policies = match self.repository.list_policies_for_priority(priority).await {
            Ok(policies) => policies,
            Err(error) => {
                warn!(
                    priority = priority.as_str(),
                    %error,
                    "sla policy lookup failed; ticket carries no policy"
                );
                return None;
            }
        };

        let selection = select_sla_policy(priority, primary_department_id, &policies);
        if let RoutingSelection::Ambiguous { chosen, candidates } = selection {
            warn!(
                priority = priority.as_str(),
                department_id = ?primary_department_id,
                %chosen,
                candidates,
                "several sla policies share one scope; picked the smallest policy id"
            );
        }

        selection.into_option()
    }
}
