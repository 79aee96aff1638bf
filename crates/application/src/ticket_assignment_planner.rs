use deskward_core::DepartmentId;
use deskward_domain::{AssigneeRequest, AssignmentPlan, TicketPriority};
use tracing::debug;

use crate::{DepartmentHeadResolver, SlaPolicyResolver};

/// Composes head and SLA resolution into the routing decision for one ticket mutation.
///
/// The planner only reads; repeated calls against an unchanged directory and policy
/// table return the same plan, so edit flows re-run it unconditionally.
#[derive(Clone)]
pub struct TicketAssignmentPlanner {
    head_resolver: DepartmentHeadResolver,
    sla_resolver: SlaPolicyResolver,
}

impl TicketAssignmentPlanner {
    /// Creates a planner from both resolvers.
    #[must_use]
    pub fn new(head_resolver: DepartmentHeadResolver, sla_resolver: SlaPolicyResolver) -> Self {
        Self {
            head_resolver,
            sla_resolver,
        }
    }

    /// Computes the owner and SLA policy for a ticket.
    pub async fn plan(
        &self,
        priority: TicketPriority,
        department_ids: &[DepartmentId],
        requested_assignee: AssigneeRequest,
    ) -> AssignmentPlan {
        let primary_department_id = department_ids.first().copied();

        let assigned_to = match (requested_assignee, primary_department_id) {
            (AssigneeRequest::Explicit(user_id), _) => Some(user_id),
            (AssigneeRequest::AutoAssign, Some(department_id)) => {
                self.head_resolver.resolve_head(department_id).await
            }
            (AssigneeRequest::AutoAssign, None) | (AssigneeRequest::Unassigned, _) => None,
        };

        let sla_policy_id = self
            .sla_resolver
            .resolve_policy(priority, primary_department_id)
            .await;

        debug!(
            priority = priority.as_str(),
            department_id = ?primary_department_id,
            assigned_to = ?assigned_to,
            sla_policy_id = ?sla_policy_id,
            "planned ticket routing"
        );

        AssignmentPlan {
            assigned_to,
            sla_policy_id,
        }
    }
}
