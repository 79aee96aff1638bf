use deskward_application::{SaveTicketInput, TicketRoutingInput};
use deskward_core::{AppResult, DepartmentId};
use deskward_domain::{AssigneeRequest, AssignmentPlan, SlaPolicy, Ticket, TicketPriority};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for a routing preview.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/plan-ticket-request.ts"
)]
pub struct PlanTicketRequest {
    pub priority: String,
    #[serde(default)]
    pub department_ids: Vec<String>,
    /// `"auto-assign"`, a user id, or absent for no owner.
    #[serde(default)]
    pub assigned_to: Option<String>,
}

impl PlanTicketRequest {
    /// Validates transport values into routing input.
    pub fn into_routing(self) -> AppResult<TicketRoutingInput> {
        routing_input(
            self.priority.as_str(),
            &self.department_ids,
            self.assigned_to.as_deref(),
        )
    }
}

/// Incoming payload for ticket creation and full ticket updates.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/save-ticket-request.ts"
)]
pub struct SaveTicketRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub priority: String,
    #[serde(default)]
    pub department_ids: Vec<String>,
    /// `"auto-assign"`, a user id, or absent for no owner.
    #[serde(default)]
    pub assigned_to: Option<String>,
}

impl SaveTicketRequest {
    /// Validates transport values into a save command.
    pub fn into_input(self) -> AppResult<SaveTicketInput> {
        let routing = routing_input(
            self.priority.as_str(),
            &self.department_ids,
            self.assigned_to.as_deref(),
        )?;

        Ok(SaveTicketInput {
            title: self.title,
            description: self.description,
            routing,
        })
    }
}

fn routing_input(
    priority: &str,
    department_ids: &[String],
    assigned_to: Option<&str>,
) -> AppResult<TicketRoutingInput> {
    Ok(TicketRoutingInput {
        priority: TicketPriority::from_transport(priority)?,
        department_ids: department_ids
            .iter()
            .map(|value| value.parse::<DepartmentId>())
            .collect::<AppResult<Vec<_>>>()?,
        assigned_to: AssigneeRequest::from_transport(assigned_to)?,
    })
}

/// Planner decision.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/assignment-plan-response.ts"
)]
pub struct AssignmentPlanResponse {
    pub assigned_to: Option<String>,
    pub sla_policy_id: Option<String>,
}

impl From<AssignmentPlan> for AssignmentPlanResponse {
    fn from(value: AssignmentPlan) -> Self {
        Self {
            assigned_to: value.assigned_to.map(|user_id| user_id.to_string()),
            sla_policy_id: value.sla_policy_id.map(|policy_id| policy_id.to_string()),
        }
    }
}

/// API representation of a routed ticket.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/ticket-response.ts"
)]
pub struct TicketResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub priority: String,
    pub department_ids: Vec<String>,
    pub assigned_to: Option<String>,
    pub sla_policy_id: Option<String>,
    pub created_by: String,
}

impl From<Ticket> for TicketResponse {
    fn from(value: Ticket) -> Self {
        Self {
            id: value.id().to_string(),
            title: value.title().as_str().to_owned(),
            description: value.description().map(str::to_owned),
            priority: value.priority().as_str().to_owned(),
            department_ids: value
                .department_ids()
                .iter()
                .map(ToString::to_string)
                .collect(),
            assigned_to: value.assigned_to().map(|user_id| user_id.to_string()),
            sla_policy_id: value.sla_policy_id().map(|policy_id| policy_id.to_string()),
            created_by: value.created_by().to_string(),
        }
    }
}

/// API representation of an SLA policy.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/sla-policy-response.ts"
)]
pub struct SlaPolicyResponse {
    pub id: String,
    pub name: String,
    pub priority: String,
    pub department_id: Option<String>,
    pub first_response_minutes: u32,
    pub resolution_minutes: u32,
}

impl From<SlaPolicy> for SlaPolicyResponse {
    fn from(value: SlaPolicy) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            priority: value.priority.as_str().to_owned(),
            department_id: value
                .department_id
                .map(|department_id| department_id.to_string()),
            first_response_minutes: value.first_response_minutes,
            resolution_minutes: value.resolution_minutes,
        }
    }
}
