use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deskward_core::{AppResult, DepartmentId, TicketId, UserId};
use deskward_domain::{AssigneeRequest, SlaPolicy, Ticket, TicketPriority};

/// Repository port over SLA policies.
#[async_trait]
pub trait SlaPolicyRepository: Send + Sync {
    /// Lists the policies governing one priority.
    async fn list_policies_for_priority(
        &self,
        priority: TicketPriority,
    ) -> AppResult<Vec<SlaPolicy>>;

    /// Lists every policy.
    async fn list_policies(&self) -> AppResult<Vec<SlaPolicy>>;
}

/// Repository port over ticket records.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Finds one ticket.
    async fn find_ticket(&self, ticket_id: TicketId) -> AppResult<Option<Ticket>>;

    /// Persists a new ticket together with its ordered departments.
    async fn insert_ticket(&self, ticket: &Ticket) -> AppResult<()>;

    /// Overwrites an existing ticket together with its ordered departments.
    async fn update_ticket(&self, ticket: &Ticket) -> AppResult<()>;
}

/// Assignment-changed signal handed to the notification collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentSignal {
    /// Ticket whose owner changed.
    pub ticket_id: TicketId,
    /// Owner before the mutation.
    pub previous_assignee: Option<UserId>,
    /// Owner after the mutation.
    pub new_assignee: Option<UserId>,
    /// User whose mutation caused the change.
    pub changed_by: UserId,
    /// When the change was computed.
    pub occurred_at: DateTime<Utc>,
}

/// Port receiving assignment-changed signals. Delivery is owned elsewhere.
#[async_trait]
pub trait AssignmentSignalSink: Send + Sync {
    /// Records one signal.
    async fn publish(&self, signal: AssignmentSignal) -> AppResult<()>;
}

/// Routing-relevant fields of a ticket mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketRoutingInput {
    /// Ticket priority.
    pub priority: TicketPriority,
    /// Departments in assignment order.
    pub department_ids: Vec<DepartmentId>,
    /// Requested owner.
    pub assigned_to: AssigneeRequest,
}

/// Input payload for ticket creation and full ticket updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTicketInput {
    /// Ticket title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Routing fields.
    pub routing: TicketRoutingInput,
}
