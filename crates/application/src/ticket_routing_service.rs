use std::sync::Arc;

use chrono::Utc;
use deskward_core::{
    AppError, AppResult, DepartmentId, NonEmptyString, TicketId, UserId, UserIdentity,
};
use deskward_domain::{
    AssigneeRequest, AssignmentChange, AssignmentPlan, AuditAction, PermissionKey,
    PermissionSnapshot, Ticket, dedupe_in_order,
};
use tracing::{info, warn};

use crate::{
    AssignmentSignal, AssignmentSignalSink, AuditEvent, AuditRepository, AuthorizationService,
    DirectoryRepository, SaveTicketInput, TicketAssignmentPlanner, TicketRepository,
    TicketRoutingInput,
};

/// Application service running ticket create and edit flows through the routing core.
#[derive(Clone)]
pub struct TicketRoutingService {
    authorization_service: AuthorizationService,
    planner: TicketAssignmentPlanner,
    directory_repository: Arc<dyn DirectoryRepository>,
    ticket_repository: Arc<dyn TicketRepository>,
    signal_sink: Arc<dyn AssignmentSignalSink>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl TicketRoutingService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        planner: TicketAssignmentPlanner,
        directory_repository: Arc<dyn DirectoryRepository>,
        ticket_repository: Arc<dyn TicketRepository>,
        signal_sink: Arc<dyn AssignmentSignalSink>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            planner,
            directory_repository,
            ticket_repository,
            signal_sink,
            audit_repository,
        }
    }

    /// Returns the routing decision a mutation would produce, without persisting anything.
    pub async fn preview_plan(
        &self,
        actor: &UserIdentity,
        routing: TicketRoutingInput,
    ) -> AppResult<AssignmentPlan> {
        self.authorization_service
            .require_permission(actor, PermissionKey::AccessCrmTickets)
            .await?;

        let department_ids = dedupe_in_order(routing.department_ids);
        self.ensure_departments_exist(&department_ids).await?;

        Ok(self
            .planner
            .plan(routing.priority, &department_ids, routing.assigned_to)
            .await)
    }

    /// Creates a ticket with planner-computed owner and SLA policy.
    pub async fn create_ticket(
        &self,
        actor: &UserIdentity,
        input: SaveTicketInput,
    ) -> AppResult<Ticket> {
        let snapshot = self
            .authorization_service
            .require_permission(actor, PermissionKey::CreateTickets)
            .await?;

        let title = NonEmptyString::new(input.title)?;
        let department_ids = dedupe_in_order(input.routing.department_ids);
        self.ensure_departments_exist(&department_ids).await?;
        self.ensure_assignee_allowed(&snapshot, input.routing.assigned_to, None)
            .await?;

        let plan = self
            .planner
            .plan(input.routing.priority, &department_ids, input.routing.assigned_to)
            .await;

        let ticket = Ticket::new(
            TicketId::new(),
            title,
            input.description,
            input.routing.priority,
            department_ids,
            plan.assigned_to,
            plan.sla_policy_id,
            actor.user_id(),
        )?;

        self.ticket_repository
            .insert_ticket(&ticket)
            .await
            .map_err(|error| persistence_failure(ticket.id(), error))?;

        info!(
            ticket_id = %ticket.id(),
            actor = %actor.user_id(),
            assigned_to = ?ticket.assigned_to(),
            sla_policy_id = ?ticket.sla_policy_id(),
            "created ticket"
        );

        self.append_audit_event(AuditEvent {
            subject: actor.user_id().to_string(),
            action: AuditAction::TicketCreated,
            resource_type: "ticket".to_owned(),
            resource_id: ticket.id().to_string(),
            detail: Some(format!(
                "created ticket '{}' with priority '{}'",
                ticket.title().as_str(),
                ticket.priority().as_str()
            )),
        })
        .await;
        self.signal_assignment_change(actor, &ticket, None, &plan)
            .await;

        Ok(ticket)
    }

    /// Replaces the editable fields of a ticket and re-runs routing.
    pub async fn update_ticket(
        &self,
        actor: &UserIdentity,
        ticket_id: TicketId,
        input: SaveTicketInput,
    ) -> AppResult<Ticket> {
        let snapshot = self
            .authorization_service
            .require_permission(actor, PermissionKey::EditTickets)
            .await?;

        let existing = self
            .ticket_repository
            .find_ticket(ticket_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("ticket '{ticket_id}' was not found")))?;

        let title = NonEmptyString::new(input.title)?;
        let department_ids = dedupe_in_order(input.routing.department_ids);
        self.ensure_departments_exist(&department_ids).await?;
        self.ensure_assignee_allowed(&snapshot, input.routing.assigned_to, existing.assigned_to())
            .await?;

        let plan = self
            .planner
            .plan(input.routing.priority, &department_ids, input.routing.assigned_to)
            .await;

        let ticket = Ticket::new(
            existing.id(),
            title,
            input.description,
            input.routing.priority,
            department_ids,
            plan.assigned_to,
            plan.sla_policy_id,
            existing.created_by(),
        )?;

        self.ticket_repository
            .update_ticket(&ticket)
            .await
            .map_err(|error| persistence_failure(ticket.id(), error))?;

        info!(
            ticket_id = %ticket.id(),
            actor = %actor.user_id(),
            assigned_to = ?ticket.assigned_to(),
            sla_policy_id = ?ticket.sla_policy_id(),
            "updated ticket"
        );

        self.append_audit_event(AuditEvent {
            subject: actor.user_id().to_string(),
            action: AuditAction::TicketUpdated,
            resource_type: "ticket".to_owned(),
            resource_id: ticket.id().to_string(),
            detail: Some(format!(
                "updated ticket '{}' with priority '{}'",
                ticket.title().as_str(),
                ticket.priority().as_str()
            )),
        })
        .await;
        self.signal_assignment_change(actor, &ticket, existing.assigned_to(), &plan)
            .await;

        Ok(ticket)
    }

    async fn ensure_departments_exist(&self, department_ids: &[DepartmentId]) -> AppResult<()> {
        if department_ids.is_empty() {
            return Ok(());
        }

        let found = self
            .directory_repository
            .find_departments(department_ids)
            .await?;

        let missing: Vec<String> = department_ids
            .iter()
            .filter(|department_id| !found.iter().any(|department| department.id == **department_id))
            .map(ToString::to_string)
            .collect();

        if missing.is_empty() {
            return Ok(());
        }

        Err(AppError::Validation(format!(
            "unknown departments: {}",
            missing.join(", ")
        )))
    }

    async fn ensure_assignee_allowed(
        &self,
        snapshot: &PermissionSnapshot,
        requested: AssigneeRequest,
        current_assignee: Option<UserId>,
    ) -> AppResult<()> {
        let AssigneeRequest::Explicit(user_id) = requested else {
            return Ok(());
        };

        if current_assignee == Some(user_id) {
            return Ok(());
        }

        if !snapshot.allows(PermissionKey::AssignTickets) {
            return Err(AppError::Forbidden(format!(
                "role '{}' is missing permission '{}' required to pick an assignee",
                snapshot.context().role.as_str(),
                PermissionKey::AssignTickets.as_str()
            )));
        }

        if self
            .directory_repository
            .find_user_context(user_id)
            .await?
            .is_none()
        {
            return Err(AppError::Validation(format!(
                "assignee '{user_id}' does not exist"
            )));
        }

        Ok(())
    }

    async fn signal_assignment_change(
        &self,
        actor: &UserIdentity,
        ticket: &Ticket,
        previous_assignee: Option<UserId>,
        plan: &AssignmentPlan,
    ) {
        let Some(change) = AssignmentChange::detect(previous_assignee, plan) else {
            return;
        };

        info!(
            ticket_id = %ticket.id(),
            previous_assignee = ?change.previous_assignee,
            new_assignee = ?change.new_assignee,
            "ticket assignment changed"
        );

        let signal = AssignmentSignal {
            ticket_id: ticket.id(),
            previous_assignee: change.previous_assignee,
            new_assignee: change.new_assignee,
            changed_by: actor.user_id(),
            occurred_at: Utc::now(),
        };
        if let Err(error) = self.signal_sink.publish(signal).await {
            warn!(ticket_id = %ticket.id(), %error, "failed to publish assignment signal");
        }

        self.append_audit_event(AuditEvent {
            subject: actor.user_id().to_string(),
            action: AuditAction::TicketAssignmentChanged,
            resource_type: "ticket".to_owned(),
            resource_id: ticket.id().to_string(),
            detail: Some(format!(
                "assignee changed from '{}' to '{}'",
                display_assignee(change.previous_assignee),
                display_assignee(change.new_assignee)
            )),
        })
        .await;
    }

    async fn append_audit_event(&self, event: AuditEvent) {
        let action = event.action;
        if let Err(error) = self.audit_repository.append_event(event).await {
            warn!(action = action.as_str(), %error, "failed to append audit event");
        }
    }
}

fn persistence_failure(ticket_id: TicketId, error: AppError) -> AppError {
    match error {
        AppError::Internal(message) => {
            AppError::Internal(format!("ticket '{ticket_id}' was not saved: {message}"))
        }
        other => other,
    }
}

fn display_assignee(assignee: Option<UserId>) -> String {
    assignee.map_or_else(|| "unassigned".to_owned(), |user_id| user_id.to_string())
}
