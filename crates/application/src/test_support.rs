use std::collections::HashMap;

use async_trait::async_trait;
use deskward_core::{
    AppError, AppResult, DepartmentId, NonEmptyString, TicketId, UserId, UserIdentity,
};
use deskward_domain::{
    Department, PermissionGrant, Role, SlaPolicy, Ticket, TicketPriority, UserContext,
};
use tokio::sync::Mutex;

use crate::{
    AssignmentSignal, AssignmentSignalSink, AuditEvent, AuditRepository, DirectoryRepository,
    GrantRepository, SlaPolicyRepository, TicketRepository,
};

pub(crate) fn actor(user_id: UserId) -> UserIdentity {
    UserIdentity::new(user_id, "tester", None)
}

#[derive(Default)]
pub(crate) struct FakeGrantRepository {
    pub(crate) grants: Mutex<Vec<PermissionGrant>>,
    pub(crate) fail_inserts: bool,
    pub(crate) fail_reads: bool,
}

impl FakeGrantRepository {
    pub(crate) fn with_grants(grants: Vec<PermissionGrant>) -> Self {
        Self {
            grants: Mutex::new(grants),
            ..Self::default()
        }
    }
}

#[async_trait]
impl GrantRepository for FakeGrantRepository {
    async fn list_grants_for_role(&self, role: Role) -> AppResult<Vec<PermissionGrant>> {
        if self.fail_reads {
            return Err(AppError::Internal("grant store unavailable".to_owned()));
        }

        Ok(self
            .grants
            .lock()
            .await
            .iter()
            .filter(|grant| grant.role == role)
            .copied()
            .collect())
    }

    async fn list_grants(&self) -> AppResult<Vec<PermissionGrant>> {
        Ok(self.grants.lock().await.clone())
    }

    async fn delete_grants_for_roles(&self, roles: &[Role]) -> AppResult<u64> {
        let mut grants = self.grants.lock().await;
        let before = grants.len();
        grants.retain(|grant| !roles.contains(&grant.role));
        Ok((before - grants.len()) as u64)
    }

    async fn insert_grants(&self, grants: &[PermissionGrant]) -> AppResult<()> {
        if self.fail_inserts {
            return Err(AppError::Internal("insert rejected".to_owned()));
        }

        self.grants.lock().await.extend_from_slice(grants);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeDirectoryRepository {
    pub(crate) users: HashMap<UserId, UserContext>,
    pub(crate) departments: Vec<Department>,
    pub(crate) fail_head_lookups: bool,
}

impl FakeDirectoryRepository {
    pub(crate) fn with_user(mut self, user_id: UserId, context: UserContext) -> Self {
        self.users.insert(user_id, context);
        self
    }

    pub(crate) fn with_department(mut self, department_id: DepartmentId, name: &str) -> Self {
        if let Ok(name) = NonEmptyString::new(name) {
            self.departments.push(Department {
                id: department_id,
                name,
            });
        }
        self
    }
}

#[async_trait]
impl DirectoryRepository for FakeDirectoryRepository {
    async fn find_user_context(&self, user_id: UserId) -> AppResult<Option<UserContext>> {
        Ok(self.users.get(&user_id).copied())
    }

    async fn list_department_head_ids(
        &self,
        department_id: DepartmentId,
    ) -> AppResult<Vec<UserId>> {
        if self.fail_head_lookups {
            return Err(AppError::Internal("directory unavailable".to_owned()));
        }

        Ok(self
            .users
            .iter()
            .filter(|(_, context)| {
                context.role == Role::DepartmentHead && context.department_id == Some(department_id)
            })
            .map(|(user_id, _)| *user_id)
            .collect())
    }

    async fn find_departments(
        &self,
        department_ids: &[DepartmentId],
    ) -> AppResult<Vec<Department>> {
        Ok(self
            .departments
            .iter()
            .filter(|department| department_ids.contains(&department.id))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(crate) struct FakeSlaPolicyRepository {
    pub(crate) policies: Vec<SlaPolicy>,
    pub(crate) fail_lookups: bool,
}

#[async_trait]
impl SlaPolicyRepository for FakeSlaPolicyRepository {
    async fn list_policies_for_priority(
        &self,
        priority: TicketPriority,
    ) -> AppResult<Vec<SlaPolicy>> {
        if self.fail_lookups {
            return Err(AppError::Internal("policy store unavailable".to_owned()));
        }

        Ok(self
            .policies
            .iter()
            .filter(|policy| policy.priority == priority)
            .cloned()
            .collect())
    }

    async fn list_policies(&self) -> AppResult<Vec<SlaPolicy>> {
        Ok(self.policies.clone())
    }
}

#[derive(Default)]
pub(crate) struct FakeTicketRepository {
    pub(crate) tickets: Mutex<HashMap<TicketId, Ticket>>,
    pub(crate) fail_writes: bool,
}

#[async_trait]
impl TicketRepository for FakeTicketRepository {
    async fn find_ticket(&self, ticket_id: TicketId) -> AppResult<Option<Ticket>> {
        Ok(self.tickets.lock().await.get(&ticket_id).cloned())
    }

    async fn insert_ticket(&self, ticket: &Ticket) -> AppResult<()> {
        if self.fail_writes {
            return Err(AppError::Internal("ticket store rejected write".to_owned()));
        }

        self.tickets.lock().await.insert(ticket.id(), ticket.clone());
        Ok(())
    }

    async fn update_ticket(&self, ticket: &Ticket) -> AppResult<()> {
        if self.fail_writes {
            return Err(AppError::Internal("ticket store rejected write".to_owned()));
        }

        self.tickets.lock().await.insert(ticket.id(), ticket.clone());
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct RecordingSignalSink {
    pub(crate) signals: Mutex<Vec<AssignmentSignal>>,
    pub(crate) fail: bool,
}

#[async_trait]
impl AssignmentSignalSink for RecordingSignalSink {
    async fn publish(&self, signal: AssignmentSignal) -> AppResult<()> {
        if self.fail {
            return Err(AppError::Internal("outbox unavailable".to_owned()));
        }

        self.signals.lock().await.push(signal);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeAuditRepository {
    pub(crate) events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}
