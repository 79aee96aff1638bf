use std::sync::Arc;

use deskward_application::{
    AssignmentSignalSink, AuditRepository, AuthorizationService, DepartmentHeadResolver,
    DirectoryRepository, GrantRepository, PermissionAdminService, SlaPolicyRepository,
    SlaPolicyResolver, SlaPolicyService, TicketAssignmentPlanner, TicketRepository,
    TicketRoutingService,
};
use deskward_infrastructure::{
    ConsoleAssignmentSignalSink, PostgresAssignmentOutbox, PostgresAuditRepository,
    PostgresDirectoryRepository, PostgresGrantRepository, PostgresSlaPolicyRepository,
    PostgresTicketRepository,
};
use sqlx::PgPool;

use crate::api_config::{ApiConfig, SignalSinkConfig};
use crate::state::AppState;

/// Port implementations the services are composed from.
pub struct RepositorySet {
    pub grant_repository: Arc<dyn GrantRepository>,
    pub directory_repository: Arc<dyn DirectoryRepository>,
    pub sla_policy_repository: Arc<dyn SlaPolicyRepository>,
    pub ticket_repository: Arc<dyn TicketRepository>,
    pub audit_repository: Arc<dyn AuditRepository>,
    pub signal_sink: Arc<dyn AssignmentSignalSink>,
}

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> AppState {
    let signal_sink: Arc<dyn AssignmentSignalSink> = match config.signal_sink {
        SignalSinkConfig::Console => Arc::new(ConsoleAssignmentSignalSink::new()),
        SignalSinkConfig::Outbox => Arc::new(PostgresAssignmentOutbox::new(pool.clone())),
    };

    let repositories = RepositorySet {
        grant_repository: Arc::new(PostgresGrantRepository::new(pool.clone())),
        directory_repository: Arc::new(PostgresDirectoryRepository::new(pool.clone())),
        sla_policy_repository: Arc::new(PostgresSlaPolicyRepository::new(pool.clone())),
        ticket_repository: Arc::new(PostgresTicketRepository::new(pool.clone())),
        audit_repository: Arc::new(PostgresAuditRepository::new(pool)),
        signal_sink,
    };

    compose_state(repositories, config.frontend_url.clone())
}

pub fn compose_state(repositories: RepositorySet, frontend_url: String) -> AppState {
    let authorization_service = AuthorizationService::new(
        repositories.grant_repository.clone(),
        repositories.directory_repository.clone(),
    );
    let planner = TicketAssignmentPlanner::new(
        DepartmentHeadResolver::new(repositories.directory_repository.clone()),
        SlaPolicyResolver::new(repositories.sla_policy_repository.clone()),
    );

    AppState {
        permission_admin_service: PermissionAdminService::new(
            authorization_service.clone(),
            repositories.grant_repository,
            repositories.audit_repository.clone(),
        ),
        sla_policy_service: SlaPolicyService::new(
            authorization_service.clone(),
            repositories.sla_policy_repository,
        ),
        ticket_routing_service: TicketRoutingService::new(
            authorization_service.clone(),
            planner,
            repositories.directory_repository,
            repositories.ticket_repository,
            repositories.signal_sink,
            repositories.audit_repository,
        ),
        authorization_service,
        frontend_url,
    }
}
