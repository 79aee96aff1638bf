use deskward_application::{
    AuthorizationService, PermissionAdminService, SlaPolicyService, TicketRoutingService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authorization_service: AuthorizationService,
    pub permission_admin_service: PermissionAdminService,
    pub sla_policy_service: SlaPolicyService,
    pub ticket_routing_service: TicketRoutingService,
    pub frontend_url: String,
}
