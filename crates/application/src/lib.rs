//! Application services and ports.

#![forbid(unsafe_code)]

mod audit_ports;
mod authorization_service;
mod department_head_resolver;
mod permission_admin_service;
mod routing_ports;
mod security_ports;
mod sla_policy_resolver;
mod sla_policy_service;
#[cfg(test)]
mod test_support;
mod ticket_assignment_planner;
mod ticket_routing_service;

pub use audit_ports::{AuditEvent, AuditRepository};
pub use authorization_service::{AccessSummary, AuthorizationService};
pub use department_head_resolver::DepartmentHeadResolver;
pub use permission_admin_service::PermissionAdminService;
pub use routing_ports::{
    AssignmentSignal, AssignmentSignalSink, SaveTicketInput, SlaPolicyRepository,
    TicketRepository, TicketRoutingInput,
};
pub use security_ports::{DirectoryRepository, GrantRepository, role_list};
pub use sla_policy_resolver::SlaPolicyResolver;
pub use sla_policy_service::SlaPolicyService;
pub use ticket_assignment_planner::TicketAssignmentPlanner;
pub use ticket_routing_service::TicketRoutingService;
