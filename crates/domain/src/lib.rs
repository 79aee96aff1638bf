//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod authorization;
mod routing;
mod security;
mod ticket;

pub use authorization::{PermissionSnapshot, granted_permissions, has_permission};
pub use routing::{
    AssignmentChange, AssignmentPlan, Department, RoutingSelection, SlaPolicy,
    select_department_head, select_sla_policy,
};
pub use security::{
    AuditAction, DepartmentSelection, GrantSelection, PermissionGrant, PermissionKey, Role,
    RoleGrantReplacement, UserContext,
};
pub use ticket::{AUTO_ASSIGN_SENTINEL, AssigneeRequest, Ticket, TicketPriority, dedupe_in_order};
