mod common;
mod security;
mod tickets;

pub use common::{AccessResponse, HealthResponse};
pub use security::{
    DepartmentSelectionRequest, GrantSelectionRequest, PermissionGrantResponse,
    ReplacePermissionsRequest,
};
pub use tickets::{
    AssignmentPlanResponse, PlanTicketRequest, SaveTicketRequest, SlaPolicyResponse,
    TicketResponse,
};
