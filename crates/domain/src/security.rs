use std::collections::BTreeSet;
use std::str::FromStr;

use deskward_core::{AppError, DepartmentId};
use serde::{Deserialize, Serialize};

/// Closed set of principal roles known to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Front-line support agent.
    Agent,
    /// Regular employee raising tickets.
    Employee,
    /// Head of one department.
    DepartmentHead,
    /// Cross-department manager.
    Manager,
    /// Platform operator.
    SystemAdmin,
    /// Installation owner with unrestricted access.
    SuperAdmin,
    /// Executive with unrestricted access.
    Ceo,
}

impl Role {
    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Agent => "agent",
            Self::Employee => "employee",
            Self::DepartmentHead => "department_head",
            Self::Manager => "manager",
            Self::SystemAdmin => "system_admin",
            Self::SuperAdmin => "super_admin",
            Self::Ceo => "ceo",
        }
    }

    /// Returns all known roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Role] = &[
            Role::Agent,
            Role::Employee,
            Role::DepartmentHead,
            Role::Manager,
            Role::SystemAdmin,
            Role::SuperAdmin,
            Role::Ceo,
        ];

        ALL
    }

    /// Returns whether this role bypasses the grant table.
    #[must_use]
    pub fn is_superuser(&self) -> bool {
        matches!(self, Self::SystemAdmin | Self::SuperAdmin | Self::Ceo)
    }

    /// Parses a transport value into a role.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "agent" => Ok(Self::Agent),
            "employee" => Ok(Self::Employee),
            "department_head" => Ok(Self::DepartmentHead),
            "manager" => Ok(Self::Manager),
            "system_admin" => Ok(Self::SystemAdmin),
            "super_admin" => Ok(Self::SuperAdmin),
            "ceo" => Ok(Self::Ceo),
            _ => Err(AppError::Validation(format!("unknown role value '{value}'"))),
        }
    }
}

/// Capabilities gated by permission grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionKey {
    /// Allows opening the CRM ticket workspace.
    AccessCrmTickets,
    /// Allows creating tickets.
    CreateTickets,
    /// Allows editing existing tickets.
    EditTickets,
    /// Allows deleting tickets.
    DeleteTickets,
    /// Allows picking an explicit assignee.
    AssignTickets,
    /// Allows opening the CRM dashboard.
    AccessCrmDashboard,
    /// Allows managing departments and their heads.
    ManageDepartments,
    /// Allows managing service-level policies.
    ManageSlaPolicies,
    /// Allows replacing role permission grants.
    ManageRoles,
    /// Allows reading analytics.
    ViewAnalytics,
    /// Allows browsing the knowledge base.
    AccessKnowledgeBase,
}

impl PermissionKey {
    /// Returns a stable storage value for this permission key.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessCrmTickets => "access_crm_tickets",
            Self::CreateTickets => "create_tickets",
            Self::EditTickets => "edit_tickets",
            Self::DeleteTickets => "delete_tickets",
            Self::AssignTickets => "assign_tickets",
            Self::AccessCrmDashboard => "access_crm_dashboard",
            Self::ManageDepartments => "manage_departments",
            Self::ManageSlaPolicies => "manage_sla_policies",
            Self::ManageRoles => "manage_roles",
            Self::ViewAnalytics => "view_analytics",
            Self::AccessKnowledgeBase => "access_knowledge_base",
        }
    }

    /// Returns all known permission keys.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PermissionKey] = &[
            PermissionKey::AccessCrmTickets,
            PermissionKey::CreateTickets,
            PermissionKey::EditTickets,
            PermissionKey::DeleteTickets,
            PermissionKey::AssignTickets,
            PermissionKey::AccessCrmDashboard,
            PermissionKey::ManageDepartments,
            PermissionKey::ManageSlaPolicies,
            PermissionKey::ManageRoles,
            PermissionKey::ViewAnalytics,
            PermissionKey::AccessKnowledgeBase,
        ];

        ALL
    }

    /// Parses a transport value into a permission key.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl FromStr for PermissionKey {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|key| key.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown permission value '{value}'")))
    }
}

/// One row of the grant table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PermissionGrant {
    /// Role receiving the capability.
    pub role: Role,
    /// Granted capability.
    pub permission: PermissionKey,
    /// Department scope; `None` grants the capability globally.
    pub department_id: Option<DepartmentId>,
}

impl PermissionGrant {
    /// Creates a global grant.
    #[must_use]
    pub fn global(role: Role, permission: PermissionKey) -> Self {
        Self {
            role,
            permission,
            department_id: None,
        }
    }

    /// Creates a grant scoped to one department.
    #[must_use]
    pub fn scoped(role: Role, permission: PermissionKey, department_id: DepartmentId) -> Self {
        Self {
            role,
            permission,
            department_id: Some(department_id),
        }
    }

    /// Returns whether the grant applies to every department.
    #[must_use]
    pub fn is_global(&self) -> bool {
        self.department_id.is_none()
    }
}

/// Snapshot of the acting principal at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserContext {
    /// Role held by the principal.
    pub role: Role,
    /// Department the principal belongs to, if any.
    pub department_id: Option<DepartmentId>,
}

impl UserContext {
    /// Creates a context snapshot.
    #[must_use]
    pub fn new(role: Role, department_id: Option<DepartmentId>) -> Self {
        Self {
            role,
            department_id,
        }
    }
}

/// Department selection of one bulk grant entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepartmentSelection {
    /// Grants the permission globally.
    All,
    /// Grants the permission in each listed department.
    Departments(Vec<DepartmentId>),
}

/// One entry of a bulk grant replacement request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantSelection {
    /// Permission being granted.
    pub permission: PermissionKey,
    /// Role receiving the permission.
    pub role: Role,
    /// Department scope of the grant.
    pub departments: DepartmentSelection,
}

/// Validated bulk replacement of every grant held by a set of roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGrantReplacement {
    roles: BTreeSet<Role>,
    grants: Vec<PermissionGrant>,
}

impl RoleGrantReplacement {
    /// Expands grant selections into grant rows for the affected roles.
    ///
    /// `All` expands to one global row; a department list expands to one row per
    /// distinct department, so an empty list contributes nothing. Duplicate rows collapse, and department rows already
    /// covered by a global row for the same role and permission are dropped.
    pub fn new(roles: Vec<Role>, selections: Vec<GrantSelection>) -> Result<Self, AppError> {
        let roles: BTreeSet<Role> = roles.into_iter().collect();
        if roles.is_empty() {
            return Err(AppError::Validation(
                "grant replacement must name at least one role".to_owned(),
            ));
        }

        let mut grants = BTreeSet::new();
        for selection in selections {
            if !roles.contains(&selection.role) {
                return Err(AppError::Validation(format!(
                    "grant for role '{}' is outside the replaced role set",
                    selection.role.as_str()
                )));
            }

            match selection.departments {
                DepartmentSelection::All => {
                    grants.insert(PermissionGrant::global(selection.role, selection.permission));
                }
                DepartmentSelection::Departments(department_ids) => {
                    grants.extend(department_ids.into_iter().map(|department_id| {
                        PermissionGrant::scoped(selection.role, selection.permission, department_id)
                    }));
                }
            }
        }

        let globals: BTreeSet<(Role, PermissionKey)> = grants
            .iter()
            .filter(|grant| grant.is_global())
            .map(|grant| (grant.role, grant.permission))
            .collect();
        let grants = grants
            .into_iter()
            .filter(|grant| grant.is_global() || !globals.contains(&(grant.role, grant.permission)))
            .collect();

        Ok(Self { roles, grants })
    }

    /// Returns the roles whose grants are replaced.
    #[must_use]
    pub fn roles(&self) -> Vec<Role> {
        self.roles.iter().copied().collect()
    }

    /// Returns the expanded grant rows.
    #[must_use]
    pub fn grants(&self) -> &[PermissionGrant] {
        self.grants.as_slice()
    }

    /// Consumes the replacement into its roles and grant rows.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Role>, Vec<PermissionGrant>) {
        (self.roles.into_iter().collect(), self.grants)
    }
}

/// Stable audit actions emitted by application use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when the grants of a role set are replaced.
    SecurityPermissionsReplaced,
    /// Emitted when a ticket is created.
    TicketCreated,
    /// Emitted when a ticket is updated.
    TicketUpdated,
    /// Emitted when a ticket changes owner.
    TicketAssignmentChanged,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SecurityPermissionsReplaced => "security.permissions.replaced",
            Self::TicketCreated => "ticket.created",
            Self::TicketUpdated => "ticket.updated",
            Self::TicketAssignmentChanged => "ticket.assignment.changed",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use deskward_core::DepartmentId;

    use super::{
        DepartmentSelection, GrantSelection, PermissionGrant, PermissionKey, Role,
        RoleGrantReplacement,
    };

    #[test]
    fn permission_roundtrip_storage_value() {
        for permission in PermissionKey::all() {
            let restored = PermissionKey::from_str(permission.as_str());
            assert_eq!(restored.ok(), Some(*permission));
        }
    }

    #[test]
    fn unknown_permission_is_rejected() {
        let parsed = PermissionKey::from_str("access_everything");
        assert!(parsed.is_err());
    }

    #[test]
    fn role_serializes_as_snake_case() {
        let json = serde_json::to_string(&Role::DepartmentHead).unwrap_or_default();
        assert_eq!(json, "\"department_head\"");
        assert_eq!(Role::from_transport("department_head").ok(), Some(Role::DepartmentHead));
    }

    #[test]
    fn only_admin_roles_are_superusers() {
        let superusers: Vec<Role> = Role::all()
            .iter()
            .copied()
            .filter(Role::is_superuser)
            .collect();
        assert_eq!(
            superusers,
            vec![Role::SystemAdmin, Role::SuperAdmin, Role::Ceo]
        );
    }

    #[test]
    fn replacement_expands_all_to_single_global_row() {
        let replacement = RoleGrantReplacement::new(
            vec![Role::Agent],
            vec![GrantSelection {
                permission: PermissionKey::AccessCrmTickets,
                role: Role::Agent,
                departments: DepartmentSelection::All,
            }],
        );

        let grants = replacement
            .map(|value| value.grants().to_vec())
            .unwrap_or_default();
        assert_eq!(
            grants,
            vec![PermissionGrant::global(Role::Agent, PermissionKey::AccessCrmTickets)]
        );
    }

    #[test]
    fn replacement_expands_departments_and_collapses_duplicates() {
        let first = DepartmentId::new();
        let second = DepartmentId::new();
        let replacement = RoleGrantReplacement::new(
            vec![Role::DepartmentHead],
            vec![GrantSelection {
                permission: PermissionKey::EditTickets,
                role: Role::DepartmentHead,
                departments: DepartmentSelection::Departments(vec![first, second, first]),
            }],
        );

        let grants = replacement
            .map(|value| value.grants().to_vec())
            .unwrap_or_default();
        assert_eq!(grants.len(), 2);
        assert!(grants.iter().all(|grant| !grant.is_global()));
    }

    #[test]
    fn replacement_drops_department_rows_shadowed_by_global_row() {
        let department_id = DepartmentId::new();
        let replacement = RoleGrantReplacement::new(
            vec![Role::Manager],
            vec![
                GrantSelection {
                    permission: PermissionKey::ViewAnalytics,
                    role: Role::Manager,
                    departments: DepartmentSelection::Departments(vec![department_id]),
                },
                GrantSelection {
                    permission: PermissionKey::ViewAnalytics,
                    role: Role::Manager,
                    departments: DepartmentSelection::All,
                },
            ],
        );

        let grants = replacement
            .map(|value| value.grants().to_vec())
            .unwrap_or_default();
        assert_eq!(
            grants,
            vec![PermissionGrant::global(Role::Manager, PermissionKey::ViewAnalytics)]
        );
    }

    #[test]
    fn replacement_allows_empty_grant_set() {
        let replacement = RoleGrantReplacement::new(vec![Role::Agent], Vec::new());
        let (roles, grants) = replacement
            .map(RoleGrantReplacement::into_parts)
            .unwrap_or_default();
        assert_eq!(roles, vec![Role::Agent]);
        assert!(grants.is_empty());
    }

    #[test]
    fn replacement_rejects_role_outside_affected_set() {
        let replacement = RoleGrantReplacement::new(
            vec![Role::Agent],
            vec![GrantSelection {
                permission: PermissionKey::ManageRoles,
                role: Role::Manager,
                departments: DepartmentSelection::All,
            }],
        );
        assert!(replacement.is_err());
    }

    #[test]
    fn replacement_expands_empty_department_list_to_no_rows() {
        let replacement = RoleGrantReplacement::new(
            vec![Role::Agent],
            vec![
                GrantSelection {
                    permission: PermissionKey::AccessCrmTickets,
                    role: Role::Agent,
                    departments: DepartmentSelection::Departments(Vec::new()),
                },
                GrantSelection {
                    permission: PermissionKey::CreateTickets,
                    role: Role::Agent,
                    departments: DepartmentSelection::All,
                },
            ],
        );
        let Ok(replacement) = replacement else {
            panic!("replacement should accept an empty department list");
        };

        assert_eq!(
            replacement.grants(),
            [PermissionGrant::global(Role::Agent, PermissionKey::CreateTickets)]
        );
    }
}
