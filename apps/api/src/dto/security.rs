use deskward_core::{AppError, AppResult, DepartmentId};
use deskward_domain::{
    DepartmentSelection, GrantSelection, PermissionGrant, PermissionKey, Role,
    RoleGrantReplacement,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

const ALL_DEPARTMENTS: &str = "ALL";

/// API representation of one grant row.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-grant-response.ts"
)]
pub struct PermissionGrantResponse {
    pub role: String,
    pub permission: String,
    pub department_id: Option<String>,
}

impl From<PermissionGrant> for PermissionGrantResponse {
    fn from(value: PermissionGrant) -> Self {
        Self {
            role: value.role.as_str().to_owned(),
            permission: value.permission.as_str().to_owned(),
            department_id: value
                .department_id
                .map(|department_id| department_id.to_string()),
        }
    }
}

/// Department scope of a selected grant: the literal `"ALL"` or a list of ids.
#[derive(Debug, Deserialize, TS)]
#[serde(untagged)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/department-selection-request.ts"
)]
pub enum DepartmentSelectionRequest {
    All(String),
    Departments(Vec<String>),
}

impl DepartmentSelectionRequest {
    fn into_selection(self) -> AppResult<DepartmentSelection> {
        match self {
            Self::All(value) if value == ALL_DEPARTMENTS => Ok(DepartmentSelection::All),
            Self::All(value) => Err(AppError::Validation(format!(
                "departments must be '{ALL_DEPARTMENTS}' or a list of ids, got '{value}'"
            ))),
            Self::Departments(values) => values
                .iter()
                .map(|value| value.parse::<DepartmentId>())
                .collect::<AppResult<Vec<_>>>()
                .map(DepartmentSelection::Departments),
        }
    }
}

/// One permission picked for one role.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/grant-selection-request.ts"
)]
pub struct GrantSelectionRequest {
    pub permission: String,
    pub role: String,
    pub departments: DepartmentSelectionRequest,
}

/// Incoming payload replacing every grant held by the listed roles.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/replace-permissions-request.ts"
)]
pub struct ReplacePermissionsRequest {
    pub roles: Vec<String>,
    pub grants: Vec<GrantSelectionRequest>,
}

impl ReplacePermissionsRequest {
    /// Validates transport values into a replacement command.
    pub fn into_replacement(self) -> AppResult<RoleGrantReplacement> {
        let roles = self
            .roles
            .iter()
            .map(|value| Role::from_transport(value.as_str()))
            .collect::<AppResult<Vec<_>>>()?;

        let selections = self
            .grants
            .into_iter()
            .map(|grant| {
                Ok(GrantSelection {
                    permission: PermissionKey::from_transport(grant.permission.as_str())?,
                    role: Role::from_transport(grant.role.as_str())?,
                    departments: grant.departments.into_selection()?,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        RoleGrantReplacement::new(roles, selections)
    }
}
