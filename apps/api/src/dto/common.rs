use deskward_application::AccessSummary;
use serde::Serialize;
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Permissions the session principal holds, for shaping the UI.
///
/// Advisory only; every mutation re-checks on the server.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/access-response.ts"
)]
pub struct AccessResponse {
    pub role: String,
    pub department_id: Option<String>,
    pub permissions: Vec<String>,
}

impl From<AccessSummary> for AccessResponse {
    fn from(value: AccessSummary) -> Self {
        Self {
            role: value.context.role.as_str().to_owned(),
            department_id: value
                .context
                .department_id
                .map(|department_id| department_id.to_string()),
            permissions: value
                .permissions
                .into_iter()
                .map(|permission| permission.as_str().to_owned())
                .collect(),
        }
    }
}
