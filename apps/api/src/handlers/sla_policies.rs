use axum::Json;
use axum::extract::{Extension, State};
use deskward_core::UserIdentity;

use crate::dto::SlaPolicyResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_sla_policies_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<SlaPolicyResponse>>> {
    let policies = state
        .sla_policy_service
        .list_policies(&user)
        .await?
        .into_iter()
        .map(SlaPolicyResponse::from)
        .collect();

    Ok(Json(policies))
}
