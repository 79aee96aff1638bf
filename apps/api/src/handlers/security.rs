use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use deskward_core::UserIdentity;

use crate::dto::{PermissionGrantResponse, ReplacePermissionsRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<PermissionGrantResponse>>> {
    let grants = state
        .permission_admin_service
        .list_grants(&user)
        .await?
        .into_iter()
        .map(PermissionGrantResponse::from)
        .collect();

    Ok(Json(grants))
}

pub async fn replace_permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<ReplacePermissionsRequest>,
) -> ApiResult<StatusCode> {
    let replacement = payload.into_replacement()?;

    state
        .permission_admin_service
        .replace_role_grants(&user, replacement)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
