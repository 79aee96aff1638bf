use axum::Json;
use axum::extract::{Extension, State};
use deskward_core::UserIdentity;

use crate::dto::AccessResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn access_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<AccessResponse>> {
    let summary = state
        .authorization_service
        .accessible_permissions(&user)
        .await?;

    Ok(Json(AccessResponse::from(summary)))
}
