use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use deskward_core::{TicketId, UserIdentity};

use crate::dto::{AssignmentPlanResponse, PlanTicketRequest, SaveTicketRequest, TicketResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn plan_ticket_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<PlanTicketRequest>,
) -> ApiResult<Json<AssignmentPlanResponse>> {
    let plan = state
        .ticket_routing_service
        .preview_plan(&user, payload.into_routing()?)
        .await?;

    Ok(Json(AssignmentPlanResponse::from(plan)))
}

pub async fn create_ticket_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<SaveTicketRequest>,
) -> ApiResult<(StatusCode, Json<TicketResponse>)> {
    let ticket = state
        .ticket_routing_service
        .create_ticket(&user, payload.into_input()?)
        .await?;

    Ok((StatusCode::CREATED, Json(TicketResponse::from(ticket))))
}

pub async fn update_ticket_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(ticket_id): Path<String>,
    Json(payload): Json<SaveTicketRequest>,
) -> ApiResult<Json<TicketResponse>> {
    let ticket_id = ticket_id.parse::<TicketId>()?;
    let ticket = state
        .ticket_routing_service
        .update_ticket(&user, ticket_id, payload.into_input()?)
        .await?;

    Ok(Json(TicketResponse::from(ticket)))
}
