use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post, put};
use deskward_core::AppError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::PostgresStore;

use crate::state::AppState;
use crate::{handlers, middleware};

pub fn build_router(
    app_state: AppState,
    session_layer: SessionManagerLayer<PostgresStore>,
) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route("/api/access", get(handlers::access::access_handler))
        .route(
            "/api/security/permissions",
            get(handlers::security::list_permissions_handler)
                .put(handlers::security::replace_permissions_handler),
        )
        .route(
            "/api/sla-policies",
            get(handlers::sla_policies::list_sla_policies_handler),
        )
        .route(
            "/api/tickets/plan",
            post(handlers::tickets::plan_ticket_handler),
        )
        .route(
            "/api/tickets",
            post(handlers::tickets::create_ticket_handler),
        )
        .route(
            "/api/tickets/{ticket_id}",
            put(handlers::tickets::update_ticket_handler),
        )
        .route_layer(from_fn(middleware::require_auth));

    let cors_layer = build_cors_layer(&app_state.frontend_url)?;

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(session_layer)
        .with_state(app_state))
}

fn build_cors_layer(frontend_url: &str) -> Result<CorsLayer, AppError> {
    Ok(CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]))
}
