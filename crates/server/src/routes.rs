use axum::{
    http::StatusCode,
    middleware,
    routing::{get, patch, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::metrics::{encode_metrics, track_metrics};
use crate::openapi::ApiDoc;

pub mod auth;
pub mod houses;
pub mod transactions;
pub mod users;

use auth::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics() -> (StatusCode, String) {
    encode_metrics()
}

/// Routes under `/api`, grouped by guard.
fn api_router(state: &ServerState) -> Router<ServerState> {
    let public = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/houses", get(houses::list))
        .route("/houses/count", get(houses::count))
        .route("/houses/:id", get(houses::detail));

    let authenticated = Router::new()
        .route("/logout", get(auth::logout))
        .route("/auth", get(auth::check_auth))
        .route("/user", get(users::get_profile).patch(users::update_profile))
        .route("/user/password", patch(users::change_password))
        .route("/user/avatar", patch(users::update_avatar))
        .route("/transactions", get(transactions::list))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    // route_layer: last added runs first, so require_auth precedes the role check
    let owner = Router::new()
        .route("/houses", post(houses::create))
        .route("/houses/me", get(houses::mine))
        .route("/houses/:id", patch(houses::update).delete(houses::delete))
        .route("/transactions/status/:id", patch(transactions::set_status))
        .route_layer(middleware::from_fn(auth::require_owner))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    let tenant = Router::new()
        .route("/transactions", post(transactions::create))
        .route("/transactions/pay/:id", patch(transactions::pay))
        .route_layer(middleware::from_fn(auth::require_tenant))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    public.merge(authenticated).merge(owner).merge(tenant)
}

/// Build the full application router: `/api`, health, metrics, docs and static assets.
pub fn build_router(state: ServerState, cors: CorsLayer, frontend_dir: &str) -> Router {
    let static_dir = ServeDir::new(frontend_dir)
        .fallback(ServeFile::new(format!("{frontend_dir}/index.html")));

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .nest("/api", api_router(&state))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback_service(static_dir)
        .layer(middleware::from_fn(track_metrics))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
