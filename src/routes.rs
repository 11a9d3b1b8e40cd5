use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{companies, jobs, system};
use crate::middleware::require_admin;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = if state.config.security.enable_cors {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };
    let body_limit = DefaultBodyLimit::max(state.config.api.max_request_size_bytes);

    Router::new()
        // Public
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .merge(company_routes(state.clone()))
        .merge(job_routes(state.clone()))
        .with_state(state)
        // Global middleware
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Reads are public; writes sit behind the admin gate.
fn company_routes(state: AppState) -> Router<AppState> {
    let admin = from_fn_with_state(state, require_admin);

    Router::new()
        .route(
            "/companies",
            get(companies::list).merge(post(companies::create).route_layer(admin.clone())),
        )
        .route(
            "/companies/:handle",
            get(companies::get).merge(
                patch(companies::update)
                    .delete(companies::delete)
                    .route_layer(admin),
            ),
        )
}

fn job_routes(state: AppState) -> Router<AppState> {
    let admin = from_fn_with_state(state, require_admin);

    Router::new()
        .route("/jobs", get(jobs::list).merge(post(jobs::create).route_layer(admin.clone())))
        .route(
            "/jobs/:id",
            get(jobs::get).merge(patch(jobs::update).delete(jobs::delete).route_layer(admin)),
        )
}
