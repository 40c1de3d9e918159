//! Route table: public, login and bearer-protected routers merged into one app.

use crate::{
    api::dashboard,
    auth::{api as auth_api, auth_middleware, AuthState},
    middleware::request_logging,
};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

pub fn build_router(auth_state: AuthState) -> Router {
    // Login route (separate router with auth state)
    let auth_router = Router::new()
        .route("/token", post(auth_api::login))
        .with_state(auth_state.clone());

    // Protected API routes
    let protected_routes = Router::new()
        .route("/users/me", get(auth_api::read_current_user))
        .route_layer(middleware::from_fn_with_state(
            auth_state.tokens.clone(),
            auth_middleware,
        ));

    // Dashboard data is read anonymously by the frontend
    let public_routes = Router::new()
        .route("/", get(dashboard::root))
        .route("/health", get(dashboard::health))
        .route("/api/dashboard/stats", get(dashboard::get_stats))
        .route(
            "/api/dashboard/predictions-over-time",
            get(dashboard::get_predictions_over_time),
        )
        .route(
            "/api/dashboard/request-stats",
            get(dashboard::get_request_stats),
        )
        .route(
            "/api/dashboard/contact-requests",
            get(dashboard::get_contact_requests),
        )
        .route(
            "/api/dashboard/dataset-requests",
            get(dashboard::get_dataset_requests),
        )
        .route(
            "/api/dashboard/nanoparticle-types",
            get(dashboard::get_nanoparticle_types),
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(auth_router)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
}
