// src/routes.rs

use axum::{
    Router, http::Method, middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, matching, profile, users},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, users, match).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (pool, config, matching engine).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:4200".parse().unwrap(),
        "http://127.0.0.1:4200".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let user_routes = Router::new()
        .route("/me", get(users::get_me))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let match_routes = Router::new()
        .route("/potential/{user_id}", get(matching::get_potential_matches))
        .route("/swipe/{user_id}", post(matching::swipe))
        .route("/matches/{user_id}", get(matching::get_matches))
        .route(
            "/profile/{user_id}",
            get(profile::get_profile).post(profile::upsert_profile),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/match", match_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
