pub mod auth;
pub mod client;
pub mod config;
pub mod dto;
pub mod errors;
pub mod extract;
pub mod feed;
pub mod models;
pub mod routes;
pub mod states;
pub mod store;

pub use states::AppState;

use axum::{
    BoxError, Json, Router,
    error_handling::HandleErrorLayer,
    http::StatusCode,
    routing::{get, post},
};
use routes::{health::health_check, tweet, user};
use std::time::Duration;
use tower::{ServiceBuilder, limit::GlobalConcurrencyLimitLayer};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Builds the router with every route and middleware layer.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Router::layer clones the stack into every route, so the permits
    // have to be shared up front for the limit to be server-wide.
    let limits = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(handle_middleware_error))
        .timeout(Duration::from_secs(state.config.request_timeout_secs))
        .layer(GlobalConcurrencyLimitLayer::new(
            state.config.max_concurrent_requests.get(),
        ));

    Router::new()
        // Public routes (no auth required)
        .route("/health", get(health_check))
        .route("/auth/signup", post(user::signup))
        .route("/auth/login", post(user::login))
        .route("/tweets", get(tweet::timeline).post(tweet::create_tweet))
        .route("/tweets/{id}", get(tweet::get_tweet))
        .route("/users/{name}/tweets", get(tweet::author_timeline))
        // Protected routes (auth required)
        .route("/users/me", get(user::get_current_user))
        .route(
            "/tweets/{id}/like",
            post(tweet::like_tweet).delete(tweet::unlike_tweet),
        )
        // Add state and middleware
        .with_state(state)
        .layer(limits)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn handle_middleware_error(err: BoxError) -> (StatusCode, Json<serde_json::Value>) {
    let (status, message) = if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "Request timed out")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Service unavailable")
    };

    (
        status,
        Json(serde_json::json!({
          "error": message
        })),
    )
}
