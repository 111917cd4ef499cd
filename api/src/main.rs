// ============================================================================
// TWEET FEED API
// ============================================================================

// - User signup/login with password hashing
// - JWT authentication & authorization
// - Keyset-paginated timeline, optionally per author
// - Likes unique per (tweet, user)
// - Rate limiting, CORS, request timeouts
// - Input validation
// - Structured logging

use feed_api::{AppState, app, config::Config};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("feed_api=info,tower_http=info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let addr = config.bind_addr.clone();
    let app = app(AppState::new(config));

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Server running on http://{}", addr);
    info!("API Endpoints:");
    info!("  GET    /health                - Health check");
    info!("  POST   /auth/signup           - Create account");
    info!("  POST   /auth/login            - Login");
    info!("  GET    /users/me              - Get current user (auth)");
    info!("  GET    /users/:name/tweets    - Author timeline (paginated)");
    info!("  POST   /tweets                - Create tweet (auth)");
    info!("  GET    /tweets                - Timeline (paginated)");
    info!("  GET    /tweets/:id            - Get specific tweet");
    info!("  POST   /tweets/:id/like       - Like tweet (auth)");
    info!("  DELETE /tweets/:id/like       - Unlike tweet (auth)");

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
    }
}
