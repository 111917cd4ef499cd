use crate::{config::Config, errors::ApiError, store::Store};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::sync::Arc;
use uuid::Uuid;

// ============================================================================
// APPLICATION STATE - Shared data across all requests
// ============================================================================
/// `Arc` = Atomic Reference Counter
/// - Cloning the state per request only bumps counters
/// - The store shares its maps the same way internally
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: Arc<Config>,
    pub limiter: Arc<DefaultKeyedRateLimiter<Uuid>>, // Mutations per user
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self::with_store(config, Store::new())
    }

    pub fn with_store(config: Config, store: Store) -> Self {
        let quota = Quota::per_minute(config.rate_limit_per_minute);

        Self {
            store,
            config: Arc::new(config),
            limiter: Arc::new(RateLimiter::keyed(quota)),
        }
    }

    pub fn check_rate_limit(&self, user_id: Uuid) -> Result<(), ApiError> {
        self.limiter
            .check_key(&user_id)
            .map_err(|_| ApiError::RateLimited)
    }
}
