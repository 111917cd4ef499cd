use std::{
    env,
    num::{NonZeroU32, NonZeroUsize},
    str::FromStr,
};

const DEFAULT_RATE_LIMIT_PER_MINUTE: NonZeroU32 = NonZeroU32::new(60).unwrap();
const DEFAULT_MAX_CONCURRENT_REQUESTS: NonZeroUsize = NonZeroUsize::new(1024).unwrap();

/// Runtime configuration, read from the environment (and `.env` via dotenvy).
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub rate_limit_per_minute: NonZeroU32,
    pub max_concurrent_requests: NonZeroUsize,
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| "JWT_SECRET must be set!".to_string())?;

        Ok(Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            jwt_secret,
            token_ttl_hours: parse_or("TOKEN_TTL_HOURS", 24)?,
            bcrypt_cost: parse_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            rate_limit_per_minute: parse_or("RATE_LIMIT_PER_MINUTE", DEFAULT_RATE_LIMIT_PER_MINUTE)?,
            max_concurrent_requests: parse_or(
                "MAX_CONCURRENT_REQUESTS",
                DEFAULT_MAX_CONCURRENT_REQUESTS,
            )?,
            request_timeout_secs: parse_or("REQUEST_TIMEOUT_SECS", 10)?,
        })
    }

    /// Config used by tests: cheap hashing, generous limits.
    pub fn for_tests() -> Self {
        Self {
            bind_addr: "127.0.0.1:0".to_string(),
            jwt_secret: "test-secret".to_string(),
            token_ttl_hours: 1,
            bcrypt_cost: 4,
            rate_limit_per_minute: const { NonZeroU32::new(10_000).unwrap() },
            max_concurrent_requests: const { NonZeroUsize::new(64).unwrap() },
            request_timeout_secs: 10,
        }
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> Result<T, String> {
    parse_value(key, env::var(key).ok(), default)
}

/// Zero is not a valid value for the `NonZero*` limits and is rejected here.
fn parse_value<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, String> {
    match raw {
        Some(raw) => raw
            .parse()
            .map_err(|_| format!("{} has an invalid value: {}", key, raw)),
        None => Ok(default),
    }
}
