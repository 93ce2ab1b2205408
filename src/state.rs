use chrono::Duration;
use sqlx::PgPool;

use crate::auth::token::TokenKeys;
use crate::config::Config;

/// Everything handlers need, built once in main and cloned per request.
/// Keeping the pool and signing material here (rather than in globals)
/// ties their lifetime to the process and keeps handlers injectable.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub keys: TokenKeys,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        Self {
            pool,
            keys: TokenKeys::new(
                &config.jwt_secret,
                Duration::hours(config.jwt_expires_in_hours),
            ),
        }
    }
}
