// src/config.rs

use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    /// Discovery relevance threshold (0-100). Candidates scoring below this
    /// are never surfaced. Product-tunable, not structurally fixed.
    pub match_min_score: f64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86400);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let match_min_score = env::var("MATCH_MIN_SCORE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(50.0);

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            match_min_score,
        }
    }
}
