//! Application settings loaded from environment variables.

use std::env;
use std::time::Duration;

use super::constants::{
    DEFAULT_CONTACT_CACHE_TTL_SECONDS, DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS,
    DEFAULT_REDIS_URL, DEFAULT_RESET_PASSWORD_URL, DEFAULT_RESET_TOKEN_TTL_MINUTES,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, MAX_CONTACT_CACHE_TTL_SECONDS,
    MAX_JWT_EXPIRATION_HOURS, MAX_RESET_TOKEN_TTL_MINUTES, MIN_JWT_SECRET_LENGTH,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub contact_cache_ttl_seconds: u64,
    pub reset_token_ttl_minutes: i64,
    pub reset_password_url: String,
    pub server_host: String,
    pub server_port: u16,
    /// Run the job workers inside the `serve` process
    pub run_workers: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("contact_cache_ttl_seconds", &self.contact_cache_ttl_seconds)
            .field("reset_token_ttl_minutes", &self.reset_token_ttl_minutes)
            .field("reset_password_url", &self.reset_password_url)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("run_workers", &self.run_workers)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set or is too short (security requirement),
    /// or if a lifetime setting is not positive or exceeds its maximum.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        let config = Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string()),
            jwt_secret,
            jwt_expiration_hours: parse_var("JWT_EXPIRATION_HOURS")
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
            contact_cache_ttl_seconds: parse_var("CONTACT_CACHE_TTL_SECONDS")
                .unwrap_or(DEFAULT_CONTACT_CACHE_TTL_SECONDS),
            reset_token_ttl_minutes: parse_var("RESET_TOKEN_TTL_MINUTES")
                .unwrap_or(DEFAULT_RESET_TOKEN_TTL_MINUTES),
            reset_password_url: env::var("RESET_PASSWORD_URL")
                .unwrap_or_else(|_| DEFAULT_RESET_PASSWORD_URL.to_string()),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: parse_var("SERVER_PORT").unwrap_or(DEFAULT_SERVER_PORT),
            run_workers: env::var("RUN_WORKERS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        };

        if let Err(message) = config.check_lifetimes() {
            panic!("{}", message);
        }

        config
    }

    /// Ensure every lifetime is positive and within its maximum.
    fn check_lifetimes(&self) -> Result<(), String> {
        if !(1..=MAX_JWT_EXPIRATION_HOURS).contains(&self.jwt_expiration_hours) {
            return Err(format!(
                "JWT_EXPIRATION_HOURS must be between 1 and {}, got {}",
                MAX_JWT_EXPIRATION_HOURS, self.jwt_expiration_hours
            ));
        }
        if !(1..=MAX_RESET_TOKEN_TTL_MINUTES).contains(&self.reset_token_ttl_minutes) {
            return Err(format!(
                "RESET_TOKEN_TTL_MINUTES must be between 1 and {}, got {}",
                MAX_RESET_TOKEN_TTL_MINUTES, self.reset_token_ttl_minutes
            ));
        }
        if !(1..=MAX_CONTACT_CACHE_TTL_SECONDS).contains(&self.contact_cache_ttl_seconds) {
            return Err(format!(
                "CONTACT_CACHE_TTL_SECONDS must be between 1 and {}, got {}",
                MAX_CONTACT_CACHE_TTL_SECONDS, self.contact_cache_ttl_seconds
            ));
        }
        Ok(())
    }

    /// Build a configuration with an explicit secret and defaults elsewhere.
    ///
    /// Used by tests and embedders that do not read the environment.
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            redis_url: DEFAULT_REDIS_URL.to_string(),
            jwt_secret: jwt_secret.into(),
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            contact_cache_ttl_seconds: DEFAULT_CONTACT_CACHE_TTL_SECONDS,
            reset_token_ttl_minutes: DEFAULT_RESET_TOKEN_TTL_MINUTES,
            reset_password_url: DEFAULT_RESET_PASSWORD_URL.to_string(),
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            run_workers: false,
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// TTL applied to cached contact snapshots.
    pub fn contact_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.contact_cache_ttl_seconds)
    }

    /// Lifetime of a password reset token.
    pub fn reset_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::try_minutes(self.reset_token_ttl_minutes)
            .unwrap_or_else(|| chrono::Duration::minutes(DEFAULT_RESET_TOKEN_TTL_MINUTES))
    }

    /// Lifetime of an issued JWT, `None` when the hours overflow.
    pub fn jwt_expiration(&self) -> Option<chrono::Duration> {
        chrono::Duration::try_hours(self.jwt_expiration_hours)
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
