//! Configuration module
//!
//! Configuration is read from environment variables with sensible defaults,
//! validated once at startup.

use std::env;

use crate::error::AppError;

const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;
const DEFAULT_BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub environment: String,
    pub request_body_limit_bytes: usize,
    /// Base URL of the client-portal serverless function.
    pub portal_function_url: String,
    /// Base URL of the create-team-member serverless function.
    pub team_function_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| AppError::Internal("DATABASE_URL must be set".to_string()))?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| AppError::Internal("JWT_SECRET must be set".to_string()))?;

        let config = Config {
            server_port: parse_env("SERVER_PORT", DEFAULT_SERVER_PORT),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            database_url,
            db_max_connections: parse_env("DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS),
            db_timeout_seconds: parse_env("DB_TIMEOUT_SECONDS", DEFAULT_CONNECTION_TIMEOUT_SECS),
            jwt_secret,
            jwt_expiry_hours: parse_env("JWT_EXPIRY_HOURS", DEFAULT_JWT_EXPIRY_HOURS),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            request_body_limit_bytes: parse_env("REQUEST_BODY_LIMIT_BYTES", DEFAULT_BODY_LIMIT_BYTES),
            portal_function_url: env::var("PORTAL_FUNCTION_URL")
                .unwrap_or_else(|_| "http://localhost:9000/client-portal".to_string()),
            team_function_url: env::var("TEAM_FUNCTION_URL")
                .unwrap_or_else(|_| "http://localhost:9000/create-team-member".to_string()),
        };

        validate_env(&config)?;
        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        matches!(self.environment.as_str(), "production" | "prod")
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse::<T>().ok())
        .unwrap_or(default)
}

/// Fail fast on misconfiguration rather than at first request.
pub fn validate_env(config: &Config) -> Result<(), AppError> {
    if config.jwt_secret.len() < 32 && config.is_production() {
        return Err(AppError::Internal(
            "JWT_SECRET must be at least 32 bytes in production".to_string(),
        ));
    }
    if config.db_max_connections == 0 {
        return Err(AppError::Internal(
            "DB_MAX_CONNECTIONS must be at least 1".to_string(),
        ));
    }
    if config.is_production() && config.cors_origins.is_empty() {
        return Err(AppError::Internal(
            "CORS_ORIGINS must be set in production".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            server_port: 8080,
            cors_origins: vec![],
            database_url: "postgres://localhost/girder".to_string(),
            db_max_connections: 5,
            db_timeout_seconds: 30,
            jwt_secret: "test-secret".to_string(),
            jwt_expiry_hours: 24,
            environment: "development".to_string(),
            request_body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
            portal_function_url: "http://localhost:9000/client-portal".to_string(),
            team_function_url: "http://localhost:9000/create-team-member".to_string(),
        }
    }

    #[test]
    fn development_accepts_short_secret() {
        assert!(validate_env(&base_config()).is_ok());
    }

    #[test]
    fn production_rejects_short_secret() {
        let mut config = base_config();
        config.environment = "production".to_string();
        config.cors_origins = vec!["https://app.example.com".to_string()];
        assert!(validate_env(&config).is_err());

        config.jwt_secret = "a".repeat(32);
        assert!(validate_env(&config).is_ok());
    }

    #[test]
    fn zero_connections_rejected() {
        let mut config = base_config();
        config.db_max_connections = 0;
        assert!(validate_env(&config).is_err());
    }
}
