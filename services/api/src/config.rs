//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Credentials for the image CDN that signs direct uploads.
#[derive(Clone, Debug, Default)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// SMTP account used for password reset mail.
#[derive(Clone, Debug)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// `None` runs the service on the in-memory store.
    pub database_url: Option<String>,
    pub log_level: Level,
    pub jwt_secret: String,
    pub jwt_refresh_secret: String,
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
    /// Base URL of the client app, used in reset-password links.
    pub app_domain: String,
    pub cors_origin: String,
    pub cookie_secure: bool,
    pub cloudinary: CloudinaryConfig,
    pub google_client_id: Option<String>,
    pub smtp: Option<SmtpConfig>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server and Database Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load Token Settings ---
        let jwt_secret = required("JWT_SECRET")?;
        let jwt_refresh_secret = required("JWT_REFRESH_SECRET")?;
        let access_token_ttl_secs = seconds("ACCESS_TOKEN_TTL_SECS", 60 * 60)?;
        let refresh_token_ttl_secs = seconds("REFRESH_TOKEN_TTL_SECS", 7 * 24 * 60 * 60)?;

        // --- Load Client-facing Settings ---
        let app_domain = std::env::var("APP_DOMAIN")
            .unwrap_or_else(|_| "http://localhost:5173/".to_string());
        let cors_origin =
            std::env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:5173".to_string());
        let cookie_secure = match std::env::var("COOKIE_SECURE") {
            Ok(value) => value.parse::<bool>().map_err(|_| {
                ConfigError::InvalidValue(
                    "COOKIE_SECURE".to_string(),
                    format!("'{}' is not true or false", value),
                )
            })?,
            Err(_) => true,
        };

        // --- Load Third-party Keys (as optional) ---
        let cloudinary = CloudinaryConfig {
            cloud_name: std::env::var("CLOUDINARY_CLOUD_NAME").unwrap_or_default(),
            api_key: std::env::var("CLOUDINARY_API_KEY").unwrap_or_default(),
            api_secret: std::env::var("CLOUDINARY_API_SECRET").unwrap_or_default(),
        };
        let google_client_id = std::env::var("GOOGLE_CLIENT_ID").ok();
        let smtp = match (std::env::var("EMAIL_USER"), std::env::var("EMAIL_PASSWORD")) {
            (Ok(username), Ok(password)) => Some(SmtpConfig {
                host: std::env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
                username,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            jwt_secret,
            jwt_refresh_secret,
            access_token_ttl_secs,
            refresh_token_ttl_secs,
            app_domain,
            cors_origin,
            cookie_secure,
            cloudinary,
            google_client_id,
            smtp,
        })
    }

    /// A configuration for tests and local tooling: in-memory store, fixed
    /// secrets, insecure cookies.
    pub fn for_tests() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 0)),
            database_url: None,
            log_level: Level::DEBUG,
            jwt_secret: "test-access-secret".to_string(),
            jwt_refresh_secret: "test-refresh-secret".to_string(),
            access_token_ttl_secs: 60 * 60,
            refresh_token_ttl_secs: 7 * 24 * 60 * 60,
            app_domain: "http://localhost:5173/".to_string(),
            cors_origin: "http://localhost:5173".to_string(),
            cookie_secure: false,
            cloudinary: CloudinaryConfig {
                cloud_name: "demo".to_string(),
                api_key: "key".to_string(),
                api_secret: "secret".to_string(),
            },
            google_client_id: None,
            smtp: None,
        }
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name.to_string()))
}

fn seconds(name: &str, default: i64) -> Result<i64, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .parse::<i64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    name.to_string(),
                    format!("'{}' is not a positive number of seconds", value),
                )
            }),
        Err(_) => Ok(default),
    }
}
