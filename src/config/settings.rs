//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub pagination: PaginationConfig,
    pub phone: PhoneConfig,
    pub rate_limit: RateLimitConfig,
    pub audit: AuditConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub route_prefix: String,
    pub cors_origins: Vec<String>,
    /// Take the client address from `X-Forwarded-For`; enable only behind a proxy that sets it
    pub trust_forwarded_for: bool,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
}

/// Permission guard configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub enabled: bool,
    pub jwt_secret: String,
}

/// Listing defaults
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaginationConfig {
    pub default_limit: i64,
    pub max_limit: i64,
}

/// Phone number normalization
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PhoneConfig {
    pub default_country_prefix: String,
}

/// Throttling of get-by-id requests
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    pub view_per_minute: u32,
    /// How often idle client entries are dropped from the limiter
    pub cleanup_interval_seconds: u64,
}

/// Audit trail configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuditConfig {
    pub enabled: bool,
    /// Recorded when an event carries no description of its own
    pub application_name: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: Option<String>,
    pub json: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables.
    ///
    /// Defaults are layered underneath so a partial `config.toml` is enough.
    pub fn new() -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&Settings::default())?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("KINDERGARTEN")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::KindergartenError> {
        super::validation::validate_settings(self)
    }

    /// Socket address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                route_prefix: "/api/kindergarten".to_string(),
                cors_origins: vec![],
                trust_forwarded_for: false,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/kindergarten".to_string(),
                max_connections: 10,
                min_connections: 1,
                acquire_timeout_seconds: 30,
            },
            auth: AuthConfig {
                enabled: true,
                jwt_secret: "change-me".to_string(),
            },
            pagination: PaginationConfig {
                default_limit: 16,
                max_limit: 100,
            },
            phone: PhoneConfig {
                default_country_prefix: "+38".to_string(),
            },
            rate_limit: RateLimitConfig {
                view_per_minute: 60,
                cleanup_interval_seconds: 300,
            },
            audit: AuditConfig {
                enabled: true,
                application_name: "kindergarten-office".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                directory: None,
                json: false,
            },
        }
    }
}
