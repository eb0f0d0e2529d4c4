//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{KindergartenError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_auth_config(&settings.auth)?;
    validate_pagination_config(&settings.pagination)?;
    validate_phone_config(&settings.phone)?;
    validate_rate_limit_config(&settings.rate_limit)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate server configuration
fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.port == 0 {
        return Err(KindergartenError::Config(
            "Server port must be greater than 0".to_string()
        ));
    }

    if !config.route_prefix.is_empty() && !config.route_prefix.starts_with('/') {
        return Err(KindergartenError::Config(
            "Route prefix must start with '/'".to_string()
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(KindergartenError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(KindergartenError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(KindergartenError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate permission guard configuration
fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.enabled && config.jwt_secret.is_empty() {
        return Err(KindergartenError::Config(
            "JWT secret is required when auth is enabled".to_string()
        ));
    }

    Ok(())
}

/// Validate listing defaults
fn validate_pagination_config(config: &super::PaginationConfig) -> Result<()> {
    if config.default_limit <= 0 || config.max_limit <= 0 {
        return Err(KindergartenError::Config(
            "Pagination limits must be greater than 0".to_string()
        ));
    }

    if config.default_limit > config.max_limit {
        return Err(KindergartenError::Config(
            "Default page limit cannot exceed max page limit".to_string()
        ));
    }

    Ok(())
}

/// Validate phone normalization settings
fn validate_phone_config(config: &super::PhoneConfig) -> Result<()> {
    if !config.default_country_prefix.starts_with('+') {
        return Err(KindergartenError::Config(
            "Default country prefix must start with '+'".to_string()
        ));
    }

    Ok(())
}

/// Validate rate limit settings
fn validate_rate_limit_config(config: &super::RateLimitConfig) -> Result<()> {
    if config.view_per_minute == 0 {
        return Err(KindergartenError::Config(
            "View rate limit must be greater than 0".to_string()
        ));
    }

    if config.cleanup_interval_seconds == 0 {
        return Err(KindergartenError::Config(
            "Rate limit cleanup interval must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(KindergartenError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(KindergartenError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}
