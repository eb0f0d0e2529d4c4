//! Error handling for the kindergarten back office
//!
//! This module defines the main error type used throughout the application,
//! its HTTP translation, and the severity used when logging failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// SQLSTATE raised by PostgreSQL on a unique index violation
const UNIQUE_VIOLATION: &str = "23505";

/// Main error type for the application
#[derive(Error, Debug)]
pub enum KindergartenError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("{0}")]
    DatabaseQuery(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for application operations
pub type Result<T> = std::result::Result<T, KindergartenError>;

impl KindergartenError {
    /// Turn a unique index violation into a `Conflict` carrying `message`.
    ///
    /// Any other error is returned untouched.
    pub fn or_conflict(self, message: &str) -> Self {
        match &self {
            KindergartenError::Database(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                KindergartenError::Conflict(message.to_string())
            }
            _ => self,
        }
    }

    /// Short machine-readable kind, used in the response body
    pub fn kind(&self) -> &'static str {
        match self {
            KindergartenError::NotFound(_) => "not_found",
            KindergartenError::Conflict(_) => "conflict",
            KindergartenError::Validation(_) => "validation_error",
            KindergartenError::Database(_)
            | KindergartenError::Migration(_)
            | KindergartenError::DatabaseQuery(_) => "database_error",
            KindergartenError::Config(_) => "config_error",
            KindergartenError::Authentication(_) => "unauthorized",
            KindergartenError::PermissionDenied(_) => "forbidden",
            KindergartenError::RateLimitExceeded => "rate_limited",
            KindergartenError::Serialization(_)
            | KindergartenError::Io(_)
            | KindergartenError::Internal(_) => "internal_error",
        }
    }

    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            KindergartenError::NotFound(_) => StatusCode::NOT_FOUND,
            KindergartenError::Conflict(_) => StatusCode::CONFLICT,
            KindergartenError::Validation(_) => StatusCode::BAD_REQUEST,
            KindergartenError::Authentication(_) => StatusCode::UNAUTHORIZED,
            KindergartenError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            KindergartenError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            KindergartenError::Database(_) => ErrorSeverity::Critical,
            KindergartenError::Migration(_) => ErrorSeverity::Critical,
            KindergartenError::Config(_) => ErrorSeverity::Critical,
            KindergartenError::DatabaseQuery(_) => ErrorSeverity::Error,
            KindergartenError::PermissionDenied(_) => ErrorSeverity::Warning,
            KindergartenError::Authentication(_) => ErrorSeverity::Warning,
            KindergartenError::RateLimitExceeded => ErrorSeverity::Warning,
            KindergartenError::NotFound(_)
            | KindergartenError::Conflict(_)
            | KindergartenError::Validation(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// Message safe to hand to a client; internals stay in the logs
    pub fn client_message(&self) -> String {
        match self.status_code() {
            StatusCode::INTERNAL_SERVER_ERROR => match self {
                KindergartenError::DatabaseQuery(message) => message.clone(),
                _ => "Внутрішня помилка сервера".to_string(),
            },
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for KindergartenError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self.severity() {
            ErrorSeverity::Critical | ErrorSeverity::Error => {
                tracing::error!(error = %self, severity = %self.severity(), "Request failed");
            }
            ErrorSeverity::Warning => {
                tracing::warn!(error = %self, "Request rejected");
            }
            ErrorSeverity::Info => {
                tracing::debug!(error = %self, "Request rejected");
            }
        }

        let body = json!({
            "error": self.kind(),
            "message": self.client_message(),
        });

        (status, Json(body)).into_response()
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
