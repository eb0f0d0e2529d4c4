//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the back office service.

use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use crate::config::LoggingConfig;
use crate::utils::errors::{KindergartenError, Result};

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer and must outlive the server.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| KindergartenError::Config(format!("Invalid log filter: {}", e)))?;

    let stdout_layer = if config.json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().with_writer(std::io::stdout).boxed()
    };

    let (file_layer, guard) = match &config.directory {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::daily(directory, "kindergarten-office.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| KindergartenError::Config(format!("Logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log a successful create/update/delete
pub fn log_mutation(table: &str, action: &str, row_id: i64, actor_id: Option<i64>) {
    info!(
        table = table,
        action = action,
        row_id = row_id,
        actor_id = actor_id,
        "Record mutated"
    );
}

/// Log the outcome of a mobile attendance batch
pub fn log_batch_summary(format: &str, succeeded: usize, failed: usize, actor_id: Option<i64>) {
    if failed > 0 {
        warn!(
            format = format,
            succeeded = succeeded,
            failed = failed,
            actor_id = actor_id,
            "Attendance batch applied with errors"
        );
    } else {
        info!(
            format = format,
            succeeded = succeeded,
            actor_id = actor_id,
            "Attendance batch applied"
        );
    }
}

/// Log an audit write that could not be persisted
pub fn log_audit_failure(table: &str, action: &str, error: &str) {
    warn!(
        table = table,
        action = action,
        error = error,
        "Audit log write failed (non-critical)"
    );
}

/// Log database operations
pub fn log_database_operation(operation: &str, table: &str, duration_ms: u64, success: bool) {
    if success {
        debug!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation completed"
        );
    } else {
        error!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation failed"
        );
    }
}
