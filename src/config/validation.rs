//! Configuration validation.
//!
//! Serde handles syntax; this module checks values that parse but cannot
//! work at runtime. All errors are collected, not just the first.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{ServerConfig, StoreBackend};

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: `{value}` is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(
        &mut errors,
        "listener.bind_address",
        &config.listener.bind_address,
    );
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero("security.max_body_size"));
    }
    if config.jokes.sentinel.is_empty() {
        errors.push(ValidationError::Empty("jokes.sentinel"));
    }
    if config.static_files.enabled && config.static_files.dir.is_empty() {
        errors.push(ValidationError::Empty("static_files.dir"));
    }

    if config.database.backend == StoreBackend::Mongo {
        if config.database.uri.trim().is_empty() {
            errors.push(ValidationError::Empty("database.uri"));
        }
        if config.database.name.is_empty() {
            errors.push(ValidationError::Empty("database.name"));
        }
        if config.database.collection.is_empty() {
            errors.push(ValidationError::Empty("database.collection"));
        }
        if config.database.connect_timeout_secs == 0 {
            errors.push(ValidationError::Zero("database.connect_timeout_secs"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
