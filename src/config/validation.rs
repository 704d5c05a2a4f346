//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation of process settings (serde handles syntax)
//! - Syntactic well-formedness of routes submitted through the config API
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Route checks stop at well-formedness: reachability is not checked

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;
use crate::routing::Route;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} '{value}' is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("cache.ttl_secs must be greater than zero")]
    ZeroTtl,

    #[error("store.key must not be empty")]
    EmptyStoreKey,

    #[error("admin.password must not be empty")]
    EmptyAdminPassword,

    #[error("route {index}: path must not be empty")]
    EmptyRoutePath { index: usize },

    #[error("route {index}: target '{target}' {reason}")]
    InvalidRouteTarget {
        index: usize,
        target: String,
        reason: String,
    },
}

pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }
    if config.cache.ttl_secs == 0 {
        errors.push(ValidationError::ZeroTtl);
    }
    if config.store.key.is_empty() {
        errors.push(ValidationError::EmptyStoreKey);
    }
    if config.admin.password.is_empty() {
        errors.push(ValidationError::EmptyAdminPassword);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_routes(routes: &[Route]) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (index, route) in routes.iter().enumerate() {
        if route.path.is_empty() {
            errors.push(ValidationError::EmptyRoutePath { index });
        }
        if let Some(reason) = target_problem(&route.target) {
            errors.push(ValidationError::InvalidRouteTarget {
                index,
                target: route.target.clone(),
                reason,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn target_problem(target: &str) -> Option<String> {
    match Url::parse(target) {
        Err(e) => Some(format!("is not an absolute URL: {e}")),
        Ok(url) if !matches!(url.scheme(), "http" | "https") => {
            Some(format!("uses unsupported scheme '{}'", url.scheme()))
        }
        Ok(url) if url.host_str().is_none() => Some("has no host".to_string()),
        Ok(_) => None,
    }
}
