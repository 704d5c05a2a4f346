//! Persisted routing rules.
//!
//! The JSON shape is `{"routes":[{"path":"/openai","target":"https://api.openai.com"}]}`.
//! Unknown fields are rejected rather than ignored.

use serde::{Deserialize, Serialize};

/// A single path-prefix to target-URL mapping.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Route {
    /// Prefix matched against the start of the request path.
    pub path: String,

    /// Absolute upstream URL (scheme, host and optional base path).
    pub target: String,
}

impl Route {
    pub fn new(path: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            target: target.into(),
        }
    }

    /// Returns true if `request_path` starts with this route's prefix.
    pub fn matches(&self, request_path: &str) -> bool {
        request_path.starts_with(&self.path)
    }

    /// Length used for precedence, counted in characters.
    pub(crate) fn prefix_len(&self) -> usize {
        self.path.chars().count()
    }
}

/// The full set of routes, persisted and replaced as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    pub routes: Vec<Route>,
}

impl RoutingConfig {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
