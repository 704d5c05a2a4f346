//! Route lookup.
//!
//! # Responsibilities
//! - Order routes longest prefix first
//! - Find the first route whose prefix matches the request path
//! - Return the matched route and the unmatched remainder, or no match
//!
//! # Design Decisions
//! - Stable sort by length only: equal-length prefixes keep input order
//! - O(n) prefix scan (acceptable for typical route counts)
//! - Explicit `None` for no match rather than a silent default route

use std::cmp::Reverse;

use crate::routing::route::{Route, RoutingConfig};

/// A successful lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    /// The selected route.
    pub route: &'a Route,
    /// Request path with the route's prefix removed (may be empty).
    pub remaining: &'a str,
}

impl<'a> RouteMatch<'a> {
    fn new(route: &'a Route, request_path: &'a str) -> Self {
        Self {
            route,
            remaining: &request_path[route.path.len()..],
        }
    }
}

/// Select the route with the longest prefix of `request_path`.
///
/// Sorts on every call; use [`RouteTable`] to sort once per config.
pub fn resolve<'a>(routes: &'a [Route], request_path: &'a str) -> Option<RouteMatch<'a>> {
    let mut ordered: Vec<&Route> = routes.iter().collect();
    ordered.sort_by_key(|route| Reverse(route.prefix_len()));
    ordered
        .into_iter()
        .find(|route| route.matches(request_path))
        .map(|route| RouteMatch::new(route, request_path))
}

/// Immutable routing snapshot built from one [`RoutingConfig`].
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    config: RoutingConfig,
    longest_first: Vec<Route>,
}

impl RouteTable {
    pub fn new(config: RoutingConfig) -> Self {
        let mut longest_first = config.routes.clone();
        longest_first.sort_by_key(|route| Reverse(route.prefix_len()));
        Self {
            config,
            longest_first,
        }
    }

    /// The configuration in its stored order.
    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.longest_first.len()
    }

    pub fn is_empty(&self) -> bool {
        self.longest_first.is_empty()
    }

    /// Same semantics as [`resolve`] over the stored routes.
    pub fn resolve<'a>(&'a self, request_path: &'a str) -> Option<RouteMatch<'a>> {
        self.longest_first
            .iter()
            .find(|route| route.matches(request_path))
            .map(|route| RouteMatch::new(route, request_path))
    }
}

impl From<RoutingConfig> for RouteTable {
    fn from(config: RoutingConfig) -> Self {
        Self::new(config)
    }
}
