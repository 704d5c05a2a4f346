//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (longest-prefix lookup over a RouteTable)
//!     → Return: RouteMatch { route, remaining } or no match
//!
//! Route table compilation (once per cache refresh):
//!     RoutingConfig.routes
//!     → Stable sort by path length, longest first
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Prefix matching only, case-sensitive, no normalization
//! - Equal-length prefixes keep their configured order
//! - Tables are immutable; a config change builds a new one

pub mod route;
pub mod router;

pub use route::{Route, RoutingConfig};
pub use router::{resolve, RouteMatch, RouteTable};
