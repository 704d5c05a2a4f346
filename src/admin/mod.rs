//! Admin page and config API.
//!
//! - `/admin`           static route editor (any method)
//! - `GET  /api/config`  current routes as JSON
//! - `POST /api/config`  replace routes (`{routes, password}`)

pub mod auth;
pub mod error;
pub mod handlers;

use axum::{
    routing::{any, get},
    Router,
};

use crate::http::server::AppState;

pub use error::ApiError;
use self::handlers::{admin_page, get_config, update_config};

pub fn setup_admin_router() -> Router<AppState> {
    Router::new()
        .route("/admin", any(admin_page))
        .route("/api/config", get(get_config).post(update_config))
}
