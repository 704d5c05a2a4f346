use axum::{body::Bytes, extract::State, response::Html, Json};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::admin::auth::verify_password;
use crate::admin::ApiError;
use crate::config::validation::validate_routes;
use crate::http::server::AppState;
use crate::routing::{Route, RoutingConfig};

const ADMIN_PAGE: &str = include_str!("../../assets/admin.html");

/// Body of `POST /api/config`, decoded once the password has been accepted.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigUpdate {
    pub routes: Vec<Route>,
    pub password: String,
}

pub async fn admin_page() -> Html<&'static str> {
    Html(ADMIN_PAGE)
}

pub async fn get_config(State(state): State<AppState>) -> Result<Json<RoutingConfig>, ApiError> {
    let table = state.cache.try_read().await?;
    Ok(Json(table.config().clone()))
}

/// Replace the stored routes.
///
/// The body is read as JSON whatever its content type. The password is
/// compared before anything else in the payload is interpreted, so a wrong
/// or non-string password is always a 401.
pub async fn update_config(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let fields: Map<String, Value> = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("body must be a JSON object: {e}")))?;

    if let Err(e) = verify_password(&state.admin_password, fields.get("password")) {
        tracing::warn!("Rejected config update with wrong password");
        return Err(e);
    }

    let update: ConfigUpdate = serde_json::from_value(Value::Object(fields)).map_err(|e| {
        ApiError::BadRequest(format!("expected {{routes: [{{path, target}}], password}}: {e}"))
    })?;
    let routes = update.routes;
    validate_routes(&routes).map_err(ApiError::InvalidRoutes)?;

    let count = routes.len();
    state.cache.write(RoutingConfig::new(routes)).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to persist routing config");
        ApiError::from(e)
    })?;

    tracing::info!(routes = count, "Routing config saved");
    Ok(Json(json!({ "success": true })))
}
