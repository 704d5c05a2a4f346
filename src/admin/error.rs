//! Config API errors and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::config::ValidationError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid Password")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    #[error("invalid routes: {}", join_errors(.0))]
    InvalidRoutes(Vec<ValidationError>),

    #[error("{0}")]
    Store(#[from] StoreError),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) | Self::InvalidRoutes(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::InvalidRoutes(vec![ValidationError::EmptyRoutePath { index: 0 }]).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Store(StoreError::Unavailable("down".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unauthorized_message_is_stable() {
        assert_eq!(ApiError::Unauthorized.to_string(), "Invalid Password");
    }

    #[test]
    fn test_invalid_routes_lists_each_problem() {
        let err = ApiError::InvalidRoutes(vec![
            ValidationError::EmptyRoutePath { index: 0 },
            ValidationError::EmptyRoutePath { index: 2 },
        ]);
        let text = err.to_string();
        assert!(text.contains("route 0"));
        assert!(text.contains("route 2"));
    }
}
