//! Shared-secret check for config writes.
//!
//! A single password guards `POST /api/config`. It is compared as a plain
//! string; there are no users, sessions or tokens.

use serde_json::Value;

use crate::admin::ApiError;

/// Accept only a JSON string equal to `expected`. Missing, `null` or
/// non-string values are mismatches.
pub fn verify_password(expected: &str, provided: Option<&Value>) -> Result<(), ApiError> {
    match provided {
        Some(Value::String(password)) if password == expected => Ok(()),
        _ => Err(ApiError::Unauthorized),
    }
}
