//! Caller identity for the multi-tenant API.
//!
//! Authentication itself happens in front of this application (a reverse
//! proxy that validates credentials and forwards the resolved user id).
//! This module only reads the identity the auth layer attached to the
//! request.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// The header the authenticating reverse proxy sets to the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The id of a user of the application.
///
/// Every account, category and transaction is owned by exactly one user, and
/// all queries filter on this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserId(i64);

impl UserId {
    /// Create a user id from an integer id.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// The user id as an integer, e.g. for SQL query parameters.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok())
            .map(UserId::new)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"error": "missing or invalid user identity"})),
                )
                    .into_response()
            })
    }
}
