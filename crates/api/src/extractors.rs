//! Request extractors.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{HeaderMap, HeaderValue, StatusCode, request::Parts},
};
use serde::de::DeserializeOwned;
use streamhub_common::{AppError, AppResult};

use crate::middleware::{ADMIN_TOKEN_HEADER, USER_ID_HEADER};

/// Caller identity taken from the `X-User-Id` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserIdHeader(pub i32);

impl<S> FromRequestParts<S> for UserIdHeader
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::Unauthorized("User ID required".to_string()))?;

        raw.parse()
            .map(Self)
            .map_err(|_| AppError::BadRequest("X-User-Id must be an integer".to_string()))
    }
}

/// Query string parameters. A malformed query string is a JSON 400.
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "Rejected query string");
                Err(AppError::BadRequest("Invalid query string".to_string()))
            }
        }
    }
}

/// Raw request body, bounded by the router's body limit.
#[derive(Debug, Clone)]
pub struct RawBody(pub Bytes);

impl<S> FromRequest<S> for RawBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Bytes::from_request(req, state).await {
            Ok(bytes) => Ok(Self(bytes)),
            Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                Err(AppError::PayloadTooLarge)
            }
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "Failed to read request body");
                Err(AppError::BadRequest("Invalid request body".to_string()))
            }
        }
    }
}

/// Check the admin token header when a token is configured.
pub fn require_admin(expected: Option<&str>, headers: &HeaderMap) -> AppResult<()> {
    let Some(expected) = expected else {
        return Ok(());
    };

    let provided = headers
        .get(ADMIN_TOKEN_HEADER)
        .map(HeaderValue::as_bytes)
        .unwrap_or_default();

    if tokens_match(provided, expected.as_bytes()) {
        Ok(())
    } else {
        Err(AppError::Unauthorized("Admin token required".to_string()))
    }
}

/// Compare without short-circuiting on the first differing byte.
fn tokens_match(provided: &[u8], expected: &[u8]) -> bool {
    if provided.len() != expected.len() {
        return false;
    }
    provided
        .iter()
        .zip(expected)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

/// Parse an integer id from a query parameter.
pub fn parse_id(raw: Option<&str>, name: &str) -> AppResult<i32> {
    let raw = raw
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("{name} required")))?;

    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("{name} must be an integer")))
}
