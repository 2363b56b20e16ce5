//! API response helpers.

use axum::{
    Json,
    body::Bytes,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Serialize, de::DeserializeOwned};
use streamhub_common::{AppError, AppResult};

/// `{"success": true}` with an optional `deleted_count`.
#[derive(Debug, Serialize)]
pub struct Success {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_count: Option<u64>,
}

impl Success {
    /// Plain success.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            success: true,
            deleted_count: None,
        }
    }

    /// Success carrying the number of removed rows.
    #[must_use]
    pub const fn deleted(count: u64) -> Self {
        Self {
            success: true,
            deleted_count: Some(count),
        }
    }
}

impl IntoResponse for Success {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// 201 with a JSON body.
pub fn created<T: Serialize>(body: T) -> Response {
    (StatusCode::CREATED, Json(body)).into_response()
}

/// Decode a JSON request body. An empty body reads as `{}`.
pub fn json_body<T: DeserializeOwned + Default>(body: &Bytes) -> AppResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "Rejected request body");
        AppError::BadRequest("Invalid JSON body".to_string())
    })
}
