//! API endpoints.

mod actions;
mod admin;
mod auth;
mod social;
mod streaming;
mod streams;
mod upload;
mod users;

use axum::{Router, extract::DefaultBodyLimit, http::Method};
use streamhub_common::AppError;

use crate::middleware::{ADMIN_TOKEN_HEADER, AppState, MAX_BODY_BYTES, USER_ID_HEADER, cors_layer};

/// Create the router serving all three endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(actions::router().layer(cors_layer(
            &[
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ],
            &[USER_ID_HEADER, ADMIN_TOKEN_HEADER],
        )))
        .merge(streaming::router().layer(cors_layer(
            &[Method::POST, Method::GET, Method::OPTIONS],
            &[USER_ID_HEADER],
        )))
        .merge(upload::router().layer(cors_layer(
            &[Method::POST, Method::OPTIONS],
            &[USER_ID_HEADER],
        )))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}

async fn not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}
