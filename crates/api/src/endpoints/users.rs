//! User listing action.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use streamhub_common::AppResult;

use crate::middleware::AppState;

/// `GET ?action=users`
pub async fn list(state: &AppState) -> AppResult<Response> {
    let users = state.user_service.list_popular().await?;
    Ok(Json(users).into_response())
}
