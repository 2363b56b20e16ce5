//! Registration and login actions.

use axum::{
    Json,
    body::Bytes,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use streamhub_common::AppResult;
use streamhub_core::{AccountView, LoginInput, RegisterInput};

use crate::{
    middleware::AppState,
    response::{created, json_body},
};

/// `{"user": {...}}`
#[derive(Serialize)]
struct AccountResponse {
    user: AccountView,
}

/// `POST ?action=register`
pub async fn register(state: &AppState, body: &Bytes) -> AppResult<Response> {
    let input: RegisterInput = json_body(body)?;
    let user = state.user_service.register(input).await?;
    Ok(created(AccountResponse { user }))
}

/// `POST ?action=login`
pub async fn login(state: &AppState, body: &Bytes) -> AppResult<Response> {
    let input: LoginInput = json_body(body)?;
    let user = state.user_service.login(input).await?;
    Ok(Json(AccountResponse { user }).into_response())
}
