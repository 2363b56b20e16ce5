//! Subscribe and like actions.

use axum::{
    body::Bytes,
    response::{IntoResponse, Response},
};
use streamhub_common::AppResult;
use streamhub_core::{LikeInput, SubscribeInput};

use crate::{
    middleware::AppState,
    response::{Success, json_body},
};

/// `POST ?action=subscribe`
pub async fn subscribe(state: &AppState, body: &Bytes) -> AppResult<Response> {
    let input: SubscribeInput = json_body(body)?;
    state.social_service.subscribe(input).await?;
    Ok(Success::ok().into_response())
}

/// `POST ?action=like`
pub async fn like(state: &AppState, body: &Bytes) -> AppResult<Response> {
    let input: LikeInput = json_body(body)?;
    state.social_service.like(input).await?;
    Ok(Success::ok().into_response())
}
