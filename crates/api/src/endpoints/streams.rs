//! Stream listing and creation actions.

use axum::{
    Json,
    body::Bytes,
    response::{IntoResponse, Response},
};
use streamhub_common::AppResult;
use streamhub_core::{CreateStreamInput, StreamQuery};

use super::actions::ActionQuery;
use crate::{
    middleware::AppState,
    response::{created, json_body},
};

/// `GET ?action=streams`
pub async fn list(state: &AppState, query: &ActionQuery) -> AppResult<Response> {
    let query = StreamQuery {
        category: query.category.clone(),
        is_live: query.is_live.clone(),
    };
    let streams = state.stream_service.list(&query).await?;
    Ok(Json(streams).into_response())
}

/// `POST ?action=create_stream`
pub async fn create(state: &AppState, body: &Bytes) -> AppResult<Response> {
    let input: CreateStreamInput = json_body(body)?;
    let stream = state.stream_service.create(input).await?;
    Ok(created(stream))
}
