//! Video upload endpoint.

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
};
use streamhub_common::{AppError, AppResult};
use streamhub_core::UploadInput;

use crate::{
    extractors::{RawBody, UserIdHeader},
    middleware::AppState,
    response::json_body,
};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/upload-video",
        post(upload).fallback(method_not_allowed),
    )
}

async fn upload(
    State(state): State<AppState>,
    UserIdHeader(user_id): UserIdHeader,
    RawBody(body): RawBody,
) -> AppResult<Response> {
    let input: UploadInput = json_body(&body)?;
    let video = state.stream_service.upload(user_id, input).await?;
    Ok(Json(video).into_response())
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
