//! Live session endpoint.

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::any,
};
use serde::Deserialize;
use streamhub_common::{AppError, AppResult};
use streamhub_core::LiveSessionInput;

use crate::{
    extractors::{QueryParams, RawBody, UserIdHeader, parse_id},
    middleware::AppState,
    response::json_body,
};

#[derive(Debug, Deserialize)]
struct StreamingQuery {
    #[serde(default = "default_action")]
    action: String,
    stream_id: Option<String>,
}

fn default_action() -> String {
    "create_stream".to_string()
}

pub fn router() -> Router<AppState> {
    Router::new().route("/streaming", any(dispatch))
}

async fn dispatch(
    State(state): State<AppState>,
    UserIdHeader(user_id): UserIdHeader,
    QueryParams(query): QueryParams<StreamingQuery>,
    RawBody(body): RawBody,
) -> AppResult<Response> {
    match query.action.as_str() {
        "create_stream" => {
            let input: LiveSessionInput = json_body(&body)?;
            let session = state
                .stream_service
                .create_live_session(user_id, input)
                .await?;
            Ok(Json(session).into_response())
        }
        "start_stream" => {
            let stream_id = parse_id(query.stream_id.as_deref(), "stream_id")?;
            let status = state.stream_service.start(user_id, stream_id).await?;
            Ok(Json(status).into_response())
        }
        "stop_stream" => {
            let stream_id = parse_id(query.stream_id.as_deref(), "stream_id")?;
            let status = state.stream_service.stop(user_id, stream_id).await?;
            Ok(Json(status).into_response())
        }
        _ => Err(AppError::BadRequest("Invalid action".to_string())),
    }
}
