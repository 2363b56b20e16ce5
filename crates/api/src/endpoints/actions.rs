//! Action dispatcher for `/api`.

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, Method},
    response::Response,
    routing::any,
};
use serde::Deserialize;
use streamhub_common::{AppError, AppResult};

use super::{admin, auth, social, streams, users};
use crate::{
    extractors::{QueryParams, RawBody, require_admin},
    middleware::AppState,
};

/// Query string of the actions endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ActionQuery {
    pub action: String,
    pub category: Option<String>,
    pub is_live: Option<String>,
    pub user_id: Option<String>,
    pub video_id: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api", any(dispatch))
}

/// Route on (method, action); unknown pairs are a 404.
async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    QueryParams(query): QueryParams<ActionQuery>,
    headers: HeaderMap,
    RawBody(body): RawBody,
) -> AppResult<Response> {
    tracing::debug!(%method, action = %query.action, "Dispatching action");

    let admin_check = || require_admin(state.admin_token.as_deref(), &headers);

    match (method.as_str(), query.action.as_str()) {
        ("GET", "streams") => streams::list(&state, &query).await,
        ("GET", "users") => users::list(&state).await,
        ("POST", "subscribe") => social::subscribe(&state, &body).await,
        ("POST", "like") => social::like(&state, &body).await,
        ("POST", "create_stream") => streams::create(&state, &body).await,
        ("POST", "register") => auth::register(&state, &body).await,
        ("POST", "login") => auth::login(&state, &body).await,
        ("GET", "get_users") => {
            admin_check()?;
            admin::get_users(&state).await
        }
        ("GET", "get_videos") => {
            admin_check()?;
            admin::get_videos(&state).await
        }
        ("DELETE", "delete_user") => {
            admin_check()?;
            admin::delete_user(&state, &query).await
        }
        ("DELETE", "delete_video") => {
            admin_check()?;
            admin::delete_video(&state, &query).await
        }
        ("DELETE", "clear_users") => {
            admin_check()?;
            admin::clear_users(&state).await
        }
        ("DELETE", "clear_videos") => {
            admin_check()?;
            admin::clear_videos(&state).await
        }
        _ => Err(AppError::NotFound("Not found".to_string())),
    }
}
