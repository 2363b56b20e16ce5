//! Admin panel actions.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use streamhub_common::AppResult;
use streamhub_core::{AdminUserView, AdminVideoView};

use super::actions::ActionQuery;
use crate::{extractors::parse_id, middleware::AppState, response::Success};

#[derive(Serialize)]
struct UsersResponse {
    users: Vec<AdminUserView>,
}

#[derive(Serialize)]
struct VideosResponse {
    videos: Vec<AdminVideoView>,
}

/// `GET ?action=get_users`
pub async fn get_users(state: &AppState) -> AppResult<Response> {
    let users = state.admin_service.list_users().await?;
    Ok(Json(UsersResponse { users }).into_response())
}

/// `GET ?action=get_videos`
pub async fn get_videos(state: &AppState) -> AppResult<Response> {
    let videos = state.admin_service.list_videos().await?;
    Ok(Json(VideosResponse { videos }).into_response())
}

/// `DELETE ?action=delete_user&user_id=`
pub async fn delete_user(state: &AppState, query: &ActionQuery) -> AppResult<Response> {
    let user_id = parse_id(query.user_id.as_deref(), "user_id")?;
    state.admin_service.delete_user(user_id).await?;
    Ok(Success::ok().into_response())
}

/// `DELETE ?action=delete_video&video_id=`
pub async fn delete_video(state: &AppState, query: &ActionQuery) -> AppResult<Response> {
    let video_id = parse_id(query.video_id.as_deref(), "video_id")?;
    state.admin_service.delete_video(video_id).await?;
    Ok(Success::ok().into_response())
}

/// `DELETE ?action=clear_users`
pub async fn clear_users(state: &AppState) -> AppResult<Response> {
    let deleted = state.admin_service.clear_users().await?;
    Ok(Success::deleted(deleted).into_response())
}

/// `DELETE ?action=clear_videos`
pub async fn clear_videos(state: &AppState) -> AppResult<Response> {
    let deleted = state.admin_service.clear_videos().await?;
    Ok(Success::deleted(deleted).into_response())
}
