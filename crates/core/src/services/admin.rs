//! Admin panel operations.

use serde::Serialize;
use streamhub_common::{AppError, AppResult};
use streamhub_db::{
    entities::{stream, user},
    repositories::{AdminRepository, StreamRepository, UserRepository},
};

/// Maximum number of rows in admin listings.
pub const ADMIN_LIST_LIMIT: u64 = 500;

/// Admin service.
#[derive(Clone)]
pub struct AdminService {
    admin_repo: AdminRepository,
    user_repo: UserRepository,
    stream_repo: StreamRepository,
}

/// A user row in the admin table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminUserView {
    pub id: i32,
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub subscriber_count: i32,
    pub is_verified: bool,
}

impl From<user::Model> for AdminUserView {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            email: user.email,
            subscriber_count: user.subscriber_count,
            is_verified: user.is_verified,
        }
    }
}

/// A video row in the admin table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminVideoView {
    pub stream_id: i32,
    pub title: String,
    pub user_id: i32,
    pub view_count: i32,
    pub like_count: i32,
}

impl From<stream::Model> for AdminVideoView {
    fn from(stream: stream::Model) -> Self {
        Self {
            stream_id: stream.id,
            title: stream.title,
            user_id: stream.user_id,
            view_count: stream.view_count,
            like_count: stream.like_count,
        }
    }
}

impl AdminService {
    /// Create a new admin service.
    #[must_use]
    pub const fn new(
        admin_repo: AdminRepository,
        user_repo: UserRepository,
        stream_repo: StreamRepository,
    ) -> Self {
        Self {
            admin_repo,
            user_repo,
            stream_repo,
        }
    }

    /// All users, newest first.
    pub async fn list_users(&self) -> AppResult<Vec<AdminUserView>> {
        let users = self.user_repo.find_newest(ADMIN_LIST_LIMIT).await?;
        Ok(users.into_iter().map(AdminUserView::from).collect())
    }

    /// All videos and streams, newest first.
    pub async fn list_videos(&self) -> AppResult<Vec<AdminVideoView>> {
        let streams = self.stream_repo.find_newest(ADMIN_LIST_LIMIT).await?;
        Ok(streams.into_iter().map(AdminVideoView::from).collect())
    }

    /// Delete one user and everything hanging off them.
    pub async fn delete_user(&self, user_id: i32) -> AppResult<()> {
        if !self.admin_repo.delete_user_cascade(user_id).await? {
            return Err(AppError::NotFound(format!("User {user_id} not found")));
        }
        tracing::info!(user_id, "Admin deleted user");
        Ok(())
    }

    /// Delete one video and its likes.
    pub async fn delete_video(&self, video_id: i32) -> AppResult<()> {
        if !self.admin_repo.delete_stream_cascade(video_id).await? {
            return Err(AppError::NotFound(format!("Video {video_id} not found")));
        }
        tracing::info!(video_id, "Admin deleted video");
        Ok(())
    }

    /// Delete every user. Returns how many were removed.
    pub async fn clear_users(&self) -> AppResult<u64> {
        let deleted = self.admin_repo.clear_users().await?;
        tracing::warn!(deleted, "Admin cleared all users");
        Ok(deleted)
    }

    /// Delete every video. Returns how many were removed.
    pub async fn clear_videos(&self) -> AppResult<u64> {
        let deleted = self.admin_repo.clear_streams().await?;
        tracing::warn!(deleted, "Admin cleared all videos");
        Ok(deleted)
    }
}
