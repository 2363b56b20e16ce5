//! Stream service: listings, live sessions and uploads.

use chrono::Utc;
use sea_orm::{Set, prelude::DateTimeWithTimeZone};
use serde::{Deserialize, Serialize};
use streamhub_common::{AppError, AppResult, IdGenerator};
use streamhub_db::{
    entities::stream,
    repositories::{StreamFilter, StreamRepository},
};
use validator::Validate;

/// Maximum number of streams returned by listings.
pub const STREAM_LIST_LIMIT: u64 = 100;

/// Category values the frontend sends to mean "no category filter".
pub const ALL_CATEGORIES: [&str; 2] = ["Все", "all"];

/// Title used when a live session is created without one.
pub const DEFAULT_STREAM_TITLE: &str = "Untitled Stream";

/// Title used when a video is uploaded without one.
pub const DEFAULT_VIDEO_TITLE: &str = "Untitled Video";

/// Stream service for business logic.
#[derive(Clone)]
pub struct StreamService {
    stream_repo: StreamRepository,
    id_gen: IdGenerator,
    rtmp_base_url: String,
}

/// Raw listing filters as they arrive in the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamQuery {
    pub category: Option<String>,
    pub is_live: Option<String>,
}

impl StreamQuery {
    /// Turn the raw query into a repository filter.
    ///
    /// Empty categories and the "all" sentinels drop the category filter;
    /// `is_live` only filters on the exact strings `true` and `false`.
    #[must_use]
    pub fn to_filter(&self) -> StreamFilter {
        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && !ALL_CATEGORIES.contains(c))
            .map(ToString::to_string);

        let is_live = match self.is_live.as_deref() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        };

        StreamFilter { category, is_live }
    }
}

/// A stream row joined with its author's public profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamWithAuthor {
    #[serde(flatten)]
    pub stream: stream::Model,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub is_verified: bool,
    pub subscriber_count: i32,
}

/// Input for creating a stream from the actions endpoint.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateStreamInput {
    pub user_id: Option<i32>,

    #[validate(length(max = 256, message = "Title is too long"))]
    pub title: Option<String>,

    pub description: Option<String>,

    #[validate(length(max = 128, message = "Category is too long"))]
    pub category: Option<String>,

    pub is_live: Option<bool>,
}

/// Summary returned after creating a stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedStream {
    pub id: i32,
    pub title: String,
    pub is_live: bool,
}

/// Input for opening a live session.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LiveSessionInput {
    #[validate(length(max = 256, message = "Title is too long"))]
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Credentials and links for a freshly opened live session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiveSession {
    pub stream_id: i32,
    pub stream_key: String,
    pub stream_url: String,
    pub watch_url: String,
}

/// Result of toggling a stream on or off air.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiveStatus {
    pub message: &'static str,
    pub is_live: bool,
}

/// Input for registering an externally hosted video.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UploadInput {
    #[validate(length(max = 256, message = "Title is too long"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    #[validate(range(min = 0, message = "Duration must not be negative"))]
    pub duration: Option<i32>,
}

/// Acknowledgement for an uploaded video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedVideo {
    pub video_id: i32,
    pub message: &'static str,
}

impl StreamService {
    /// Create a new stream service.
    #[must_use]
    pub const fn new(stream_repo: StreamRepository, rtmp_base_url: String) -> Self {
        Self {
            stream_repo,
            id_gen: IdGenerator::new(),
            rtmp_base_url,
        }
    }

    /// List streams newest first with their authors.
    pub async fn list(&self, query: &StreamQuery) -> AppResult<Vec<StreamWithAuthor>> {
        let filter = query.to_filter();
        tracing::debug!(?filter, "Listing streams");

        let rows = self
            .stream_repo
            .find_with_authors(&filter, STREAM_LIST_LIMIT)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(stream, author)| {
                let author = author?;
                Some(StreamWithAuthor {
                    stream,
                    username: author.username,
                    display_name: author.display_name,
                    avatar_url: author.avatar_url,
                    is_verified: author.is_verified,
                    subscriber_count: author.subscriber_count,
                })
            })
            .collect())
    }

    /// Create a stream, live by default, stamped as started now.
    pub async fn create(&self, input: CreateStreamInput) -> AppResult<CreatedStream> {
        let (Some(user_id), Some(title)) = (input.user_id, input.title.clone()) else {
            return Err(AppError::BadRequest("user_id and title required".to_string()));
        };
        if title.trim().is_empty() {
            return Err(AppError::BadRequest("user_id and title required".to_string()));
        }
        input.validate()?;

        let now: DateTimeWithTimeZone = Utc::now().into();
        let model = stream::ActiveModel {
            user_id: Set(user_id),
            title: Set(title),
            description: Set(input.description),
            category: Set(input.category),
            is_live: Set(input.is_live.unwrap_or(true)),
            started_at: Set(Some(now)),
            ..Default::default()
        };

        let stream = self.stream_repo.create(model).await?;
        tracing::info!(stream_id = stream.id, user_id, "Created stream");

        Ok(CreatedStream {
            id: stream.id,
            title: stream.title,
            is_live: stream.is_live,
        })
    }

    /// Open an offline live session with a fresh stream key.
    pub async fn create_live_session(
        &self,
        user_id: i32,
        input: LiveSessionInput,
    ) -> AppResult<LiveSession> {
        input.validate()?;

        let stream_key = self.id_gen.generate_stream_key();
        let model = stream::ActiveModel {
            user_id: Set(user_id),
            title: Set(input
                .title
                .unwrap_or_else(|| DEFAULT_STREAM_TITLE.to_string())),
            description: Set(Some(input.description.unwrap_or_default())),
            is_live: Set(false),
            stream_key: Set(Some(stream_key.clone())),
            ..Default::default()
        };

        let stream = self.stream_repo.create(model).await?;
        tracing::info!(stream_id = stream.id, user_id, "Opened live session");

        Ok(LiveSession {
            stream_id: stream.id,
            stream_url: format!("{}/{stream_key}", self.rtmp_base_url.trim_end_matches('/')),
            watch_url: format!("/watch?v={}", stream.id),
            stream_key,
        })
    }

    /// Put the caller's stream on air.
    pub async fn start(&self, user_id: i32, stream_id: i32) -> AppResult<LiveStatus> {
        self.set_live(user_id, stream_id, true).await?;
        Ok(LiveStatus {
            message: "Stream started",
            is_live: true,
        })
    }

    /// Take the caller's stream off air.
    pub async fn stop(&self, user_id: i32, stream_id: i32) -> AppResult<LiveStatus> {
        self.set_live(user_id, stream_id, false).await?;
        Ok(LiveStatus {
            message: "Stream stopped",
            is_live: false,
        })
    }

    async fn set_live(&self, user_id: i32, stream_id: i32, is_live: bool) -> AppResult<()> {
        let rows = self.stream_repo.set_live(stream_id, user_id, is_live).await?;
        if rows == 0 {
            tracing::warn!(
                stream_id,
                user_id,
                is_live,
                "Live toggle matched no stream owned by caller"
            );
        } else {
            tracing::debug!(stream_id, user_id, is_live, "Live toggle applied");
        }
        Ok(())
    }

    /// Register an externally hosted video as an offline stream.
    pub async fn upload(&self, user_id: i32, input: UploadInput) -> AppResult<UploadedVideo> {
        input.validate()?;

        let model = stream::ActiveModel {
            user_id: Set(user_id),
            title: Set(input
                .title
                .unwrap_or_else(|| DEFAULT_VIDEO_TITLE.to_string())),
            description: Set(Some(input.description.unwrap_or_default())),
            video_url: Set(Some(input.video_url.unwrap_or_default())),
            thumbnail_url: Set(Some(input.thumbnail_url.unwrap_or_default())),
            duration: Set(input.duration.unwrap_or(0)),
            is_live: Set(false),
            ..Default::default()
        };

        let stream = self.stream_repo.create(model).await?;
        tracing::info!(video_id = stream.id, user_id, "Uploaded video");

        Ok(UploadedVideo {
            video_id: stream.id,
            message: "Video uploaded successfully",
        })
    }
}
