//! Subscriptions and likes.

use serde::Deserialize;
use streamhub_common::{AppError, AppResult};
use streamhub_db::repositories::{LikeRepository, SubscriptionRepository};

/// Service for the social counters: subscriptions and likes.
#[derive(Clone)]
pub struct SocialService {
    subscription_repo: SubscriptionRepository,
    like_repo: LikeRepository,
}

/// Input for subscribing to a channel.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubscribeInput {
    pub subscriber_id: Option<i32>,
    pub channel_id: Option<i32>,
}

/// Input for liking a stream.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LikeInput {
    pub user_id: Option<i32>,
    pub stream_id: Option<i32>,
}

/// Both ids must be present and non-zero.
fn require_pair(a: Option<i32>, b: Option<i32>) -> Option<(i32, i32)> {
    match (a, b) {
        (Some(a), Some(b)) if a != 0 && b != 0 => Some((a, b)),
        _ => None,
    }
}

impl SocialService {
    /// Create a new social service.
    #[must_use]
    pub const fn new(subscription_repo: SubscriptionRepository, like_repo: LikeRepository) -> Self {
        Self {
            subscription_repo,
            like_repo,
        }
    }

    /// Subscribe to a channel. Repeating the call is a no-op.
    pub async fn subscribe(&self, input: SubscribeInput) -> AppResult<()> {
        let (subscriber_id, channel_id) = require_pair(input.subscriber_id, input.channel_id)
            .ok_or_else(|| {
                AppError::BadRequest("subscriber_id and channel_id required".to_string())
            })?;

        let created = self
            .subscription_repo
            .subscribe(subscriber_id, channel_id)
            .await?;
        tracing::debug!(subscriber_id, channel_id, created, "Subscribe");
        Ok(())
    }

    /// Like a stream. Repeating the call is a no-op.
    pub async fn like(&self, input: LikeInput) -> AppResult<()> {
        let (user_id, stream_id) = require_pair(input.user_id, input.stream_id)
            .ok_or_else(|| AppError::BadRequest("user_id and stream_id required".to_string()))?;

        let created = self.like_repo.like(user_id, stream_id).await?;
        tracing::debug!(user_id, stream_id, created, "Like");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn service(db: DatabaseConnection) -> SocialService {
        let db = Arc::new(db);
        SocialService::new(
            SubscriptionRepository::new(Arc::clone(&db)),
            LikeRepository::new(db),
        )
    }

    const fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[test]
    fn test_require_pair() {
        assert_eq!(require_pair(Some(1), Some(2)), Some((1, 2)));
        assert_eq!(require_pair(Some(1), None), None);
        assert_eq!(require_pair(Some(0), Some(2)), None);
    }

    #[tokio::test]
    async fn test_subscribe_missing_channel() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let result = service
            .subscribe(SubscribeInput {
                subscriber_id: Some(1),
                channel_id: None,
            })
            .await;

        match result {
            Err(AppError::BadRequest(msg)) => {
                assert_eq!(msg, "subscriber_id and channel_id required");
            }
            other => panic!("Expected BadRequest, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_subscribe_existing_is_ok() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(0)])
            .into_connection();

        let result = service(db)
            .subscribe(SubscribeInput {
                subscriber_id: Some(1),
                channel_id: Some(2),
            })
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_like_missing_stream() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let result = service.like(LikeInput::default()).await;

        match result {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "user_id and stream_id required"),
            other => panic!("Expected BadRequest, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_like_new() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(1), exec(1)])
            .into_connection();

        assert!(
            service(db)
                .like(LikeInput {
                    user_id: Some(3),
                    stream_id: Some(9),
                })
                .await
                .is_ok()
        );
    }
}
