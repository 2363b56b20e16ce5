//! Administrative bulk operations spanning several tables.

use std::sync::Arc;

use crate::entities::{Like, Stream, Subscription, User, like, stream, subscription, user};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter,
    TransactionTrait, sea_query::Expr,
};
use streamhub_common::{AppError, AppResult};

/// Repository for cascading deletes used by the admin panel.
#[derive(Clone)]
pub struct AdminRepository {
    db: Arc<DatabaseConnection>,
}

impl AdminRepository {
    /// Create a new admin repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn begin(&self) -> AppResult<DatabaseTransaction> {
        self.db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a user together with everything that references them.
    ///
    /// Likes given by the user and likes on their streams go first, then
    /// subscriptions in both directions, then the user's streams and finally
    /// the user row. Counters on surviving rows are decremented (floored at
    /// zero). Returns `false` when the user does not exist.
    pub async fn delete_user_cascade(&self, id: i32) -> AppResult<bool> {
        let txn = self.begin().await?;

        let exists = User::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .is_some();
        if !exists {
            return Ok(false);
        }

        let own_streams: Vec<i32> = Stream::find()
            .filter(stream::Column::UserId.eq(id))
            .all(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .into_iter()
            .map(|s| s.id)
            .collect();

        let liked_elsewhere: Vec<i32> = Like::find()
            .filter(like::Column::UserId.eq(id))
            .all(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .into_iter()
            .map(|l| l.stream_id)
            .filter(|stream_id| !own_streams.contains(stream_id))
            .collect();

        let followed_channels: Vec<i32> = Subscription::find()
            .filter(subscription::Column::SubscriberId.eq(id))
            .all(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .into_iter()
            .map(|s| s.channel_id)
            .filter(|channel_id| *channel_id != id)
            .collect();

        Like::delete_many()
            .filter(
                Condition::any()
                    .add(like::Column::UserId.eq(id))
                    .add(like::Column::StreamId.is_in(own_streams.clone())),
            )
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Subscription::delete_many()
            .filter(
                Condition::any()
                    .add(subscription::Column::SubscriberId.eq(id))
                    .add(subscription::Column::ChannelId.eq(id)),
            )
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if !liked_elsewhere.is_empty() {
            Stream::update_many()
                .col_expr(
                    stream::Column::LikeCount,
                    Expr::cust("GREATEST(like_count - 1, 0)"),
                )
                .filter(stream::Column::Id.is_in(liked_elsewhere))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        if !followed_channels.is_empty() {
            User::update_many()
                .col_expr(
                    user::Column::SubscriberCount,
                    Expr::cust("GREATEST(subscriber_count - 1, 0)"),
                )
                .filter(user::Column::Id.is_in(followed_channels))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        Stream::delete_many()
            .filter(stream::Column::UserId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        User::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(
            user_id = id,
            streams = own_streams.len(),
            "Deleted user and dependent rows"
        );
        Ok(true)
    }

    /// Delete a stream and its likes. Returns `false` when it does not exist.
    pub async fn delete_stream_cascade(&self, id: i32) -> AppResult<bool> {
        let txn = self.begin().await?;

        let exists = Stream::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .is_some();
        if !exists {
            return Ok(false);
        }

        Like::delete_many()
            .filter(like::Column::StreamId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Stream::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(true)
    }

    /// Remove every user and all dependent rows. Returns the users removed.
    pub async fn clear_users(&self) -> AppResult<u64> {
        let txn = self.begin().await?;

        Like::delete_many()
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Subscription::delete_many()
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Stream::delete_many()
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        let result = User::delete_many()
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Remove every stream and its likes. Returns the streams removed.
    pub async fn clear_streams(&self) -> AppResult<u64> {
        let txn = self.begin().await?;

        Like::delete_many()
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        let result = Stream::delete_many()
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}
