//! Like repository.

use std::sync::Arc;

use crate::entities::{Like, Stream, like, stream};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use streamhub_common::{AppError, AppResult};

/// Like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record that `user_id` likes `stream_id`.
    ///
    /// Mirrors [`super::SubscriptionRepository::subscribe`]: the stream's
    /// `like_count` only moves when a new like row was written, inside the
    /// same transaction. Returns `false` for a repeated like.
    pub async fn like(&self, user_id: i32, stream_id: i32) -> AppResult<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let model = like::ActiveModel {
            user_id: Set(user_id),
            stream_id: Set(stream_id),
            ..Default::default()
        };

        let inserted = Like::insert(model)
            .on_conflict(
                OnConflict::columns([like::Column::UserId, like::Column::StreamId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if inserted > 0 {
            Stream::update_many()
                .col_expr(
                    stream::Column::LikeCount,
                    Expr::col(stream::Column::LikeCount).add(1),
                )
                .filter(stream::Column::Id.eq(stream_id))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(inserted > 0)
    }
}
