//! Subscription repository.

use std::sync::Arc;

use crate::entities::{Subscription, User, subscription, user};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use streamhub_common::{AppError, AppResult};

/// Subscription repository for database operations.
#[derive(Clone)]
pub struct SubscriptionRepository {
    db: Arc<DatabaseConnection>,
}

impl SubscriptionRepository {
    /// Create a new subscription repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Subscribe `subscriber_id` to `channel_id`.
    ///
    /// The row insert and the channel's `subscriber_count` bump share one
    /// transaction, and the counter only moves when a new row was written.
    /// Returns `false` when the subscription already existed.
    pub async fn subscribe(&self, subscriber_id: i32, channel_id: i32) -> AppResult<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let model = subscription::ActiveModel {
            subscriber_id: Set(subscriber_id),
            channel_id: Set(channel_id),
            ..Default::default()
        };

        let inserted = Subscription::insert(model)
            .on_conflict(
                OnConflict::columns([
                    subscription::Column::SubscriberId,
                    subscription::Column::ChannelId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if inserted > 0 {
            User::update_many()
                .col_expr(
                    user::Column::SubscriberCount,
                    Expr::col(user::Column::SubscriberCount).add(1),
                )
                .filter(user::Column::Id.eq(channel_id))
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
