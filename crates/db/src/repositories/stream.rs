//! Stream repository.

use std::sync::Arc;

use crate::entities::{Stream, User, stream, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, sea_query::Expr,
};
use streamhub_common::{AppError, AppResult};

/// Filters for listing streams.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamFilter {
    /// Only streams in this category.
    pub category: Option<String>,
    /// Only live (`Some(true)`) or offline (`Some(false)`) streams.
    pub is_live: Option<bool>,
}

/// Stream repository for database operations.
#[derive(Clone)]
pub struct StreamRepository {
    db: Arc<DatabaseConnection>,
}

impl StreamRepository {
    /// Create a new stream repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new stream.
    pub async fn create(&self, model: stream::ActiveModel) -> AppResult<stream::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List streams newest first, each paired with its owner.
    pub async fn find_with_authors(
        &self,
        filter: &StreamFilter,
        limit: u64,
    ) -> AppResult<Vec<(stream::Model, Option<user::Model>)>> {
        let mut query = Stream::find().find_also_related(User);

        if let Some(category) = &filter.category {
            query = query.filter(stream::Column::Category.eq(category.as_str()));
        }
        if let Some(is_live) = filter.is_live {
            query = query.filter(stream::Column::IsLive.eq(is_live));
        }

        query
            .order_by_desc(stream::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get streams newest first (admin listing).
    pub async fn find_newest(&self, limit: u64) -> AppResult<Vec<stream::Model>> {
        Stream::find()
            .order_by_desc(stream::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Flip the live flag of a stream owned by `user_id`.
    ///
    /// Going live also stamps `started_at`. Returns the number of rows
    /// touched, which is zero when the stream is missing or not owned.
    pub async fn set_live(&self, id: i32, user_id: i32, is_live: bool) -> AppResult<u64> {
        let mut update =
            Stream::update_many().col_expr(stream::Column::IsLive, Expr::value(is_live));

        if is_live {
            update =
                update.col_expr(stream::Column::StartedAt, Expr::cust("CURRENT_TIMESTAMP"));
        }

        let result = update
            .filter(stream::Column::Id.eq(id))
            .filter(stream::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}
