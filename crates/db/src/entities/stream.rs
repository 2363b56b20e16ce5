//! Stream entity.
//!
//! A row is either a live broadcast or an uploaded video; `is_live`
//! tells the two apart at any given moment.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "streams")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Owner of the stream
    pub user_id: i32,

    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    #[sea_orm(nullable)]
    pub category: Option<String>,

    #[sea_orm(default_value = false)]
    pub is_live: bool,

    /// Externally hosted media URL (uploads only)
    #[sea_orm(nullable)]
    pub video_url: Option<String>,

    #[sea_orm(nullable)]
    pub thumbnail_url: Option<String>,

    /// Duration in seconds
    #[sea_orm(default_value = 0)]
    pub duration: i32,

    #[sea_orm(default_value = 0)]
    pub view_count: i32,

    /// Like count (denormalized)
    #[sea_orm(default_value = 0)]
    pub like_count: i32,

    /// Ingest key for live sessions; only ever returned to the owner
    #[sea_orm(unique, nullable)]
    #[serde(skip_serializing)]
    pub stream_key: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub started_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(has_many = "super::like::Entity")]
    Likes,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Likes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
