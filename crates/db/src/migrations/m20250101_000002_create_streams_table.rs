//! Create streams table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Streams::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Streams::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Streams::UserId).integer().not_null())
                    .col(ColumnDef::new(Streams::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Streams::Description).text())
                    .col(ColumnDef::new(Streams::Category).string_len(128))
                    .col(ColumnDef::new(Streams::IsLive).boolean().not_null().default(false))
                    .col(ColumnDef::new(Streams::VideoUrl).text())
                    .col(ColumnDef::new(Streams::ThumbnailUrl).text())
                    .col(ColumnDef::new(Streams::Duration).integer().not_null().default(0))
                    .col(ColumnDef::new(Streams::ViewCount).integer().not_null().default(0))
                    .col(ColumnDef::new(Streams::LikeCount).integer().not_null().default(0))
                    .col(ColumnDef::new(Streams::StreamKey).string_len(64))
                    .col(
                        ColumnDef::new(Streams::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Streams::StartedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_streams_user")
                            .from(Streams::Table, Streams::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: stream_key (NULL for uploads)
        manager
            .create_index(
                Index::create()
                    .name("idx_streams_stream_key")
                    .table(Streams::Table)
                    .col(Streams::StreamKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: user_id (for ownership checks and cascades)
        manager
            .create_index(
                Index::create()
                    .name("idx_streams_user_id")
                    .table(Streams::Table)
                    .col(Streams::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: category (for the category filter)
        manager
            .create_index(
                Index::create()
                    .name("idx_streams_category")
                    .table(Streams::Table)
                    .col(Streams::Category)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (for listing newest first)
        manager
            .create_index(
                Index::create()
                    .name("idx_streams_created_at")
                    .table(Streams::Table)
                    .col(Streams::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Streams::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Streams {
    Table,
    Id,
    UserId,
    Title,
    Description,
    Category,
    IsLive,
    VideoUrl,
    ThumbnailUrl,
    Duration,
    ViewCount,
    LikeCount,
    StreamKey,
    CreatedAt,
    StartedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
