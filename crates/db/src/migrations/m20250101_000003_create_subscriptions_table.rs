//! Create subscriptions table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subscriptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subscriptions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Subscriptions::SubscriberId).integer().not_null())
                    .col(ColumnDef::new(Subscriptions::ChannelId).integer().not_null())
                    .col(
                        ColumnDef::new(Subscriptions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscriptions_subscriber")
                            .from(Subscriptions::Table, Subscriptions::SubscriberId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscriptions_channel")
                            .from(Subscriptions::Table, Subscriptions::ChannelId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (subscriber_id, channel_id) - target of ON CONFLICT DO NOTHING
        manager
            .create_index(
                Index::create()
                    .name("idx_subscriptions_subscriber_channel")
                    .table(Subscriptions::Table)
                    .col(Subscriptions::SubscriberId)
                    .col(Subscriptions::ChannelId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: channel_id (for cascades from the channel side)
        manager
            .create_index(
                Index::create()
                    .name("idx_subscriptions_channel_id")
                    .table(Subscriptions::Table)
                    .col(Subscriptions::ChannelId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Subscriptions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Subscriptions {
    Table,
    Id,
    SubscriberId,
    ChannelId,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
