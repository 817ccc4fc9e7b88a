use sea_orm_migration::prelude::*;

use super::store_now_default;

#[derive(DeriveIden)]
enum Feeds {
    Table,
    Id,
    EventId,
    Content,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250301_000003_create_feeds_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Feeds::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Feeds::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Feeds::EventId).integer().not_null())
                    .col(ColumnDef::new(Feeds::Content).text().not_null())
                    .col(
                        ColumnDef::new(Feeds::CreatedAt)
                            .string()
                            .not_null()
                            .default(store_now_default()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feeds_event")
                            .from(Feeds::Table, Feeds::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_feeds_event_id")
                    .table(Feeds::Table)
                    .col(Feeds::EventId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Feeds::Table).to_owned())
            .await
    }
}
