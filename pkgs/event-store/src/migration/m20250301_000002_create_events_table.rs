use sea_orm_migration::prelude::*;

use super::store_now_default;

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
    Title,
    Description,
    DivisionId,
    ImageUrl,
    StartDate,
    EndDate,
    IsPublic,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Divisions {
    Table,
    Id,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250301_000002_create_events_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Events::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Events::Title).text().not_null())
                    .col(ColumnDef::new(Events::Description).text().not_null())
                    .col(ColumnDef::new(Events::DivisionId).integer())
                    .col(ColumnDef::new(Events::ImageUrl).text())
                    .col(ColumnDef::new(Events::StartDate).string())
                    .col(ColumnDef::new(Events::EndDate).string())
                    .col(ColumnDef::new(Events::IsPublic).integer())
                    .col(ColumnDef::new(Events::IsActive).integer().default(1))
                    .col(
                        ColumnDef::new(Events::CreatedAt)
                            .string()
                            .not_null()
                            .default(store_now_default()),
                    )
                    .col(
                        ColumnDef::new(Events::UpdatedAt)
                            .string()
                            .not_null()
                            .default(store_now_default()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_events_division")
                            .from(Events::Table, Events::DivisionId)
                            .to(Divisions::Table, Divisions::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_events_division_id")
                    .table(Events::Table)
                    .col(Events::DivisionId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await
    }
}
