use sea_orm_migration::prelude::*;

use super::store_now_default;

#[derive(DeriveIden)]
enum Divisions {
    Table,
    Id,
    Name,
    CreatedAt,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250301_000001_create_divisions_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Divisions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Divisions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Divisions::Name).text().not_null())
                    .col(
                        ColumnDef::new(Divisions::CreatedAt)
                            .string()
                            .not_null()
                            .default(store_now_default()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Divisions::Table).to_owned())
            .await
    }
}
