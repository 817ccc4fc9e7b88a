//! Sea-ORM migrations for event-store database schema

pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_divisions_table;
mod m20250301_000002_create_events_table;
mod m20250301_000003_create_feeds_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_divisions_table::Migration),
            Box::new(m20250301_000002_create_events_table::Migration),
            Box::new(m20250301_000003_create_feeds_table::Migration),
        ]
    }
}

/// Column default that stamps the row with the store clock
pub(crate) fn store_now_default() -> SimpleExpr {
    Expr::cust(format!("({})", crate::STORE_NOW))
}
