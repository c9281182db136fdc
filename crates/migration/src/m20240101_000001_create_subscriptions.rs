//! Create `subscriptions` table.
//!
//! One row per recurring payment. Only the primary key is indexed.
use sea_orm_migration::{prelude::*, schema::*};

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
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string_len(Subscriptions::Name, 100).not_null())
                    .col(double(Subscriptions::Amount).not_null())
                    .col(string_len(Subscriptions::BillingCycle, 16).not_null())
                    .col(date(Subscriptions::NextBillingDate).not_null())
                    .col(string_len(Subscriptions::Category, 50).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Subscriptions::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Subscriptions {
    Table,
    Id,
    Name,
    Amount,
    BillingCycle,
    NextBillingDate,
    Category,
}
