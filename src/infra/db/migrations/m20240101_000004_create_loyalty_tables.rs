//! Migration: Create loyalty balances and the points ledger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LoyaltyPoints::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LoyaltyPoints::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LoyaltyPoints::UserId).big_integer().not_null().unique_key())
                    .col(ColumnDef::new(LoyaltyPoints::PointsBalance).integer().not_null().default(0))
                    .col(ColumnDef::new(LoyaltyPoints::CurrentTier).string_len(20).not_null().default("BRONZE"))
                    .col(ColumnDef::new(LoyaltyPoints::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(LoyaltyPoints::UpdatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LoyaltyPointsTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LoyaltyPointsTransactions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LoyaltyPointsTransactions::UserId).big_integer().not_null())
                    .col(ColumnDef::new(LoyaltyPointsTransactions::Points).integer().not_null())
                    .col(ColumnDef::new(LoyaltyPointsTransactions::Type).string_len(20).not_null())
                    .col(ColumnDef::new(LoyaltyPointsTransactions::Description).string_len(200).null())
                    .col(ColumnDef::new(LoyaltyPointsTransactions::ReferenceId).big_integer().null())
                    .col(ColumnDef::new(LoyaltyPointsTransactions::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_loyalty_points_transactions_user_id")
                    .table(LoyaltyPointsTransactions::Table)
                    .col(LoyaltyPointsTransactions::UserId)
                    .to_owned(),
            )
            .await?;

        // One award per referenced order and entry type
        manager
            .create_index(
                Index::create()
                    .name("uq_loyalty_points_transactions_reference")
                    .table(LoyaltyPointsTransactions::Table)
                    .col(LoyaltyPointsTransactions::ReferenceId)
                    .col(LoyaltyPointsTransactions::Type)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LoyaltyPointsTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LoyaltyPoints::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum LoyaltyPoints {
    Table,
    Id,
    UserId,
    PointsBalance,
    CurrentTier,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum LoyaltyPointsTransactions {
    Table,
    Id,
    UserId,
    Points,
    Type,
    Description,
    ReferenceId,
    CreatedAt,
}
