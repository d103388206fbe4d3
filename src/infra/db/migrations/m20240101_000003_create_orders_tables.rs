//! Migration: Create orders and reviews.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrdersOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrdersOrders::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrdersOrders::UserId).big_integer().not_null())
                    .col(ColumnDef::new(OrdersOrders::ServiceId).big_integer().not_null())
                    .col(ColumnDef::new(OrdersOrders::WorkerId).big_integer().null())
                    .col(ColumnDef::new(OrdersOrders::ScheduledAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(OrdersOrders::DurationMinutes).integer().null())
                    .col(ColumnDef::new(OrdersOrders::Status).string_len(20).not_null())
                    .col(ColumnDef::new(OrdersOrders::TotalAmount).decimal_len(10, 2).not_null())
                    .col(ColumnDef::new(OrdersOrders::AddressLine).string_len(255).null())
                    .col(ColumnDef::new(OrdersOrders::District).string_len(100).null())
                    .col(ColumnDef::new(OrdersOrders::City).string_len(100).null())
                    .col(ColumnDef::new(OrdersOrders::PostalCode).string_len(20).null())
                    .col(ColumnDef::new(OrdersOrders::Country).string_len(100).null())
                    .col(ColumnDef::new(OrdersOrders::Notes).string_len(500).null())
                    .col(ColumnDef::new(OrdersOrders::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(OrdersOrders::UpdatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_orders_user_id")
                    .table(OrdersOrders::Table)
                    .col(OrdersOrders::UserId)
                    .to_owned(),
            )
            .await?;

        // Availability checks scan a worker's bookings by start time
        manager
            .create_index(
                Index::create()
                    .name("idx_orders_orders_worker_schedule")
                    .table(OrdersOrders::Table)
                    .col(OrdersOrders::WorkerId)
                    .col(OrdersOrders::ScheduledAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrdersReviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrdersReviews::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrdersReviews::OrderId).big_integer().not_null().unique_key())
                    .col(ColumnDef::new(OrdersReviews::UserId).big_integer().not_null())
                    .col(ColumnDef::new(OrdersReviews::Rating).integer().not_null())
                    .col(ColumnDef::new(OrdersReviews::Comment).string_len(1000).null())
                    .col(ColumnDef::new(OrdersReviews::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(OrdersReviews::UpdatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrdersReviews::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OrdersOrders::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum OrdersOrders {
    Table,
    Id,
    UserId,
    ServiceId,
    WorkerId,
    ScheduledAt,
    DurationMinutes,
    Status,
    TotalAmount,
    AddressLine,
    District,
    City,
    PostalCode,
    Country,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum OrdersReviews {
    Table,
    Id,
    OrderId,
    UserId,
    Rating,
    Comment,
    CreatedAt,
    UpdatedAt,
}
