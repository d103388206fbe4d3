//! Migration: Create the service catalog.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServicesServices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServicesServices::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ServicesServices::Name).string_len(200).not_null())
                    .col(ColumnDef::new(ServicesServices::Description).text().null())
                    .col(ColumnDef::new(ServicesServices::BasePrice).decimal_len(10, 2).not_null())
                    .col(ColumnDef::new(ServicesServices::ImageUrl).string_len(500).null())
                    .col(ColumnDef::new(ServicesServices::Category).string_len(100).null())
                    .col(ColumnDef::new(ServicesServices::Details).text().null())
                    .col(ColumnDef::new(ServicesServices::Active).boolean().not_null().default(true))
                    .col(ColumnDef::new(ServicesServices::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(ServicesServices::UpdatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_services_services_category")
                    .table(ServicesServices::Table)
                    .col(ServicesServices::Category)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServicesServices::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ServicesServices {
    Table,
    Id,
    Name,
    Description,
    BasePrice,
    ImageUrl,
    Category,
    Details,
    Active,
    CreatedAt,
    UpdatedAt,
}
