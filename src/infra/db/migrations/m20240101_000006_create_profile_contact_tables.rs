//! Migration: Create user profiles and contact messages.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProfileProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProfileProfiles::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProfileProfiles::UserId).big_integer().not_null().unique_key())
                    .col(ColumnDef::new(ProfileProfiles::FirstName).string_len(50).null())
                    .col(ColumnDef::new(ProfileProfiles::LastName).string_len(50).null())
                    .col(ColumnDef::new(ProfileProfiles::AvatarUrl).string_len(500).null())
                    .col(ColumnDef::new(ProfileProfiles::Bio).string_len(500).null())
                    .col(ColumnDef::new(ProfileProfiles::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(ProfileProfiles::UpdatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ContactMessages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContactMessages::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ContactMessages::Name).string_len(100).not_null())
                    .col(ColumnDef::new(ContactMessages::Email).string_len(100).not_null())
                    .col(ColumnDef::new(ContactMessages::Phone).string_len(20).null())
                    .col(ColumnDef::new(ContactMessages::Subject).string_len(200).null())
                    .col(ColumnDef::new(ContactMessages::Message).text().not_null())
                    .col(ColumnDef::new(ContactMessages::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ContactMessages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProfileProfiles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ProfileProfiles {
    Table,
    Id,
    UserId,
    FirstName,
    LastName,
    AvatarUrl,
    Bio,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ContactMessages {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Subject,
    Message,
    CreatedAt,
}
