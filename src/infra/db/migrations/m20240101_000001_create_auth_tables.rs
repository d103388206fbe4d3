//! Migration: Create user accounts and refresh token storage.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuthUsers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuthUsers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AuthUsers::Email).string_len(100).not_null().unique_key())
                    .col(ColumnDef::new(AuthUsers::Username).string_len(50).not_null().unique_key())
                    .col(ColumnDef::new(AuthUsers::Phone).string_len(20).null().unique_key())
                    .col(ColumnDef::new(AuthUsers::PasswordHash).string_len(255).not_null())
                    .col(ColumnDef::new(AuthUsers::Enabled).boolean().not_null().default(true))
                    .col(ColumnDef::new(AuthUsers::AccountNonExpired).boolean().not_null().default(true))
                    .col(ColumnDef::new(AuthUsers::AccountNonLocked).boolean().not_null().default(true))
                    .col(ColumnDef::new(AuthUsers::CredentialsNonExpired).boolean().not_null().default(true))
                    .col(ColumnDef::new(AuthUsers::FirstName).string_len(50).null())
                    .col(ColumnDef::new(AuthUsers::LastName).string_len(50).null())
                    .col(ColumnDef::new(AuthUsers::AvatarUrl).string_len(500).null())
                    .col(ColumnDef::new(AuthUsers::Role).string_len(20).not_null().default("USER"))
                    .col(ColumnDef::new(AuthUsers::Skills).text().null())
                    .col(ColumnDef::new(AuthUsers::GoogleId).string_len(100).null())
                    .col(ColumnDef::new(AuthUsers::FacebookId).string_len(100).null())
                    .col(ColumnDef::new(AuthUsers::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(AuthUsers::UpdatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_auth_users_role")
                    .table(AuthUsers::Table)
                    .col(AuthUsers::Role)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AuthRefreshTokens::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuthRefreshTokens::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AuthRefreshTokens::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(AuthRefreshTokens::Token)
                            .string_len(512)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(AuthRefreshTokens::ExpiresAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(AuthRefreshTokens::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_auth_refresh_tokens_expires_at")
                    .table(AuthRefreshTokens::Table)
                    .col(AuthRefreshTokens::ExpiresAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuthRefreshTokens::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AuthUsers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AuthUsers {
    Table,
    Id,
    Email,
    Username,
    Phone,
    PasswordHash,
    Enabled,
    AccountNonExpired,
    AccountNonLocked,
    CredentialsNonExpired,
    FirstName,
    LastName,
    AvatarUrl,
    Role,
    Skills,
    GoogleId,
    FacebookId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum AuthRefreshTokens {
    Table,
    Id,
    UserId,
    Token,
    ExpiresAt,
    CreatedAt,
}
