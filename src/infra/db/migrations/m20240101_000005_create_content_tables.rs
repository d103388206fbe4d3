//! Migration: Create news articles and home page content.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NewsArticles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NewsArticles::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(NewsArticles::Title).string_len(200).not_null())
                    .col(ColumnDef::new(NewsArticles::Summary).string_len(1000).null())
                    .col(ColumnDef::new(NewsArticles::Content).text().null())
                    .col(ColumnDef::new(NewsArticles::ImageUrl).string_len(500).null())
                    .col(ColumnDef::new(NewsArticles::Featured).boolean().not_null().default(false))
                    .col(ColumnDef::new(NewsArticles::Published).boolean().not_null().default(false))
                    .col(ColumnDef::new(NewsArticles::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(NewsArticles::UpdatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HomeData::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HomeData::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HomeData::HeroTitle).string_len(200).null())
                    .col(ColumnDef::new(HomeData::HeroDescription).text().null())
                    .col(ColumnDef::new(HomeData::HeroImageUrl).string_len(500).null())
                    .col(ColumnDef::new(HomeData::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(HomeData::UpdatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HomeTestimonials::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HomeTestimonials::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HomeTestimonials::CustomerName).string_len(100).not_null())
                    .col(ColumnDef::new(HomeTestimonials::Content).text().not_null())
                    .col(ColumnDef::new(HomeTestimonials::AvatarUrl).string_len(500).null())
                    .col(ColumnDef::new(HomeTestimonials::Rating).integer().not_null().default(5))
                    .col(ColumnDef::new(HomeTestimonials::Featured).boolean().not_null().default(false))
                    .col(ColumnDef::new(HomeTestimonials::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(HomeTestimonials::UpdatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HomeTestimonials::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HomeData::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(NewsArticles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum NewsArticles {
    Table,
    Id,
    Title,
    Summary,
    Content,
    ImageUrl,
    Featured,
    Published,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum HomeData {
    Table,
    Id,
    HeroTitle,
    HeroDescription,
    HeroImageUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum HomeTestimonials {
    Table,
    Id,
    CustomerName,
    Content,
    AvatarUrl,
    Rating,
    Featured,
    CreatedAt,
    UpdatedAt,
}
