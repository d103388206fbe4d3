use sea_orm::entity::prelude::*;

use crate::domain::NewsArticle;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "news_articles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub summary: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub featured: bool,
    pub published: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for NewsArticle {
    fn from(model: Model) -> Self {
        NewsArticle {
            id: model.id,
            title: model.title,
            summary: model.summary,
            content: model.content,
            image_url: model.image_url,
            featured: model.featured,
            published: model.published,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
