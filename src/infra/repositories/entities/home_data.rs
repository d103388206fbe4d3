use sea_orm::entity::prelude::*;

use crate::domain::HomeData;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "home_data")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub hero_title: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub hero_description: Option<String>,
    pub hero_image_url: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for HomeData {
    fn from(model: Model) -> Self {
        HomeData {
            id: model.id,
            hero_title: model.hero_title,
            hero_description: model.hero_description,
            hero_image_url: model.hero_image_url,
        }
    }
}
