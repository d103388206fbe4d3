use sea_orm::entity::prelude::*;

use crate::domain::Testimonial;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "home_testimonials")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub customer_name: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub avatar_url: Option<String>,
    pub rating: i32,
    pub featured: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Testimonial {
    fn from(model: Model) -> Self {
        Testimonial {
            id: model.id,
            customer_name: model.customer_name,
            content: model.content,
            avatar_url: model.avatar_url,
            rating: model.rating,
            featured: model.featured,
        }
    }
}
