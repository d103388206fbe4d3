use sea_orm::entity::prelude::*;

use crate::domain::ServiceOffering;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "services_services")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub base_price: Decimal,
    pub image_url: Option<String>,
    pub category: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub details: Option<String>,
    pub active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ServiceOffering {
    fn from(model: Model) -> Self {
        ServiceOffering {
            id: model.id,
            name: model.name,
            description: model.description,
            base_price: model.base_price,
            image_url: model.image_url,
            category: model.category,
            details: model.details,
            active: model.active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
