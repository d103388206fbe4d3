use sea_orm::entity::prelude::*;

use crate::domain::{LoyaltyAccount, Tier};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "loyalty_points")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: i64,
    pub points_balance: i32,
    pub current_tier: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for LoyaltyAccount {
    fn from(model: Model) -> Self {
        LoyaltyAccount {
            id: model.id,
            user_id: model.user_id,
            points_balance: model.points_balance,
            current_tier: Tier::from(model.current_tier.as_str()),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
