use sea_orm::entity::prelude::*;

use crate::domain::{PointsTransaction, TransactionType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "loyalty_points_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub points: i32,
    #[sea_orm(column_name = "type")]
    pub transaction_type: String,
    pub description: Option<String>,
    pub reference_id: Option<i64>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PointsTransaction {
    fn from(model: Model) -> Self {
        PointsTransaction {
            id: model.id,
            user_id: model.user_id,
            points: model.points,
            transaction_type: TransactionType::from(model.transaction_type.as_str()),
            description: model.description,
            reference_id: model.reference_id,
            created_at: model.created_at,
        }
    }
}
