use sea_orm::entity::prelude::*;

use crate::domain::{Address, Order, OrderStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "orders_orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub service_id: i64,
    pub worker_id: Option<i64>,
    pub scheduled_at: Option<DateTimeUtc>,
    pub duration_minutes: Option<i32>,
    pub status: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub total_amount: Decimal,
    pub address_line: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Order {
    fn from(model: Model) -> Self {
        Order {
            id: model.id,
            user_id: model.user_id,
            service_id: model.service_id,
            worker_id: model.worker_id,
            scheduled_at: model.scheduled_at,
            duration_minutes: model.duration_minutes,
            // Unknown values only appear if the column was edited by hand
            status: model.status.parse().unwrap_or(OrderStatus::Pending),
            total_amount: model.total_amount,
            address: Address {
                address_line: model.address_line,
                district: model.district,
                city: model.city,
                postal_code: model.postal_code,
                country: model.country,
            },
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
