//! Order repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::base::{count, fetch_page, invalid_sort, sort_order};
use super::entities::order::{self, ActiveModel, Entity as OrderEntity};
use crate::domain::{NewOrder, Order, OrderStatus};
use crate::errors::{AppError, AppResult};
use crate::types::{Page, PageRequest};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Order>>;

    async fn list_by_user(&self, user_id: i64, request: PageRequest) -> AppResult<Page<Order>>;

    async fn list_by_user_and_status(
        &self,
        user_id: i64,
        status: OrderStatus,
    ) -> AppResult<Vec<Order>>;

    /// Most recent orders of a user, newest first
    async fn recent_by_user(&self, user_id: i64, limit: u64) -> AppResult<Vec<Order>>;

    /// Ids of every order placed for a service
    async fn ids_by_service(&self, service_id: i64) -> AppResult<Vec<i64>>;

    /// Active orders of a worker that start before `before`
    async fn list_active_for_worker(
        &self,
        worker_id: i64,
        before: DateTime<Utc>,
    ) -> AppResult<Vec<Order>>;

    async fn create(&self, new_order: NewOrder) -> AppResult<Order>;

    async fn list(&self, request: PageRequest) -> AppResult<Page<Order>>;

    /// Returns whether a row was removed
    async fn delete(&self, id: i64) -> AppResult<bool>;

    async fn count(&self) -> AppResult<u64>;

    async fn count_by_status(&self, status: OrderStatus) -> AppResult<u64>;

    async fn count_by_user(&self, user_id: i64, status: Option<OrderStatus>) -> AppResult<u64>;
}

pub struct OrderStore {
    db: DatabaseConnection,
}

impl OrderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn sort_column(field: &str) -> AppResult<order::Column> {
    match field {
        "id" => Ok(order::Column::Id),
        "createdAt" => Ok(order::Column::CreatedAt),
        "updatedAt" => Ok(order::Column::UpdatedAt),
        "scheduledAt" => Ok(order::Column::ScheduledAt),
        "status" => Ok(order::Column::Status),
        "totalAmount" => Ok(order::Column::TotalAmount),
        other => Err(invalid_sort(other)),
    }
}

fn active_statuses() -> Vec<&'static str> {
    OrderStatus::ACTIVE.iter().map(OrderStatus::as_str).collect()
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(db: &C, id: i64) -> AppResult<Option<Order>> {
    let model = OrderEntity::find_by_id(id).one(db).await?;
    Ok(model.map(Order::from))
}

/// Load an order and hold a row lock until the transaction ends
pub(crate) async fn lock_by_id<C: ConnectionTrait>(db: &C, id: i64) -> AppResult<Option<Order>> {
    let model = OrderEntity::find_by_id(id).lock_exclusive().one(db).await?;
    Ok(model.map(Order::from))
}

pub(crate) async fn list_active_for_worker<C: ConnectionTrait>(
    db: &C,
    worker_id: i64,
    before: DateTime<Utc>,
) -> AppResult<Vec<Order>> {
    let models = OrderEntity::find()
        .filter(
            Condition::all()
                .add(order::Column::WorkerId.eq(worker_id))
                .add(order::Column::Status.is_in(active_statuses()))
                .add(order::Column::ScheduledAt.is_not_null())
                .add(order::Column::DurationMinutes.is_not_null())
                .add(order::Column::ScheduledAt.lt(before)),
        )
        .all(db)
        .await?;
    Ok(models.into_iter().map(Order::from).collect())
}

pub(crate) async fn insert<C: ConnectionTrait>(db: &C, new_order: NewOrder) -> AppResult<Order> {
    let now = Utc::now();
    let address = new_order.address;
    let model = ActiveModel {
        user_id: Set(new_order.user_id),
        service_id: Set(new_order.service_id),
        worker_id: Set(new_order.worker_id),
        scheduled_at: Set(new_order.scheduled_at),
        duration_minutes: Set(new_order.duration_minutes),
        status: Set(OrderStatus::Pending.as_str().to_string()),
        total_amount: Set(new_order.total_amount),
        address_line: Set(address.address_line),
        district: Set(address.district),
        city: Set(address.city),
        postal_code: Set(address.postal_code),
        country: Set(address.country),
        notes: Set(new_order.notes),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(Order::from(model))
}

pub(crate) async fn update_status<C: ConnectionTrait>(
    db: &C,
    id: i64,
    status: OrderStatus,
) -> AppResult<Order> {
    let model = OrderEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order not found with id: {}", id)))?;

    let mut active: ActiveModel = model.into();
    active.status = Set(status.as_str().to_string());
    active.updated_at = Set(Utc::now());

    let model = active.update(db).await?;
    Ok(Order::from(model))
}

#[async_trait]
impl OrderRepository for OrderStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Order>> {
        find_by_id(&self.db, id).await
    }

    async fn list_by_user(&self, user_id: i64, request: PageRequest) -> AppResult<Page<Order>> {
        let column = sort_column(&request.sort_by)?;
        let select = OrderEntity::find()
            .filter(order::Column::UserId.eq(user_id))
            .order_by(column, sort_order(request.direction));
        Ok(fetch_page(&self.db, select, &request).await?.map(Order::from))
    }

    async fn list_by_user_and_status(
        &self,
        user_id: i64,
        status: OrderStatus,
    ) -> AppResult<Vec<Order>> {
        let models = OrderEntity::find()
            .filter(order::Column::UserId.eq(user_id))
            .filter(order::Column::Status.eq(status.as_str()))
            .order_by_desc(order::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Order::from).collect())
    }

    async fn recent_by_user(&self, user_id: i64, limit: u64) -> AppResult<Vec<Order>> {
        let models = OrderEntity::find()
            .filter(order::Column::UserId.eq(user_id))
            .order_by_desc(order::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Order::from).collect())
    }

    async fn ids_by_service(&self, service_id: i64) -> AppResult<Vec<i64>> {
        let ids = OrderEntity::find()
            .select_only()
            .column(order::Column::Id)
            .filter(order::Column::ServiceId.eq(service_id))
            .into_tuple::<i64>()
            .all(&self.db)
            .await?;
        Ok(ids)
    }

    async fn list_active_for_worker(
        &self,
        worker_id: i64,
        before: DateTime<Utc>,
    ) -> AppResult<Vec<Order>> {
        list_active_for_worker(&self.db, worker_id, before).await
    }

    async fn create(&self, new_order: NewOrder) -> AppResult<Order> {
        insert(&self.db, new_order).await
    }

    async fn list(&self, request: PageRequest) -> AppResult<Page<Order>> {
        let column = sort_column(&request.sort_by)?;
        let select = OrderEntity::find().order_by(column, sort_order(request.direction));
        Ok(fetch_page(&self.db, select, &request).await?.map(Order::from))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = OrderEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        count(&self.db, OrderEntity::find()).await
    }

    async fn count_by_status(&self, status: OrderStatus) -> AppResult<u64> {
        count(
            &self.db,
            OrderEntity::find().filter(order::Column::Status.eq(status.as_str())),
        )
        .await
    }

    async fn count_by_user(&self, user_id: i64, status: Option<OrderStatus>) -> AppResult<u64> {
        let mut select = OrderEntity::find().filter(order::Column::UserId.eq(user_id));
        if let Some(status) = status {
            select = select.filter(order::Column::Status.eq(status.as_str()));
        }
        count(&self.db, select).await
    }
}
