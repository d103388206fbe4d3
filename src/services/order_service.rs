//! Customer orders and reviews.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::worker_service::is_free;
use crate::domain::{
    effective_duration, Address, NewOrder, OrderDto, OrderStatus, ReviewDto, TimeSlot,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Page, PageRequest};
use crate::with_transaction;

/// A booking request from a customer
#[derive(Debug, Clone, Default)]
pub struct PlaceOrder {
    pub service_id: i64,
    pub worker_id: Option<i64>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub address: Address,
    pub notes: Option<String>,
}

#[async_trait]
pub trait OrderService: Send + Sync {
    async fn list_orders(&self, user_id: i64, request: PageRequest) -> AppResult<Page<OrderDto>>;

    /// An order of `user_id`; other users' orders read as missing
    async fn get_order(&self, user_id: i64, order_id: i64) -> AppResult<OrderDto>;

    async fn create_order(&self, user_id: i64, order: PlaceOrder) -> AppResult<OrderDto>;

    async fn orders_by_status(&self, user_id: i64, status: OrderStatus)
        -> AppResult<Vec<OrderDto>>;

    async fn create_review(
        &self,
        user_id: i64,
        order_id: i64,
        rating: i32,
        comment: Option<String>,
    ) -> AppResult<ReviewDto>;

    /// Reviews left on any order for the service
    async fn service_reviews(&self, service_id: i64) -> AppResult<Vec<ReviewDto>>;
}

pub struct OrderDesk<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> OrderDesk<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> OrderService for OrderDesk<U> {
    async fn list_orders(&self, user_id: i64, request: PageRequest) -> AppResult<Page<OrderDto>> {
        let page = self.uow.orders().list_by_user(user_id, request).await?;
        Ok(page.map(OrderDto::from))
    }

    async fn get_order(&self, user_id: i64, order_id: i64) -> AppResult<OrderDto> {
        self.uow
            .orders()
            .find_by_id(order_id)
            .await?
            .filter(|order| order.user_id == user_id)
            .map(OrderDto::from)
            .ok_or_not_found("Order not found")
    }

    async fn create_order(&self, user_id: i64, order: PlaceOrder) -> AppResult<OrderDto> {
        let service = self
            .uow
            .catalog()
            .find_by_id(order.service_id)
            .await?
            .filter(|service| service.active)
            .ok_or_not_found(format!("Service not found with id: {}", order.service_id))?;

        let slot = order
            .scheduled_at
            .map(|start| TimeSlot::starting_at(start, order.duration_minutes));

        let mut new_order = NewOrder {
            user_id,
            service_id: service.id,
            worker_id: order.worker_id,
            scheduled_at: order.scheduled_at,
            duration_minutes: order.duration_minutes,
            total_amount: service.base_price,
            address: order.address,
            notes: order.notes,
        };

        let Some(worker_id) = order.worker_id else {
            let created = self.uow.orders().create(new_order).await?;
            tracing::info!(order_id = created.id, user_id, "Order placed");
            return Ok(OrderDto::from(created));
        };

        if slot.is_some() {
            new_order.duration_minutes = Some(effective_duration(order.duration_minutes));
        }

        // The worker row lock serializes concurrent bookings of one worker.
        let created = with_transaction!(self.uow, |ctx| {
            let worker = ctx.users().lock(worker_id).await?;
            let bookings = match slot {
                Some(slot) => {
                    ctx.orders()
                        .list_active_for_worker(worker_id, slot.end)
                        .await?
                }
                None => Vec::new(),
            };
            if !is_free(worker.as_ref(), slot, &bookings) {
                return Err(AppError::bad_request(
                    "Worker is not available in the selected time slot",
                ));
            }
            ctx.orders().create(new_order).await
        })?;

        tracing::info!(order_id = created.id, user_id, worker_id, "Order booked");
        Ok(OrderDto::from(created))
    }

    async fn orders_by_status(
        &self,
        user_id: i64,
        status: OrderStatus,
    ) -> AppResult<Vec<OrderDto>> {
        let orders = self
            .uow
            .orders()
            .list_by_user_and_status(user_id, status)
            .await?;
        Ok(orders.into_iter().map(OrderDto::from).collect())
    }

    async fn create_review(
        &self,
        user_id: i64,
        order_id: i64,
        rating: i32,
        comment: Option<String>,
    ) -> AppResult<ReviewDto> {
        if !(1..=5).contains(&rating) {
            return Err(AppError::validation("rating", "Rating must be between 1 and 5"));
        }

        let order = self
            .uow
            .orders()
            .find_by_id(order_id)
            .await?
            .ok_or_not_found("Order not found")?;
        if order.user_id != user_id {
            return Err(AppError::bad_request("You can only review your own orders"));
        }

        let reviews = self.uow.reviews();
        if reviews.find_by_order(order_id).await?.is_some() {
            return Err(AppError::bad_request("Review already exists for this order"));
        }

        let review = reviews.create(order_id, user_id, rating, comment).await?;
        Ok(ReviewDto::from(review))
    }

    async fn service_reviews(&self, service_id: i64) -> AppResult<Vec<ReviewDto>> {
        let order_ids = self.uow.orders().ids_by_service(service_id).await?;
        let reviews = self.uow.reviews().list_by_orders(order_ids).await?;
        Ok(reviews.into_iter().map(ReviewDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::sample_service;
    use crate::domain::order::sample_order;
    use crate::domain::user::sample_user;
    use crate::domain::{Order, Review, UserRole};
    use crate::infra::repositories::{
        MockOrderRepository, MockReviewRepository, MockServiceRepository,
    };
    use crate::infra::testing::TestUnitOfWork;
    use crate::infra::{MockTxOrderRepository, MockTxUserRepository};
    use chrono::TimeZone;
    use crate::types::SortDirection;
    use mockall::predicate::*;
    use rust_decimal::Decimal;

    fn review(order_id: i64, user_id: i64) -> Review {
        let now = Utc::now();
        Review {
            id: 1,
            order_id,
            user_id,
            rating: 5,
            comment: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_order_without_worker_uses_base_price() {
        let mut catalog = MockServiceRepository::new();
        catalog.expect_find_by_id().returning(|id| {
            let mut service = sample_service(id, true);
            service.base_price = Decimal::new(25000, 2);
            Ok(Some(service))
        });

        let mut orders = MockOrderRepository::new();
        orders
            .expect_create()
            .withf(|o| o.total_amount == Decimal::new(25000, 2) && o.worker_id.is_none())
            .returning(|o| {
                let mut order = sample_order(11, o.user_id, OrderStatus::Pending);
                order.total_amount = o.total_amount;
                Ok(order)
            });

        let uow = TestUnitOfWork::default()
            .with_catalog(catalog)
            .with_orders(orders)
            .into_arc();
        let service = OrderDesk::new(uow);

        let dto = service
            .create_order(
                7,
                PlaceOrder {
                    service_id: 2,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(dto.user_id, 7);
        assert_eq!(dto.status, OrderStatus::Pending);
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap()
    }

    fn booking_uow(existing: Vec<Order>, accept: bool) -> TestUnitOfWork {
        let mut catalog = MockServiceRepository::new();
        catalog
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_service(id, true))));

        let mut tx_users = MockTxUserRepository::new();
        tx_users
            .expect_lock()
            .with(eq(4))
            .times(1)
            .returning(|id| Ok(Some(sample_user(id, UserRole::Worker))));

        let mut tx_orders = MockTxOrderRepository::new();
        tx_orders
            .expect_list_active_for_worker()
            .with(eq(4), eq(at(12)))
            .returning(move |_, _| Ok(existing.clone()));
        if accept {
            tx_orders
                .expect_create()
                .withf(|o| o.worker_id == Some(4) && o.duration_minutes == Some(120))
                .times(1)
                .returning(|o| {
                    let mut order = sample_order(30, o.user_id, OrderStatus::Pending);
                    order.worker_id = o.worker_id;
                    order.scheduled_at = o.scheduled_at;
                    order.duration_minutes = o.duration_minutes;
                    Ok(order)
                });
        } else {
            tx_orders.expect_create().never();
        }

        TestUnitOfWork::default()
            .with_catalog(catalog)
            .with_tx_users(tx_users)
            .with_tx_orders(tx_orders)
    }

    fn slot_request() -> PlaceOrder {
        PlaceOrder {
            service_id: 2,
            worker_id: Some(4),
            scheduled_at: Some(at(10)),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_booking_free_worker_stores_effective_duration() {
        let mut finished = sample_order(20, 9, OrderStatus::Completed);
        finished.worker_id = Some(4);
        finished.scheduled_at = Some(at(10));
        finished.duration_minutes = Some(60);

        let service = OrderDesk::new(booking_uow(vec![finished], true).into_arc());
        let dto = service.create_order(7, slot_request()).await.unwrap();
        assert_eq!(dto.id, 30);
        assert_eq!(dto.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_booking_overlapping_slot_is_rejected() {
        let mut confirmed = sample_order(21, 9, OrderStatus::Confirmed);
        confirmed.worker_id = Some(4);
        confirmed.scheduled_at = Some(at(11));
        confirmed.duration_minutes = Some(60);

        let service = OrderDesk::new(booking_uow(vec![confirmed], false).into_arc());
        let err = service.create_order(7, slot_request()).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::BadRequest(msg) if msg == "Worker is not available in the selected time slot"
        ));
    }

    #[tokio::test]
    async fn test_create_order_for_inactive_service() {
        let mut catalog = MockServiceRepository::new();
        catalog
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_service(id, false))));

        let service = OrderDesk::new(TestUnitOfWork::default().with_catalog(catalog).into_arc());
        let err = service
            .create_order(
                7,
                PlaceOrder {
                    service_id: 2,
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_foreign_order_is_not_found() {
        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .with(eq(5))
            .returning(|id| Ok(Some(sample_order(id, 99, OrderStatus::Pending))));

        let service = OrderDesk::new(TestUnitOfWork::default().with_orders(orders).into_arc());
        let err = service.get_order(1, 5).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Order not found"));
    }

    #[tokio::test]
    async fn test_list_orders_maps_page() {
        let mut orders = MockOrderRepository::new();
        orders.expect_list_by_user().returning(|user_id, request| {
            Ok(Page::new(
                vec![sample_order(1, user_id, OrderStatus::Completed)],
                &request,
                1,
            ))
        });

        let service = OrderDesk::new(TestUnitOfWork::default().with_orders(orders).into_arc());
        let page = service
            .list_orders(3, PageRequest::new(0, 10, "createdAt", SortDirection::Desc))
            .await
            .unwrap();
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.content[0].user_id, 3);
    }

    #[tokio::test]
    async fn test_review_rejects_foreign_order() {
        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_order(id, 2, OrderStatus::Completed))));

        let service = OrderDesk::new(TestUnitOfWork::default().with_orders(orders).into_arc());
        let err = service.create_review(1, 8, 5, None).await.unwrap_err();
        assert!(
            matches!(err, AppError::BadRequest(msg) if msg == "You can only review your own orders")
        );
    }

    #[tokio::test]
    async fn test_review_only_once() {
        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_order(id, 1, OrderStatus::Completed))));
        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_find_by_order()
            .returning(|order_id| Ok(Some(review(order_id, 1))));
        reviews.expect_create().never();

        let uow = TestUnitOfWork::default()
            .with_orders(orders)
            .with_reviews(reviews)
            .into_arc();
        let service = OrderDesk::new(uow);

        let err = service.create_review(1, 8, 4, None).await.unwrap_err();
        assert!(
            matches!(err, AppError::BadRequest(msg) if msg == "Review already exists for this order")
        );
    }

    #[tokio::test]
    async fn test_review_rating_bounds() {
        let service = OrderDesk::new(TestUnitOfWork::default().into_arc());
        assert!(matches!(
            service.create_review(1, 1, 6, None).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.create_review(1, 1, 0, None).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_service_reviews() {
        let mut orders = MockOrderRepository::new();
        orders
            .expect_ids_by_service()
            .with(eq(4))
            .returning(|_| Ok(vec![10, 11]));
        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_list_by_orders()
            .with(eq(vec![10, 11]))
            .returning(|_| Ok(vec![review(10, 1)]));

        let uow = TestUnitOfWork::default()
            .with_orders(orders)
            .with_reviews(reviews)
            .into_arc();
        let service = OrderDesk::new(uow);

        let found = service.service_reviews(4).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].order_id, 10);
    }
}
