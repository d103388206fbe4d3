//! Back office: accounts, orders and the service catalog.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use super::loyalty_service::award_completed_order;
use super::AuthService;
use crate::domain::{
    AdminStatsDto, NewOrder, Order, OrderManagementDto, OrderStatus, ServiceDto, ServiceInput,
    User, UserManagementDto, UserRole,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Page, PageRequest};
use crate::with_transaction;

const UNKNOWN_CUSTOMER: &str = "Unknown";

#[async_trait]
pub trait AdminService: Send + Sync {
    async fn stats(&self) -> AppResult<AdminStatsDto>;

    async fn list_users(&self, request: PageRequest) -> AppResult<Page<UserManagementDto>>;

    async fn get_user(&self, id: i64) -> AppResult<UserManagementDto>;

    /// Lock an account; `admin_id` may not lock itself
    async fn block_user(&self, admin_id: i64, id: i64) -> AppResult<UserManagementDto>;

    async fn unblock_user(&self, id: i64) -> AppResult<UserManagementDto>;

    async fn list_orders(&self, request: PageRequest) -> AppResult<Page<OrderManagementDto>>;

    async fn get_order(&self, id: i64) -> AppResult<OrderManagementDto>;

    /// Moving an order into `COMPLETED` credits the customer once
    async fn update_order_status(
        &self,
        id: i64,
        status: OrderStatus,
    ) -> AppResult<OrderManagementDto>;

    async fn delete_order(&self, id: i64) -> AppResult<()>;

    async fn create_order(
        &self,
        user_id: i64,
        service_id: i64,
        notes: Option<String>,
    ) -> AppResult<OrderManagementDto>;

    async fn create_service(&self, input: ServiceInput) -> AppResult<ServiceDto>;

    async fn update_service(&self, id: i64, input: ServiceInput) -> AppResult<ServiceDto>;

    async fn delete_service(&self, id: i64) -> AppResult<()>;

    async fn toggle_service(&self, id: i64) -> AppResult<ServiceDto>;
}

pub struct BackOffice<U: UnitOfWork> {
    uow: Arc<U>,
    accounts: Arc<dyn AuthService>,
}

impl<U: UnitOfWork> BackOffice<U> {
    pub fn new(uow: Arc<U>, accounts: Arc<dyn AuthService>) -> Self {
        Self { uow, accounts }
    }

    /// Attach customer and service names, one query per side
    async fn enrich(&self, orders: Vec<Order>) -> AppResult<Vec<OrderManagementDto>> {
        let mut user_ids: Vec<i64> = orders.iter().map(|o| o.user_id).collect();
        let mut service_ids: Vec<i64> = orders.iter().map(|o| o.service_id).collect();
        user_ids.sort_unstable();
        user_ids.dedup();
        service_ids.sort_unstable();
        service_ids.dedup();

        let user_repo = self.uow.users();
        let catalog_repo = self.uow.catalog();
        let (users, services) = tokio::try_join!(
            user_repo.find_by_ids(user_ids),
            catalog_repo.find_by_ids(service_ids),
        )?;
        let users: HashMap<i64, User> = users.into_iter().map(|u| (u.id, u)).collect();
        let services: HashMap<i64, String> =
            services.into_iter().map(|s| (s.id, s.name)).collect();

        Ok(orders
            .into_iter()
            .map(|order| {
                let customer = users.get(&order.user_id);
                OrderManagementDto {
                    id: order.id,
                    user_id: order.user_id,
                    customer_name: customer
                        .and_then(User::full_name)
                        .unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string()),
                    customer_email: customer.map(|c| c.email.clone()),
                    service_id: order.service_id,
                    service_name: services.get(&order.service_id).cloned(),
                    worker_id: order.worker_id,
                    scheduled_at: order.scheduled_at,
                    status: order.status,
                    total_amount: order.total_amount,
                    notes: order.notes,
                    created_at: order.created_at,
                    updated_at: order.updated_at,
                }
            })
            .collect())
    }

    async fn enrich_one(&self, order: Order) -> AppResult<OrderManagementDto> {
        self.enrich(vec![order])
            .await?
            .pop()
            .ok_or_else(|| AppError::internal("order enrichment returned nothing"))
    }
}

#[async_trait]
impl<U: UnitOfWork> AdminService for BackOffice<U> {
    async fn stats(&self) -> AppResult<AdminStatsDto> {
        let users = self.uow.users();
        let orders = self.uow.orders();
        let catalog = self.uow.catalog();

        let (total_users, total_workers, total_orders, total_services) = tokio::try_join!(
            users.count_by_role(UserRole::User),
            users.count_by_role(UserRole::Worker),
            orders.count(),
            catalog.count(),
        )?;
        let (pending_orders, in_progress_orders, completed_orders, cancelled_orders) = tokio::try_join!(
            orders.count_by_status(OrderStatus::Pending),
            orders.count_by_status(OrderStatus::InProgress),
            orders.count_by_status(OrderStatus::Completed),
            orders.count_by_status(OrderStatus::Cancelled),
        )?;

        Ok(AdminStatsDto {
            total_users,
            total_workers,
            total_orders,
            total_services,
            pending_orders,
            in_progress_orders,
            completed_orders,
            cancelled_orders,
        })
    }

    async fn list_users(&self, request: PageRequest) -> AppResult<Page<UserManagementDto>> {
        let page = self.uow.users().list(request).await?;
        Ok(page.map(UserManagementDto::from))
    }

    async fn get_user(&self, id: i64) -> AppResult<UserManagementDto> {
        let user = self.accounts.get_user_by_id(id).await?;
        Ok(UserManagementDto::from(user))
    }

    async fn block_user(&self, admin_id: i64, id: i64) -> AppResult<UserManagementDto> {
        if admin_id == id {
            return Err(AppError::bad_request("You cannot block your own account"));
        }
        let user = self.uow.users().set_locked(id, true).await?;
        tracing::info!(admin_id, user_id = id, "User blocked");
        Ok(UserManagementDto::from(user))
    }

    async fn unblock_user(&self, id: i64) -> AppResult<UserManagementDto> {
        let user = self.uow.users().set_locked(id, false).await?;
        tracing::info!(user_id = id, "User unblocked");
        Ok(UserManagementDto::from(user))
    }

    async fn list_orders(&self, request: PageRequest) -> AppResult<Page<OrderManagementDto>> {
        let page = self.uow.orders().list(request).await?;
        let enriched = self.enrich(page.content).await?;
        Ok(Page {
            content: enriched,
            page: page.page,
            size: page.size,
            total_elements: page.total_elements,
            total_pages: page.total_pages,
            first: page.first,
            last: page.last,
        })
    }

    async fn get_order(&self, id: i64) -> AppResult<OrderManagementDto> {
        let order = self
            .uow
            .orders()
            .find_by_id(id)
            .await?
            .ok_or_not_found(format!("Order not found with id: {}", id))?;
        self.enrich_one(order).await
    }

    async fn update_order_status(
        &self,
        id: i64,
        status: OrderStatus,
    ) -> AppResult<OrderManagementDto> {
        let (updated, awarded) = with_transaction!(self.uow, |ctx| {
            let current = ctx
                .orders()
                .lock(id)
                .await?
                .ok_or_not_found(format!("Order not found with id: {}", id))?;
            let updated = ctx.orders().update_status(id, status).await?;

            // Re-completing an order finds the earlier ledger entry and pays nothing.
            let awarded = if status == OrderStatus::Completed {
                award_completed_order(&ctx, &current).await?
            } else {
                false
            };
            Ok((updated, awarded))
        })?;

        tracing::info!(order_id = id, status = %status, awarded, "Order status updated");
        self.enrich_one(updated).await
    }

    async fn delete_order(&self, id: i64) -> AppResult<()> {
        if !self.uow.orders().delete(id).await? {
            return Err(AppError::not_found(format!("Order not found with id: {}", id)));
        }
        Ok(())
    }

    async fn create_order(
        &self,
        user_id: i64,
        service_id: i64,
        notes: Option<String>,
    ) -> AppResult<OrderManagementDto> {
        let catalog_repo = self.uow.catalog();
        let (user_exists, service) = tokio::try_join!(
            self.accounts.user_exists(user_id),
            catalog_repo.find_by_id(service_id),
        )?;
        if !user_exists {
            return Err(AppError::not_found(format!("User not found with id: {}", user_id)));
        }
        let service =
            service.ok_or_not_found(format!("Service not found with id: {}", service_id))?;

        let order = self
            .uow
            .orders()
            .create(NewOrder {
                user_id,
                service_id,
                worker_id: None,
                scheduled_at: None,
                duration_minutes: None,
                total_amount: service.base_price,
                address: Default::default(),
                notes,
            })
            .await?;
        self.enrich_one(order).await
    }

    async fn create_service(&self, input: ServiceInput) -> AppResult<ServiceDto> {
        let service = self.uow.catalog().create(input).await?;
        Ok(ServiceDto::from(service))
    }

    async fn update_service(&self, id: i64, input: ServiceInput) -> AppResult<ServiceDto> {
        let service = self.uow.catalog().update(id, input).await?;
        Ok(ServiceDto::from(service))
    }

    async fn delete_service(&self, id: i64) -> AppResult<()> {
        if !self.uow.catalog().delete(id).await? {
            return Err(AppError::not_found(format!(
                "Service not found with id: {}",
                id
            )));
        }
        Ok(())
    }

    async fn toggle_service(&self, id: i64) -> AppResult<ServiceDto> {
        let catalog = self.uow.catalog();
        let service = catalog
            .find_by_id(id)
            .await?
            .ok_or_not_found(format!("Service not found with id: {}", id))?;
        let toggled = catalog.set_active(id, !service.active).await?;
        Ok(ServiceDto::from(toggled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::sample_service;
    use crate::domain::order::sample_order;
    use crate::domain::user::sample_user;
    use crate::infra::repositories::{
        MockOrderRepository, MockServiceRepository, MockUserRepository,
    };
    use crate::config::POINTS_PER_COMPLETED_ORDER;
    use crate::domain::{LoyaltyAccount, Tier, TransactionType};
    use crate::infra::testing::TestUnitOfWork;
    use crate::infra::{MockTxLoyaltyRepository, MockTxOrderRepository};
    use crate::types::SortDirection;
    use crate::services::Authenticator;
    use mockall::predicate::*;
    use rust_decimal::Decimal;

    fn back_office(uow: Arc<TestUnitOfWork>) -> BackOffice<TestUnitOfWork> {
        let config = crate::config::Config::with_secret("test-secret-key-for-testing-only-32chars")
            .unwrap();
        let accounts = Arc::new(Authenticator::new(uow.clone(), &config));
        BackOffice::new(uow, accounts)
    }

    #[tokio::test]
    async fn test_stats() {
        let mut users = MockUserRepository::new();
        users
            .expect_count_by_role()
            .with(eq(UserRole::User))
            .returning(|_| Ok(12));
        users
            .expect_count_by_role()
            .with(eq(UserRole::Worker))
            .returning(|_| Ok(3));

        let mut orders = MockOrderRepository::new();
        orders.expect_count().returning(|| Ok(20));
        orders.expect_count_by_status().returning(|status| {
            Ok(match status {
                OrderStatus::Pending => 5,
                OrderStatus::InProgress => 4,
                OrderStatus::Completed => 9,
                OrderStatus::Cancelled => 2,
                OrderStatus::Confirmed => 0,
            })
        });

        let mut catalog = MockServiceRepository::new();
        catalog.expect_count().returning(|| Ok(7));

        let uow = TestUnitOfWork::default()
            .with_users(users)
            .with_orders(orders)
            .with_catalog(catalog)
            .into_arc();
        let stats = back_office(uow).stats().await.unwrap();

        assert_eq!(
            stats,
            AdminStatsDto {
                total_users: 12,
                total_workers: 3,
                total_orders: 20,
                total_services: 7,
                pending_orders: 5,
                in_progress_orders: 4,
                completed_orders: 9,
                cancelled_orders: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_get_user_goes_through_account_lookup() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .with(eq(4))
            .returning(|id| Ok(Some(sample_user(id, UserRole::Worker))));
        users.expect_find_by_id().returning(|_| Ok(None));

        let service = back_office(TestUnitOfWork::default().with_users(users).into_arc());
        assert_eq!(service.get_user(4).await.unwrap().id, 4);
        assert!(matches!(
            service.get_user(5).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_admin_cannot_block_self() {
        let mut users = MockUserRepository::new();
        users.expect_set_locked().never();

        let service = back_office(TestUnitOfWork::default().with_users(users).into_arc());
        assert!(matches!(
            service.block_user(1, 1).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_block_user() {
        let mut users = MockUserRepository::new();
        users
            .expect_set_locked()
            .with(eq(5), eq(true))
            .returning(|id, _| {
                let mut user = sample_user(id, UserRole::User);
                user.account_non_locked = false;
                Ok(user)
            });

        let service = back_office(TestUnitOfWork::default().with_users(users).into_arc());
        let dto = service.block_user(1, 5).await.unwrap();
        assert!(!dto.account_non_locked);
    }

    #[tokio::test]
    async fn test_list_orders_enriched() {
        let mut orders = MockOrderRepository::new();
        orders.expect_list().returning(|request| {
            let mut other = sample_order(2, 9, OrderStatus::Pending);
            other.service_id = 3;
            Ok(Page::new(
                vec![sample_order(1, 8, OrderStatus::Completed), other],
                &request,
                2,
            ))
        });

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_ids()
            .with(eq(vec![8, 9]))
            .returning(|_| {
                let mut named = sample_user(8, UserRole::User);
                named.first_name = Some("Thu".into());
                named.last_name = Some("Tran".into());
                Ok(vec![named])
            });

        let mut catalog = MockServiceRepository::new();
        catalog
            .expect_find_by_ids()
            .with(eq(vec![1, 3]))
            .returning(|_| Ok(vec![sample_service(1, true)]));

        let uow = TestUnitOfWork::default()
            .with_orders(orders)
            .with_users(users)
            .with_catalog(catalog)
            .into_arc();
        let page = back_office(uow)
            .list_orders(PageRequest::new(0, 10, "createdAt", SortDirection::Desc))
            .await
            .unwrap();

        assert_eq!(page.total_elements, 2);
        assert_eq!(page.content[0].customer_name, "Thu Tran");
        assert_eq!(page.content[0].customer_email.as_deref(), Some("user8@example.com"));
        assert_eq!(page.content[0].service_name.as_deref(), Some("Service 1"));
        assert_eq!(page.content[1].customer_name, "Unknown");
        assert_eq!(page.content[1].service_name, None);
    }

    #[tokio::test]
    async fn test_create_order_requires_user() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));
        let mut catalog = MockServiceRepository::new();
        catalog
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_service(id, true))));

        let uow = TestUnitOfWork::default()
            .with_users(users)
            .with_catalog(catalog)
            .into_arc();
        let err = back_office(uow)
            .create_order(4, 1, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "User not found with id: 4"));
    }

    #[tokio::test]
    async fn test_create_order_priced_at_base_price() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_user(id, UserRole::User))));
        users
            .expect_find_by_ids()
            .returning(|ids| Ok(ids.into_iter().map(|id| sample_user(id, UserRole::User)).collect()));

        let mut catalog = MockServiceRepository::new();
        catalog.expect_find_by_id().returning(|id| {
            let mut service = sample_service(id, true);
            service.base_price = Decimal::new(9900, 2);
            Ok(Some(service))
        });
        catalog
            .expect_find_by_ids()
            .returning(|ids| Ok(ids.into_iter().map(|id| sample_service(id, true)).collect()));

        let mut orders = MockOrderRepository::new();
        orders
            .expect_create()
            .withf(|o| o.total_amount == Decimal::new(9900, 2) && o.notes.as_deref() == Some("asap"))
            .returning(|o| {
                let mut order = sample_order(30, o.user_id, OrderStatus::Pending);
                order.service_id = o.service_id;
                order.total_amount = o.total_amount;
                Ok(order)
            });

        let uow = TestUnitOfWork::default()
            .with_users(users)
            .with_catalog(catalog)
            .with_orders(orders)
            .into_arc();
        let dto = back_office(uow)
            .create_order(4, 2, Some("asap".into()))
            .await
            .unwrap();
        assert_eq!(dto.total_amount, Decimal::new(9900, 2));
        assert_eq!(dto.service_name.as_deref(), Some("Service 2"));
        assert_eq!(dto.customer_name, "Unknown");
    }

    #[tokio::test]
    async fn test_delete_missing_order() {
        let mut orders = MockOrderRepository::new();
        orders.expect_delete().returning(|_| Ok(false));

        let service = back_office(TestUnitOfWork::default().with_orders(orders).into_arc());
        assert!(matches!(
            service.delete_order(77).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_toggle_service() {
        let mut catalog = MockServiceRepository::new();
        catalog
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_service(id, true))));
        catalog
            .expect_set_active()
            .with(eq(3), eq(false))
            .returning(|id, active| Ok(sample_service(id, active)));

        let service = back_office(TestUnitOfWork::default().with_catalog(catalog).into_arc());
        let dto = service.toggle_service(3).await.unwrap();
        assert!(!dto.active);
    }

    fn status_uow(
        from: OrderStatus,
        to: OrderStatus,
        loyalty: MockTxLoyaltyRepository,
    ) -> TestUnitOfWork {
        let mut tx_orders = MockTxOrderRepository::new();
        tx_orders
            .expect_lock()
            .with(eq(5))
            .returning(move |id| Ok(Some(sample_order(id, 8, from))));
        tx_orders
            .expect_update_status()
            .with(eq(5), eq(to))
            .times(1)
            .returning(|id, status| Ok(sample_order(id, 8, status)));

        let mut users = MockUserRepository::new();
        users.expect_find_by_ids().returning(|_| Ok(vec![]));
        let mut catalog = MockServiceRepository::new();
        catalog.expect_find_by_ids().returning(|_| Ok(vec![]));

        TestUnitOfWork::default()
            .with_users(users)
            .with_catalog(catalog)
            .with_tx_orders(tx_orders)
            .with_tx_loyalty(loyalty)
    }

    #[tokio::test]
    async fn test_completing_order_awards_points() {
        let mut loyalty = MockTxLoyaltyRepository::new();
        loyalty
            .expect_has_award()
            .with(eq(5))
            .returning(|_| Ok(false));
        loyalty
            .expect_earn()
            .withf(|entry| {
                entry.user_id == 8
                    && entry.points == POINTS_PER_COMPLETED_ORDER
                    && entry.transaction_type == TransactionType::Earned
                    && entry.reference_id == Some(5)
                    && entry.description.as_deref() == Some("Completed order #5")
            })
            .times(1)
            .returning(|entry| {
                let now = chrono::Utc::now();
                Ok(LoyaltyAccount {
                    id: 1,
                    user_id: entry.user_id,
                    points_balance: entry.points,
                    current_tier: Tier::Bronze,
                    created_at: now,
                    updated_at: now,
                })
            });

        let uow = status_uow(OrderStatus::InProgress, OrderStatus::Completed, loyalty);
        let dto = back_office(uow.into_arc())
            .update_order_status(5, OrderStatus::Completed)
            .await
            .unwrap();
        assert_eq!(dto.status, OrderStatus::Completed);
        assert_eq!(dto.customer_name, "Unknown");
    }

    #[tokio::test]
    async fn test_recompleting_order_pays_nothing() {
        // Completed, moved back to confirmed, then completed again.
        let mut loyalty = MockTxLoyaltyRepository::new();
        loyalty
            .expect_has_award()
            .with(eq(5))
            .returning(|_| Ok(true));
        loyalty.expect_earn().never();

        let uow = status_uow(OrderStatus::Confirmed, OrderStatus::Completed, loyalty);
        let dto = back_office(uow.into_arc())
            .update_order_status(5, OrderStatus::Completed)
            .await
            .unwrap();
        assert_eq!(dto.status, OrderStatus::Completed);
    }

    #[tokio::test]
    async fn test_other_transitions_skip_loyalty() {
        let mut loyalty = MockTxLoyaltyRepository::new();
        loyalty.expect_has_award().never();
        loyalty.expect_earn().never();

        let uow = status_uow(OrderStatus::Completed, OrderStatus::Confirmed, loyalty);
        let dto = back_office(uow.into_arc())
            .update_order_status(5, OrderStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(dto.status, OrderStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_status_update_for_missing_order() {
        let mut tx_orders = MockTxOrderRepository::new();
        tx_orders.expect_lock().returning(|_| Ok(None));
        tx_orders.expect_update_status().never();

        let uow = TestUnitOfWork::default().with_tx_orders(tx_orders).into_arc();
        assert!(matches!(
            back_office(uow)
                .update_order_status(5, OrderStatus::Completed)
                .await,
            Err(AppError::NotFound(_))
        ));
    }
}
