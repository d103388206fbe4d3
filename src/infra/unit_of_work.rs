//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and runs multi-step writes (token
//! rotation, bookings, order completion) inside one database transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use std::sync::Arc;

use super::repositories::{
    loyalty_repository, order_repository, refresh_token_repository, user_repository,
    ContactRepository, ContactStore, HomeRepository, HomeStore, LoyaltyRepository, LoyaltyStore,
    NewsRepository, NewsStore, OrderRepository, OrderStore, ProfileRepository, ProfileStore,
    RefreshToken, RefreshTokenRepository, RefreshTokenStore, ReviewRepository, ReviewStore,
    ServiceRepository, ServiceStore, UserRepository, UserStore,
};
use crate::domain::{
    LoyaltyAccount, NewOrder, NewPointsTransaction, NewUser, Order, OrderStatus, User,
};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Boxed future returned by transaction closures
pub type TxFuture<'a, T> =
    std::pin::Pin<Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because of the generic `transaction` method;
/// tests use a hand-written implementation that runs the closure against
/// mocked `Tx*Repository` handles.
#[async_trait]
pub trait UnitOfWork: Send + Sync + 'static {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn refresh_tokens(&self) -> Arc<dyn RefreshTokenRepository>;

    fn catalog(&self) -> Arc<dyn ServiceRepository>;

    fn orders(&self) -> Arc<dyn OrderRepository>;

    fn reviews(&self) -> Arc<dyn ReviewRepository>;

    fn loyalty(&self) -> Arc<dyn LoyaltyRepository>;

    fn news(&self) -> Arc<dyn NewsRepository>;

    fn home(&self) -> Arc<dyn HomeRepository>;

    fn profiles(&self) -> Arc<dyn ProfileRepository>;

    fn contacts(&self) -> Arc<dyn ContactRepository>;

    /// Execute a closure within a ReadCommitted transaction.
    ///
    /// Committed when the closure returns `Ok`, rolled back otherwise.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Repository access bound to one open transaction.
pub struct TransactionContext<'a> {
    users: &'a dyn TxUserRepository,
    refresh_tokens: &'a dyn TxRefreshTokenRepository,
    orders: &'a dyn TxOrderRepository,
    loyalty: &'a dyn TxLoyaltyRepository,
}

impl<'a> TransactionContext<'a> {
    pub fn new(
        users: &'a dyn TxUserRepository,
        refresh_tokens: &'a dyn TxRefreshTokenRepository,
        orders: &'a dyn TxOrderRepository,
        loyalty: &'a dyn TxLoyaltyRepository,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            orders,
            loyalty,
        }
    }

    pub fn users(&self) -> &'a dyn TxUserRepository {
        self.users
    }

    pub fn refresh_tokens(&self) -> &'a dyn TxRefreshTokenRepository {
        self.refresh_tokens
    }

    pub fn orders(&self) -> &'a dyn TxOrderRepository {
        self.orders
    }

    pub fn loyalty(&self) -> &'a dyn TxLoyaltyRepository {
        self.loyalty
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    users: Arc<UserStore>,
    refresh_tokens: Arc<RefreshTokenStore>,
    catalog: Arc<ServiceStore>,
    orders: Arc<OrderStore>,
    reviews: Arc<ReviewStore>,
    loyalty: Arc<LoyaltyStore>,
    news: Arc<NewsStore>,
    home: Arc<HomeStore>,
    profiles: Arc<ProfileStore>,
    contacts: Arc<ContactStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            refresh_tokens: Arc::new(RefreshTokenStore::new(db.clone())),
            catalog: Arc::new(ServiceStore::new(db.clone())),
            orders: Arc::new(OrderStore::new(db.clone())),
            reviews: Arc::new(ReviewStore::new(db.clone())),
            loyalty: Arc::new(LoyaltyStore::new(db.clone())),
            news: Arc::new(NewsStore::new(db.clone())),
            home: Arc::new(HomeStore::new(db.clone())),
            profiles: Arc::new(ProfileStore::new(db.clone())),
            contacts: Arc::new(ContactStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn refresh_tokens(&self) -> Arc<dyn RefreshTokenRepository> {
        self.refresh_tokens.clone()
    }

    fn catalog(&self) -> Arc<dyn ServiceRepository> {
        self.catalog.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.orders.clone()
    }

    fn reviews(&self) -> Arc<dyn ReviewRepository> {
        self.reviews.clone()
    }

    fn loyalty(&self) -> Arc<dyn LoyaltyRepository> {
        self.loyalty.clone()
    }

    fn news(&self) -> Arc<dyn NewsRepository> {
        self.news.clone()
    }

    fn home(&self) -> Arc<dyn HomeRepository> {
        self.home.clone()
    }

    fn profiles(&self) -> Arc<dyn ProfileRepository> {
        self.profiles.clone()
    }

    fn contacts(&self) -> Arc<dyn ContactRepository> {
        self.contacts.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)?;

        let users = TxUserStore { txn: &txn };
        let refresh_tokens = TxRefreshTokenStore { txn: &txn };
        let orders = TxOrderStore { txn: &txn };
        let loyalty = TxLoyaltyStore { txn: &txn };
        let ctx = TransactionContext::new(&users, &refresh_tokens, &orders, &loyalty);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-bound user queries
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TxUserRepository: Send + Sync {
    /// `SELECT ... FOR UPDATE` on the account row
    async fn lock(&self, id: i64) -> AppResult<Option<User>>;

    async fn create(&self, new_user: NewUser) -> AppResult<User>;
}

/// Transaction-bound refresh token writes
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TxRefreshTokenRepository: Send + Sync {
    async fn create(
        &self,
        user_id: i64,
        token: String,
        expires_at: DateTime<Utc>,
    ) -> AppResult<RefreshToken>;

    async fn delete_by_token(&self, token: &str) -> AppResult<bool>;
}

/// Transaction-bound order queries
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TxOrderRepository: Send + Sync {
    /// `SELECT ... FOR UPDATE` on the order row
    async fn lock(&self, id: i64) -> AppResult<Option<Order>>;

    async fn list_active_for_worker(
        &self,
        worker_id: i64,
        before: DateTime<Utc>,
    ) -> AppResult<Vec<Order>>;

    async fn create(&self, new_order: NewOrder) -> AppResult<Order>;

    async fn update_status(&self, id: i64, status: OrderStatus) -> AppResult<Order>;
}

/// Transaction-bound loyalty writes
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TxLoyaltyRepository: Send + Sync {
    /// Whether an `EARNED` entry already references this order
    async fn has_award(&self, order_id: i64) -> AppResult<bool>;

    async fn earn(&self, entry: NewPointsTransaction) -> AppResult<LoyaltyAccount>;
}

struct TxUserStore<'a> {
    txn: &'a DatabaseTransaction,
}

#[async_trait]
impl TxUserRepository for TxUserStore<'_> {
    async fn lock(&self, id: i64) -> AppResult<Option<User>> {
        user_repository::lock_by_id(self.txn, id).await
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        user_repository::insert(self.txn, new_user).await
    }
}

struct TxRefreshTokenStore<'a> {
    txn: &'a DatabaseTransaction,
}

#[async_trait]
impl TxRefreshTokenRepository for TxRefreshTokenStore<'_> {
    async fn create(
        &self,
        user_id: i64,
        token: String,
        expires_at: DateTime<Utc>,
    ) -> AppResult<RefreshToken> {
        refresh_token_repository::insert(self.txn, user_id, token, expires_at).await
    }

    async fn delete_by_token(&self, token: &str) -> AppResult<bool> {
        refresh_token_repository::delete_by_token(self.txn, token).await
    }
}

struct TxOrderStore<'a> {
    txn: &'a DatabaseTransaction,
}

#[async_trait]
impl TxOrderRepository for TxOrderStore<'_> {
    async fn lock(&self, id: i64) -> AppResult<Option<Order>> {
        order_repository::lock_by_id(self.txn, id).await
    }

    async fn list_active_for_worker(
        &self,
        worker_id: i64,
        before: DateTime<Utc>,
    ) -> AppResult<Vec<Order>> {
        order_repository::list_active_for_worker(self.txn, worker_id, before).await
    }

    async fn create(&self, new_order: NewOrder) -> AppResult<Order> {
        order_repository::insert(self.txn, new_order).await
    }

    async fn update_status(&self, id: i64, status: OrderStatus) -> AppResult<Order> {
        order_repository::update_status(self.txn, id, status).await
    }
}

struct TxLoyaltyStore<'a> {
    txn: &'a DatabaseTransaction,
}

#[async_trait]
impl TxLoyaltyRepository for TxLoyaltyStore<'_> {
    async fn has_award(&self, order_id: i64) -> AppResult<bool> {
        loyalty_repository::has_award(self.txn, order_id).await
    }

    async fn earn(&self, entry: NewPointsTransaction) -> AppResult<LoyaltyAccount> {
        loyalty_repository::earn(self.txn, entry).await
    }
}

/// Run the body inside `$uow.transaction`, boxing the future.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
