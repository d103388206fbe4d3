//! Unit of Work over repository mocks, for service tests.
//!
//! Repositories that a test does not configure are fresh mocks, so any
//! unexpected call fails the test. Transactions run the closure directly
//! against the `Tx*` mocks; nothing is rolled back on error.

use std::sync::Arc;

use async_trait::async_trait;

use super::repositories::{
    ContactRepository, HomeRepository, LoyaltyRepository, MockContactRepository,
    MockHomeRepository, MockLoyaltyRepository, MockNewsRepository, MockOrderRepository,
    MockProfileRepository, MockRefreshTokenRepository, MockReviewRepository,
    MockServiceRepository, MockUserRepository, NewsRepository, OrderRepository,
    ProfileRepository, RefreshTokenRepository, ReviewRepository, ServiceRepository,
    UserRepository,
};
use super::unit_of_work::{
    MockTxLoyaltyRepository, MockTxOrderRepository, MockTxRefreshTokenRepository,
    MockTxUserRepository, TransactionContext, TxFuture, TxLoyaltyRepository, TxOrderRepository,
    TxRefreshTokenRepository, TxUserRepository, UnitOfWork,
};
use crate::errors::AppResult;

pub struct TestUnitOfWork {
    users: Arc<dyn UserRepository>,
    refresh_tokens: Arc<dyn RefreshTokenRepository>,
    catalog: Arc<dyn ServiceRepository>,
    orders: Arc<dyn OrderRepository>,
    reviews: Arc<dyn ReviewRepository>,
    loyalty: Arc<dyn LoyaltyRepository>,
    news: Arc<dyn NewsRepository>,
    home: Arc<dyn HomeRepository>,
    profiles: Arc<dyn ProfileRepository>,
    contacts: Arc<dyn ContactRepository>,
    tx_users: Arc<dyn TxUserRepository>,
    tx_refresh_tokens: Arc<dyn TxRefreshTokenRepository>,
    tx_orders: Arc<dyn TxOrderRepository>,
    tx_loyalty: Arc<dyn TxLoyaltyRepository>,
}

impl Default for TestUnitOfWork {
    fn default() -> Self {
        Self {
            users: Arc::new(MockUserRepository::new()),
            refresh_tokens: Arc::new(MockRefreshTokenRepository::new()),
            catalog: Arc::new(MockServiceRepository::new()),
            orders: Arc::new(MockOrderRepository::new()),
            reviews: Arc::new(MockReviewRepository::new()),
            loyalty: Arc::new(MockLoyaltyRepository::new()),
            news: Arc::new(MockNewsRepository::new()),
            home: Arc::new(MockHomeRepository::new()),
            profiles: Arc::new(MockProfileRepository::new()),
            contacts: Arc::new(MockContactRepository::new()),
            tx_users: Arc::new(MockTxUserRepository::new()),
            tx_refresh_tokens: Arc::new(MockTxRefreshTokenRepository::new()),
            tx_orders: Arc::new(MockTxOrderRepository::new()),
            tx_loyalty: Arc::new(MockTxLoyaltyRepository::new()),
        }
    }
}

impl TestUnitOfWork {
    pub fn with_users(mut self, repo: MockUserRepository) -> Self {
        self.users = Arc::new(repo);
        self
    }

    pub fn with_refresh_tokens(mut self, repo: MockRefreshTokenRepository) -> Self {
        self.refresh_tokens = Arc::new(repo);
        self
    }

    pub fn with_catalog(mut self, repo: MockServiceRepository) -> Self {
        self.catalog = Arc::new(repo);
        self
    }

    pub fn with_orders(mut self, repo: MockOrderRepository) -> Self {
        self.orders = Arc::new(repo);
        self
    }

    pub fn with_reviews(mut self, repo: MockReviewRepository) -> Self {
        self.reviews = Arc::new(repo);
        self
    }

    pub fn with_loyalty(mut self, repo: MockLoyaltyRepository) -> Self {
        self.loyalty = Arc::new(repo);
        self
    }

    pub fn with_news(mut self, repo: MockNewsRepository) -> Self {
        self.news = Arc::new(repo);
        self
    }

    pub fn with_home(mut self, repo: MockHomeRepository) -> Self {
        self.home = Arc::new(repo);
        self
    }

    pub fn with_profiles(mut self, repo: MockProfileRepository) -> Self {
        self.profiles = Arc::new(repo);
        self
    }

    pub fn with_contacts(mut self, repo: MockContactRepository) -> Self {
        self.contacts = Arc::new(repo);
        self
    }

    pub fn with_tx_users(mut self, repo: MockTxUserRepository) -> Self {
        self.tx_users = Arc::new(repo);
        self
    }

    pub fn with_tx_refresh_tokens(mut self, repo: MockTxRefreshTokenRepository) -> Self {
        self.tx_refresh_tokens = Arc::new(repo);
        self
    }

    pub fn with_tx_orders(mut self, repo: MockTxOrderRepository) -> Self {
        self.tx_orders = Arc::new(repo);
        self
    }

    pub fn with_tx_loyalty(mut self, repo: MockTxLoyaltyRepository) -> Self {
        self.tx_loyalty = Arc::new(repo);
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
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
        let ctx = TransactionContext::new(
            self.tx_users.as_ref(),
            self.tx_refresh_tokens.as_ref(),
            self.tx_orders.as_ref(),
            self.tx_loyalty.as_ref(),
        );
        f(ctx).await
    }
}
