//! Infrastructure layer - Database access
//!
//! - Connection management and migrations
//! - SeaORM entities and repositories
//! - Unit of Work for transaction management

pub mod db;
pub mod repositories;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    ContactRepository, HomeRepository, LoyaltyRepository, NewsRepository, OrderRepository,
    ProfileRepository, RefreshToken, RefreshTokenRepository, ReviewRepository, ServiceRepository,
    UserRepository,
};
pub use unit_of_work::{
    Persistence, TransactionContext, TxFuture, TxLoyaltyRepository, TxOrderRepository,
    TxRefreshTokenRepository, TxUserRepository, UnitOfWork,
};
#[cfg(any(test, feature = "test-utils"))]
pub use unit_of_work::{
    MockTxLoyaltyRepository, MockTxOrderRepository, MockTxRefreshTokenRepository,
    MockTxUserRepository,
};
