//! Repository layer - Data access abstraction
//!
//! Each repository is a trait (mockable in tests) with a SeaORM-backed
//! `*Store` implementation. Queries that also run inside a transaction
//! are free functions generic over the connection.

mod base;
mod content_repository;
pub(crate) mod entities;
pub(crate) mod loyalty_repository;
pub(crate) mod order_repository;
mod profile_repository;
pub(crate) mod refresh_token_repository;
mod review_repository;
mod service_repository;
pub(crate) mod user_repository;

pub use content_repository::{HomeRepository, HomeStore, NewsRepository, NewsStore};
pub use loyalty_repository::{LoyaltyRepository, LoyaltyStore};
pub use order_repository::{OrderRepository, OrderStore};
pub use profile_repository::{ContactRepository, ContactStore, ProfileRepository, ProfileStore};
pub use refresh_token_repository::{RefreshToken, RefreshTokenRepository, RefreshTokenStore};
pub use review_repository::{ReviewRepository, ReviewStore};
pub use service_repository::{ServiceRepository, ServiceStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use content_repository::{MockHomeRepository, MockNewsRepository};
#[cfg(any(test, feature = "test-utils"))]
pub use loyalty_repository::MockLoyaltyRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use order_repository::MockOrderRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use profile_repository::{MockContactRepository, MockProfileRepository};
#[cfg(any(test, feature = "test-utils"))]
pub use refresh_token_repository::MockRefreshTokenRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use review_repository::MockReviewRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use service_repository::MockServiceRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
