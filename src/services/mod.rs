//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain rules and repositories to fulfil the API's
//! use cases. Each is a trait with one implementation generic over the
//! Unit of Work, so tests can swap in repository mocks.

mod admin_service;
mod auth_service;
mod catalog_service;
pub mod container;
mod content_service;
mod loyalty_service;
mod order_service;
mod profile_service;
mod tasks_service;
pub mod token;
mod worker_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use admin_service::{AdminService, BackOffice};
pub use auth_service::{AuthResponse, AuthService, Authenticator, Registration};
pub use catalog_service::{Catalog, CatalogService};
pub use content_service::{HomePage, HomeService, NewsDesk, NewsService};
pub use loyalty_service::{LoyaltyProgram, LoyaltyService};
pub use order_service::{OrderDesk, OrderService, PlaceOrder};
pub use profile_service::{ContactInbox, ContactService, ProfileService, Profiles};
pub use tasks_service::{TaskBoard, TasksService};
pub use token::{Claims, TokenKind, TokenProvider};
pub use worker_service::{WorkerDirectory, WorkerService};
